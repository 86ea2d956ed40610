//! Dataset paths.

use std::fmt;

use tessella_core::DataError;

/// A validated dataset path such as `cells/state`.
///
/// A single leading `/` is accepted and dropped; empty segments are
/// rejected.
///
/// # Examples
///
/// ```
/// use tessella_data::DataPath;
///
/// let p = DataPath::parse("/model/cells/state").unwrap();
/// assert_eq!(p.as_str(), "model/cells/state");
/// assert_eq!(p.group(), Some("model/cells"));
/// assert_eq!(p.name(), "state");
/// assert!(DataPath::parse("model//state").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataPath(String);

impl DataPath {
    /// Validate and normalize `raw`.
    pub fn parse(raw: &str) -> Result<Self, DataError> {
        let trimmed = raw.strip_prefix('/').unwrap_or(raw);
        if trimmed.is_empty() {
            return Err(invalid(raw, "path is empty"));
        }
        if trimmed.split('/').any(str::is_empty) {
            return Err(invalid(raw, "path contains an empty segment"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The normalized path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The enclosing group, if the path has more than one segment.
    pub fn group(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(group, _)| group)
    }

    /// The last segment.
    pub fn name(&self) -> &str {
        self.0.rsplit_once('/').map_or(&self.0, |(_, name)| name)
    }

    /// Whether this path lies inside `group` (at any depth).
    pub fn is_in(&self, group: &str) -> bool {
        let group = group.trim_matches('/');
        group.is_empty()
            || self
                .0
                .strip_prefix(group)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn invalid(path: &str, reason: &str) -> DataError {
    DataError::InvalidDataset {
        path: path.to_owned(),
        reason: reason.to_owned(),
    }
}

//! Boundary selectors for non-periodic grids.

use std::fmt;
use std::str::FromStr;

use crate::error::GridError;

/// Which boundary of a non-periodic grid to select.
///
/// Axis 0 runs left to right, axis 1 bottom to top, axis 2 front to
/// back. `Left`, `Bottom` and `Front` are the low ends of their axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BoundarySelect {
    /// Every cell touching any boundary.
    #[default]
    All,
    /// Low end of axis 0.
    Left,
    /// High end of axis 0.
    Right,
    /// Low end of axis 1.
    Bottom,
    /// High end of axis 1.
    Top,
    /// Low end of axis 2.
    Front,
    /// High end of axis 2.
    Back,
}

impl BoundarySelect {
    const NAMES: [(&'static str, BoundarySelect); 7] = [
        ("all", Self::All),
        ("left", Self::Left),
        ("right", Self::Right),
        ("bottom", Self::Bottom),
        ("top", Self::Top),
        ("front", Self::Front),
        ("back", Self::Back),
    ];

    /// The name used in configurations.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Left => "left",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Top => "top",
            Self::Front => "front",
            Self::Back => "back",
        }
    }

    /// The axis and side (`false` = low, `true` = high) this selector
    /// refers to; `None` for [`All`](Self::All).
    pub fn axis_side(self) -> Option<(usize, bool)> {
        match self {
            Self::All => None,
            Self::Left => Some((0, false)),
            Self::Right => Some((0, true)),
            Self::Bottom => Some((1, false)),
            Self::Top => Some((1, true)),
            Self::Front => Some((2, false)),
            Self::Back => Some((2, true)),
        }
    }

    /// Check that this selector exists for a grid of dimensionality `dim`.
    pub fn check_dim(self, dim: usize) -> Result<Self, GridError> {
        match self.axis_side() {
            Some((axis, _)) if axis >= dim => Err(GridError::InvalidBoundary {
                select: self.as_str().into(),
                reason: format!("Not available for a {dim}-dimensional grid."),
            }),
            _ => Ok(self),
        }
    }
}

impl fmt::Display for BoundarySelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundarySelect {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, sel)| *sel)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::NAMES.iter().map(|(n, _)| *n).collect();
                GridError::InvalidBoundary {
                    select: s.into(),
                    reason: format!("Available: {}", names.join(", ")),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_names() {
        for (name, sel) in BoundarySelect::NAMES {
            assert_eq!(name.parse::<BoundarySelect>().unwrap(), sel);
            assert_eq!(sel.to_string(), name);
        }
    }

    #[test]
    fn invalid_name_message() {
        let err = "not a valid argument".parse::<BoundarySelect>().unwrap_err();
        assert!(err
            .to_string()
            .contains("Invalid value for argument `select` in call to method"));
    }

    #[test]
    fn third_axis_unavailable_in_2d() {
        assert!(BoundarySelect::Front.check_dim(2).is_err());
        assert!(BoundarySelect::Top.check_dim(2).is_ok());
        assert!(BoundarySelect::Bottom.check_dim(1).is_err());
        assert!(BoundarySelect::All.check_dim(1).is_ok());
    }
}

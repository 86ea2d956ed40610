//! Neighbor topology at the edges of a grid.

/// How a grid treats neighbor offsets that leave the index range.
///
/// Derived from the periodicity of the underlying [`Space`](crate::Space):
/// periodic spaces wrap, non-periodic spaces drop the offset.
///
/// # Examples
///
/// ```
/// use tessella_space::EdgeBehavior;
///
/// assert_eq!(EdgeBehavior::Wrap.resolve(-1, 5), Some(4));
/// assert_eq!(EdgeBehavior::Absorb.resolve(-1, 5), None);
/// assert_eq!(EdgeBehavior::Absorb.resolve(3, 5), Some(3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-range offsets wrap to the opposite side.
    Wrap,
    /// Out-of-range offsets are omitted (fewer neighbors at edges).
    Absorb,
}

impl EdgeBehavior {
    /// Resolve an axis index `val` on an axis of length `len`.
    ///
    /// Returns the in-range index, or `None` if the offset is absorbed.
    pub fn resolve(self, val: i64, len: usize) -> Option<usize> {
        let n = len as i64;
        if n == 0 {
            return None;
        }
        if (0..n).contains(&val) {
            return Some(val as usize);
        }
        match self {
            Self::Absorb => None,
            Self::Wrap => Some(val.rem_euclid(n) as usize),
        }
    }
}

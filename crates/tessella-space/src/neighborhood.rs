//! Neighborhood modes, their parameters, and the offset kernels of
//! rectangular grids.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use smallvec::SmallVec;
use tessella_core::{CellId, Config, ConfigError, NeighborIds};

/// A neighborhood function: maps a cell ID to its neighbors' IDs.
///
/// The function owns copies of the grid geometry it needs, so it can be
/// stored, cloned and called independently of the grid it came from.
pub type NbFunc = Arc<dyn Fn(CellId) -> NeighborIds + Send + Sync>;

/// A relative multi-index offset, one entry per dimension.
pub type Offset = SmallVec<[i64; 3]>;

/// The neighborhood modes a grid may support.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NbMode {
    /// No neighbors at all.
    #[default]
    Empty,
    /// Cells sharing a face (an L1 ball for larger distances).
    VonNeumann,
    /// Cells sharing a face, edge or corner (an L-infinity ball).
    Moore,
    /// The six cells around a hexagon.
    Hexagonal,
}

impl NbMode {
    /// Every mode, in declaration order.
    pub const ALL: [NbMode; 4] = [Self::Empty, Self::VonNeumann, Self::Moore, Self::Hexagonal];

    /// The configuration name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::VonNeumann => "vonNeumann",
            Self::Moore => "Moore",
            Self::Hexagonal => "hexagonal",
        }
    }
}

impl fmt::Display for NbMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NbMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownVariant {
                key: "mode".into(),
                value: s.into(),
                allowed: Self::ALL.iter().map(|m| m.as_str()).collect(),
            })
    }
}

/// Parameters shaping a neighborhood.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NbParams {
    /// Kernel radius: L1 distance for von Neumann, L-infinity for Moore.
    pub distance: usize,
}

impl Default for NbParams {
    fn default() -> Self {
        Self { distance: 1 }
    }
}

impl NbParams {
    /// Read the parameters from a neighborhood config node.
    ///
    /// `distance` is optional and defaults to 1; it must be at least 1.
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        let distance: usize = cfg.get_as_or("distance", 1)?;
        if distance == 0 {
            return Err(ConfigError::invalid(
                "distance",
                "neighborhood distance must be at least 1",
            ));
        }
        Ok(Self { distance })
    }
}

// ── Kernels ────────────────────────────────────────────────────────

/// Offsets of the von Neumann neighborhood of radius `d`.
///
/// The face neighbors come first, axis by axis, each axis listing
/// `-1, +1, -2, +2, ..., -d, +d`. Offsets with more than one non-zero
/// component follow in lexicographic order. For `d = 1` this is the
/// classic `2 * dim` kernel in axis order.
pub fn von_neumann_offsets(dim: usize, d: usize) -> Vec<Offset> {
    let d = d as i64;
    let mut out = Vec::new();
    for axis in 0..dim {
        for k in 1..=d {
            for sign in [-1, 1] {
                let mut o: Offset = SmallVec::from_elem(0, dim);
                o[axis] = sign * k;
                out.push(o);
            }
        }
    }
    for o in cube_offsets(dim, d) {
        let nonzero = o.iter().filter(|c| **c != 0).count();
        let l1: i64 = o.iter().map(|c| c.abs()).sum();
        if nonzero > 1 && l1 <= d {
            out.push(o);
        }
    }
    out
}

/// Offsets of the Moore neighborhood of radius `d`: every offset in
/// `{-d..=d}^dim` except the origin, in lexicographic order.
pub fn moore_offsets(dim: usize, d: usize) -> Vec<Offset> {
    cube_offsets(dim, d as i64)
        .into_iter()
        .filter(|o| o.iter().any(|c| *c != 0))
        .collect()
}

/// All offsets in `{-d..=d}^dim`, the first component most significant.
fn cube_offsets(dim: usize, d: i64) -> Vec<Offset> {
    let mut out: Vec<Offset> = vec![Offset::new()];
    for _ in 0..dim {
        let mut next = Vec::with_capacity(out.len() * (2 * d as usize + 1));
        for prefix in &out {
            for c in -d..=d {
                let mut o = prefix.clone();
                o.push(c);
                next.push(o);
            }
        }
        out = next;
    }
    out
}

//! Physical spaces and their grid discretizations.
//!
//! A [`Space`] describes the continuous domain of a simulation: its
//! dimensionality, its extent along each axis, and whether it is
//! periodic. A [`Grid`] discretizes a space into cells, maps between
//! cell IDs, multi-indices and positions, and provides neighborhood
//! functions.
//!
//! # Grids
//!
//! - [`SquareGrid`]: hyper-rectangular cells in 1, 2 or 3 dimensions,
//!   with `empty`, `vonNeumann` and `Moore` neighborhoods
//! - [`HexagonalGrid`]: pointy-top hexagons in 2D (geometry only)
//! - [`TriangularGrid`]: placeholder; constructs, but every cell query
//!   reports [`GridError::NotImplemented`]
//!
//! Use [`create_grid`] to build the variant named in a `grid` config node.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod edge;
pub mod error;
pub mod grid;
pub mod hexagonal;
pub mod neighborhood;
pub mod space;
pub mod square;
pub mod triangular;

#[cfg(test)]
pub(crate) mod compliance;

pub use boundary::BoundarySelect;
pub use edge::EdgeBehavior;
pub use error::GridError;
pub use grid::{create_grid, Grid, GridStructure};
pub use hexagonal::HexagonalGrid;
pub use neighborhood::{NbFunc, NbMode, NbParams};
pub use space::Space;
pub use square::SquareGrid;
pub use triangular::TriangularGrid;

//! **costgrid-core**: core types for cost-distance analysis on 2D grids.
//!
//! This crate provides the addressing primitives shared by the rest of the
//! *costgrid* workspace: the bijective mapping between linear cell ids and
//! (row, col) coordinates, grid shapes, and a row-major [`Raster`] used for
//! cost surfaces, barrier masks and per-cell results.

pub mod error;
pub mod geom;
pub mod raster;

pub use error::GridError;
pub use geom::{CellId, RowCol, Shape, ShapeIter, to_id, to_rowcol};
pub use raster::Raster;

//! Errors raised by cell addressing and raster construction.

use thiserror::Error;

use crate::geom::{CellId, Shape};

/// Invalid coordinates, ids or raster dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A (row, col) pair outside the grid.
    #[error("coordinate ({row}, {col}) is outside a {nrows}x{ncols} grid")]
    InvalidCoordinate {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },
    /// A linear cell id outside the grid.
    #[error("cell id {id} is outside a grid of {len} cells")]
    InvalidCellId { id: CellId, len: usize },
    /// Two rasters that must align have different shapes.
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: Shape, found: Shape },
    /// Backing data does not hold exactly one value per cell.
    #[error("expected {expected} values, found {found}")]
    DataLength { expected: usize, found: usize },
}

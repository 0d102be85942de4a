//! Cell addressing: [`RowCol`], [`Shape`] and the linear [`CellId`] mapping.
//!
//! Cells are numbered row-major, `id = row * ncols + col`. Every in-bounds
//! coordinate has exactly one id and every id below `nrows * ncols` has
//! exactly one coordinate.

use std::fmt;

use crate::error::GridError;

/// Linear, row-major index of a cell.
pub type CellId = usize;

// ---------------------------------------------------------------------------
// RowCol
// ---------------------------------------------------------------------------

/// A (row, col) grid coordinate. Row grows down, col grows right.
///
/// Ordering is row-major, matching the order of [`CellId`]s.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowCol {
    pub row: usize,
    pub col: usize,
}

impl RowCol {
    /// Create a new coordinate.
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for RowCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for RowCol {
    #[inline]
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<RowCol> for (usize, usize) {
    #[inline]
    fn from(rc: RowCol) -> Self {
        (rc.row, rc.col)
    }
}

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// Dimensions of a grid: `nrows` by `ncols`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    pub nrows: usize,
    pub ncols: usize,
}

impl Shape {
    /// Create a new shape.
    #[inline]
    pub const fn new(nrows: usize, ncols: usize) -> Self {
        Self { nrows, ncols }
    }

    /// Total number of cells.
    #[inline]
    pub const fn len(self) -> usize {
        self.nrows * self.ncols
    }

    /// Whether the shape has no cells.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.nrows == 0 || self.ncols == 0
    }

    /// Whether `rc` lies inside the grid.
    #[inline]
    pub const fn contains(self, rc: RowCol) -> bool {
        rc.row < self.nrows && rc.col < self.ncols
    }

    /// Linear id of `rc`, or `None` when out of bounds.
    #[inline]
    pub const fn checked_id(self, rc: RowCol) -> Option<CellId> {
        if self.contains(rc) {
            Some(rc.row * self.ncols + rc.col)
        } else {
            None
        }
    }

    /// Linear id of `rc`.
    pub fn id(self, rc: RowCol) -> Result<CellId, GridError> {
        self.checked_id(rc).ok_or(GridError::InvalidCoordinate {
            row: rc.row,
            col: rc.col,
            nrows: self.nrows,
            ncols: self.ncols,
        })
    }

    /// Coordinate of `id`, or `None` when out of bounds.
    #[inline]
    pub const fn checked_rowcol(self, id: CellId) -> Option<RowCol> {
        if id < self.len() {
            Some(RowCol::new(id / self.ncols, id % self.ncols))
        } else {
            None
        }
    }

    /// Coordinate of `id`.
    pub fn rowcol(self, id: CellId) -> Result<RowCol, GridError> {
        self.checked_rowcol(id).ok_or(GridError::InvalidCellId {
            id,
            len: self.len(),
        })
    }

    /// Step from `rc` by `(drow, dcol)`. Returns `None` if the result falls
    /// outside the grid.
    #[inline]
    pub fn offset(self, rc: RowCol, drow: isize, dcol: isize) -> Option<RowCol> {
        let row = rc.row.checked_add_signed(drow)?;
        let col = rc.col.checked_add_signed(dcol)?;
        let out = RowCol::new(row, col);
        self.contains(out).then_some(out)
    }

    /// Row-major iterator over every coordinate of the grid.
    #[inline]
    pub fn iter(self) -> ShapeIter {
        ShapeIter {
            shape: self,
            next: 0,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.nrows, self.ncols)
    }
}

impl IntoIterator for Shape {
    type Item = RowCol;
    type IntoIter = ShapeIter;
    #[inline]
    fn into_iter(self) -> ShapeIter {
        self.iter()
    }
}

/// Convert `(row, col)` to a cell id for a `nrows` by `ncols` grid.
pub fn to_id(row: usize, col: usize, nrows: usize, ncols: usize) -> Result<CellId, GridError> {
    Shape::new(nrows, ncols).id(RowCol::new(row, col))
}

/// Convert a cell id back to `(row, col)` for a `nrows` by `ncols` grid.
pub fn to_rowcol(id: CellId, nrows: usize, ncols: usize) -> Result<RowCol, GridError> {
    Shape::new(nrows, ncols).rowcol(id)
}

// ---------------------------------------------------------------------------
// ShapeIter
// ---------------------------------------------------------------------------

/// Row-major iterator over the coordinates of a [`Shape`].
#[derive(Clone, Debug)]
pub struct ShapeIter {
    shape: Shape,
    next: CellId,
}

impl Iterator for ShapeIter {
    type Item = RowCol;

    #[inline]
    fn next(&mut self) -> Option<RowCol> {
        let rc = self.shape.checked_rowcol(self.next)?;
        self.next += 1;
        Some(rc)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.shape.len().saturating_sub(self.next);
        (n, Some(n))
    }
}

impl ExactSizeIterator for ShapeIter {}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn rowcol_round_trip() {
        let rc = RowCol::new(4, 9);
        let json = serde_json::to_string(&rc).unwrap();
        let back: RowCol = serde_json::from_str(&json).unwrap();
        assert_eq!(rc, back);
    }

    #[test]
    fn shape_round_trip() {
        let shape = Shape::new(12, 5);
        let json = serde_json::to_string(&shape).unwrap();
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(shape, back);
    }
}

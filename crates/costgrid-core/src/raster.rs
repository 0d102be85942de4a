//! The [`Raster`] type: a row-major 2D array of per-cell values.
//!
//! A `Raster` owns its storage and never changes shape after construction.
//! It is indexed either by [`RowCol`] or by linear [`CellId`].

use std::ops::{Index, IndexMut};

use crate::error::GridError;
use crate::geom::{CellId, RowCol, Shape};

/// A 2D array of values stored row-major in a single `Vec`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Raster<T> {
    shape: Shape,
    data: Vec<T>,
}

impl<T: Clone> Raster<T> {
    /// Create a raster of the given shape with every cell set to `fill`.
    pub fn new(shape: Shape, fill: T) -> Self {
        Self {
            shape,
            data: vec![fill; shape.len()],
        }
    }
}

impl<T> Raster<T> {
    /// Wrap row-major `data`. Fails unless `data` holds exactly one value
    /// per cell.
    pub fn from_vec(shape: Shape, data: Vec<T>) -> Result<Self, GridError> {
        if data.len() != shape.len() {
            return Err(GridError::DataLength {
                expected: shape.len(),
                found: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Build a raster from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let shape = Shape::new(nrows, ncols);
        let mut data = Vec::with_capacity(shape.len());
        for row in rows {
            if row.len() != ncols {
                return Err(GridError::DataLength {
                    expected: ncols,
                    found: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self { shape, data })
    }

    /// Dimensions of the raster.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.shape.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.shape.ncols
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `rc`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, rc: RowCol) -> Option<&T> {
        self.shape.checked_id(rc).map(|id| &self.data[id])
    }

    /// Mutable value at `rc`, or `None` when out of bounds.
    #[inline]
    pub fn get_mut(&mut self, rc: RowCol) -> Option<&mut T> {
        self.shape.checked_id(rc).map(|id| &mut self.data[id])
    }

    /// Overwrite the value at `rc`.
    pub fn set(&mut self, rc: RowCol, value: T) -> Result<(), GridError> {
        let id = self.shape.id(rc)?;
        self.data[id] = value;
        Ok(())
    }

    /// Row-major view of all values.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major view of all values.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the raster, returning its row-major values.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Row-major iterator over all values.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// One row as a slice, or `None` when out of bounds.
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.shape.nrows {
            return None;
        }
        let start = row * self.shape.ncols;
        Some(&self.data[start..start + self.shape.ncols])
    }

    /// Apply `f` to every value, producing a raster of the same shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Raster<U> {
        Raster {
            shape: self.shape,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Check that this raster has shape `expected`.
    pub fn ensure_shape(&self, expected: Shape) -> Result<(), GridError> {
        if self.shape != expected {
            return Err(GridError::ShapeMismatch {
                expected,
                found: self.shape,
            });
        }
        Ok(())
    }
}

impl Raster<bool> {
    /// Coordinates of every `true` cell, in row-major order.
    pub fn positions(&self) -> Vec<RowCol> {
        self.shape
            .iter()
            .zip(self.data.iter())
            .filter_map(|(rc, &set)| set.then_some(rc))
            .collect()
    }

    /// Number of `true` cells.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&set| set).count()
    }
}

impl<T> Index<CellId> for Raster<T> {
    type Output = T;
    #[inline]
    fn index(&self, id: CellId) -> &T {
        &self.data[id]
    }
}

impl<T> IndexMut<CellId> for Raster<T> {
    #[inline]
    fn index_mut(&mut self, id: CellId) -> &mut T {
        &mut self.data[id]
    }
}

impl<T> Index<RowCol> for Raster<T> {
    type Output = T;
    #[inline]
    fn index(&self, rc: RowCol) -> &T {
        assert!(self.shape.contains(rc), "{rc} outside {} raster", self.shape);
        &self.data[rc.row * self.shape.ncols + rc.col]
    }
}

impl<T> IndexMut<RowCol> for Raster<T> {
    #[inline]
    fn index_mut(&mut self, rc: RowCol) -> &mut T {
        assert!(self.shape.contains(rc), "{rc} outside {} raster", self.shape);
        &mut self.data[rc.row * self.shape.ncols + rc.col]
    }
}

use costgrid_core::{CellId, GridError, Raster, RowCol, Shape};

use crate::error::Error;
use crate::search::Predecessors;

/// An ordered least-cost route, source first, target last.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    cells: Vec<RowCol>,
}

impl Path {
    /// Cells from source to target, inclusive.
    #[inline]
    pub fn cells(&self) -> &[RowCol] {
        &self.cells
    }

    /// Number of cells, including both endpoints. Never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn source(&self) -> RowCol {
        self.cells[0]
    }

    #[inline]
    pub fn target(&self) -> RowCol {
        self.cells[self.cells.len() - 1]
    }

    #[inline]
    pub fn into_cells(self) -> Vec<RowCol> {
        self.cells
    }

    /// Rasterize the path: `true` on every cell it visits.
    pub fn to_mask(&self, shape: Shape) -> Result<Raster<bool>, GridError> {
        let mut mask = Raster::new(shape, false);
        for &rc in &self.cells {
            mask.set(rc, true)?;
        }
        Ok(mask)
    }
}

/// Follow traceback links from `target` back to `source`.
///
/// Returns `Ok(None)` if the chain ends before reaching `source`, and a
/// single-cell path when `source == target`. A chain longer than the grid
/// means the links contain a cycle, reported as
/// [`Error::InternalInvariant`].
pub fn trace_path(
    predecessors: &Predecessors,
    source: CellId,
    target: CellId,
) -> Result<Option<Path>, Error> {
    let shape = predecessors.shape();
    shape.rowcol(source)?;
    shape.rowcol(target)?;

    let mut ids = vec![target];
    let mut ci = target;
    while ci != source {
        let Some(pred) = predecessors.get(ci) else {
            return Ok(None);
        };
        if ids.len() >= shape.len() {
            return Err(Error::InternalInvariant(format!(
                "traceback from {target} cycles before reaching {source}"
            )));
        }
        ids.push(pred);
        ci = pred;
    }
    ids.reverse();

    let cells = ids
        .into_iter()
        .map(|id| shape.rowcol(id))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Path { cells }))
}

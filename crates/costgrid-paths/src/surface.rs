//! Grid-native cost surface: edges are derived on the fly from cell costs.

use costgrid_core::{CellId, Raster, Shape};

use crate::distance::DIAGONAL_LENGTH;
use crate::error::Error;
use crate::neighbors::neighbors_8;
use crate::traits::{Edge, Pather};

/// A per-cell traversal cost grid, searched without building a graph.
///
/// Moving from a cell to one of its 8 neighbours costs the mean of the two
/// cell costs times the step length (1, or √2 on diagonals), so the cost of a
/// move is the same in both directions.
///
/// A cell is impassable when its cost is negative or not finite, or when it
/// is set in the optional barrier mask.
#[derive(Debug, Clone)]
pub struct CostSurface {
    costs: Raster<f64>,
    barriers: Option<Raster<bool>>,
}

impl CostSurface {
    /// Wrap a cost grid. Negative costs (conventionally `-1`) mark barriers.
    pub fn new(costs: Raster<f64>) -> Self {
        Self {
            costs,
            barriers: None,
        }
    }

    /// Wrap a cost grid together with a barrier mask of the same shape.
    pub fn with_barriers(costs: Raster<f64>, barriers: Raster<bool>) -> Result<Self, Error> {
        barriers.ensure_shape(costs.shape())?;
        Ok(Self {
            costs,
            barriers: Some(barriers),
        })
    }

    /// The underlying cost grid.
    #[inline]
    pub fn costs(&self) -> &Raster<f64> {
        &self.costs
    }

    /// The caller-supplied barrier mask, if any.
    #[inline]
    pub fn barriers(&self) -> Option<&Raster<bool>> {
        self.barriers.as_ref()
    }
}

impl Pather for CostSurface {
    #[inline]
    fn shape(&self) -> Shape {
        self.costs.shape()
    }

    #[inline]
    fn is_passable(&self, id: CellId) -> bool {
        let cost = self.costs[id];
        cost.is_finite() && cost >= 0.0 && !self.barriers.as_ref().is_some_and(|b| b[id])
    }

    fn edges(&self, from: CellId, buf: &mut Vec<Edge>) {
        if !self.is_passable(from) {
            return;
        }
        let here = self.costs[from];
        for (to, step) in neighbors_8(self.shape(), from) {
            if !self.is_passable(to) {
                continue;
            }
            let weight = 0.5 * (here + self.costs[to]) * step.length(DIAGONAL_LENGTH);
            buf.push(Edge { to, weight });
        }
    }
}

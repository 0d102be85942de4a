use costgrid_core::{CellId, Raster, Shape};

/// A directed, weighted edge to an adjacent cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: CellId,
    pub weight: f64,
}

/// Cost-distance search interface over a grid of cells.
///
/// Implemented by the grid-native [`CostSurface`](crate::CostSurface), which
/// derives edges on the fly, and by the materialized [`Graph`](crate::Graph).
pub trait Pather {
    /// Dimensions of the underlying grid.
    fn shape(&self) -> Shape;

    /// Whether a path may enter or leave `id`.
    fn is_passable(&self, id: CellId) -> bool;

    /// Append the outgoing edges of `from` into `buf`. The caller clears `buf`
    /// before calling. Weights must be non-negative and finite.
    fn edges(&self, from: CellId, buf: &mut Vec<Edge>);

    /// Mask of every impassable cell.
    fn barrier_mask(&self) -> Raster<bool> {
        let shape = self.shape();
        let mut mask = Raster::new(shape, false);
        for (id, blocked) in mask.as_mut_slice().iter_mut().enumerate() {
            *blocked = !self.is_passable(id);
        }
        mask
    }
}

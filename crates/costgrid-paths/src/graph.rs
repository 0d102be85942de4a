//! Directional graphs built from elevation grids.
//!
//! Every passable cell gets a directed edge to each passable 8-neighbour whose
//! elevation change the [`SlopePolicy`] admits. The weight is the absolute
//! elevation change, multiplied by [`DIAGONAL_FACTOR`] on diagonals. The
//! reverse edge is evaluated on its own, so the graph is directed.
//!
//! Edges are stored in compressed sparse row form: the outgoing edges of cell
//! `i` are `targets[offsets[i]..offsets[i + 1]]` with matching `weights`.

#[cfg(feature = "threading")]
use rayon::prelude::*;

use costgrid_core::{CellId, Raster, Shape};

use crate::config::SlopePolicy;
use crate::distance::DIAGONAL_FACTOR;
use crate::error::Error;
use crate::neighbors::neighbors_8;
use crate::traits::{Edge, Pather};

/// A directed, weighted graph over the cells of a grid, in CSR layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    shape: Shape,
    offsets: Vec<usize>,
    targets: Vec<CellId>,
    weights: Vec<f64>,
    blocked: Vec<bool>,
}

/// Build the directional graph of `dem`.
///
/// Cells set in `barriers`, and cells with a non-finite elevation, have no
/// edges in or out. Fails if both slope flags are set or if the mask shape
/// differs from the grid.
pub fn build_graph(
    dem: &Raster<f64>,
    barriers: Option<&Raster<bool>>,
    enforce_uphill: bool,
    enforce_downhill: bool,
) -> Result<Graph, Error> {
    let policy = SlopePolicy::from_flags(enforce_uphill, enforce_downhill)?;
    if let Some(mask) = barriers {
        mask.ensure_shape(dem.shape())?;
    }
    Ok(Graph::from_dem(dem, barriers, policy))
}

/// Whether `id` is impassable in the directional model.
#[inline]
pub(crate) fn is_blocked(dem: &Raster<f64>, barriers: Option<&Raster<bool>>, id: CellId) -> bool {
    !dem[id].is_finite() || barriers.is_some_and(|b| b[id])
}

/// Out-edges of one grid row, before concatenation.
struct RowEdges {
    degrees: Vec<usize>,
    targets: Vec<CellId>,
    weights: Vec<f64>,
}

fn row_edges(
    dem: &Raster<f64>,
    barriers: Option<&Raster<bool>>,
    policy: SlopePolicy,
    row: usize,
) -> RowEdges {
    let shape = dem.shape();
    let mut out = RowEdges {
        degrees: Vec::with_capacity(shape.ncols),
        targets: Vec::with_capacity(shape.ncols * 8),
        weights: Vec::with_capacity(shape.ncols * 8),
    };
    for col in 0..shape.ncols {
        let from = row * shape.ncols + col;
        let start = out.targets.len();
        if !is_blocked(dem, barriers, from) {
            for (to, step) in neighbors_8(shape, from) {
                if is_blocked(dem, barriers, to) {
                    continue;
                }
                let delta = dem[to] - dem[from];
                if !policy.admits(delta) {
                    continue;
                }
                out.targets.push(to);
                out.weights.push((step.length(DIAGONAL_FACTOR) * delta).abs());
            }
        }
        out.degrees.push(out.targets.len() - start);
    }
    out
}

impl Graph {
    /// Build the graph for an already validated grid, mask and policy.
    pub(crate) fn from_dem(
        dem: &Raster<f64>,
        barriers: Option<&Raster<bool>>,
        policy: SlopePolicy,
    ) -> Self {
        let shape = dem.shape();

        #[cfg(feature = "threading")]
        let rows: Vec<RowEdges> = (0..shape.nrows)
            .into_par_iter()
            .map(|row| row_edges(dem, barriers, policy, row))
            .collect();
        #[cfg(not(feature = "threading"))]
        let rows: Vec<RowEdges> = (0..shape.nrows)
            .map(|row| row_edges(dem, barriers, policy, row))
            .collect();

        let num_edges = rows.iter().map(|r| r.targets.len()).sum();
        let mut offsets = Vec::with_capacity(shape.len() + 1);
        let mut targets = Vec::with_capacity(num_edges);
        let mut weights = Vec::with_capacity(num_edges);
        offsets.push(0);
        for row in rows {
            for degree in row.degrees {
                let last = offsets[offsets.len() - 1];
                offsets.push(last + degree);
            }
            targets.extend(row.targets);
            weights.extend(row.weights);
        }

        let blocked = (0..shape.len())
            .map(|id| is_blocked(dem, barriers, id))
            .collect();

        log::debug!(
            "built directional graph: {shape} cells, {} edges, policy {policy:?}",
            targets.len()
        );

        Self {
            shape,
            offsets,
            targets,
            weights,
            blocked,
        }
    }

    /// Number of cells (nodes).
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.shape.len()
    }

    /// Number of directed edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.targets.len()
    }

    /// Number of edges leaving `from`.
    #[inline]
    pub fn out_degree(&self, from: CellId) -> usize {
        self.offsets[from + 1] - self.offsets[from]
    }

    /// Outgoing edges of `from`.
    pub fn edges_from(&self, from: CellId) -> impl Iterator<Item = Edge> + '_ {
        let span = self.offsets[from]..self.offsets[from + 1];
        self.targets[span.clone()]
            .iter()
            .zip(&self.weights[span])
            .map(|(&to, &weight)| Edge { to, weight })
    }

    /// Weight of the edge `from → to`, if present.
    pub fn weight(&self, from: CellId, to: CellId) -> Option<f64> {
        self.edges_from(from).find(|e| e.to == to).map(|e| e.weight)
    }

    /// The CSR arrays: offsets (one per cell plus one), targets, weights.
    pub fn as_csr(&self) -> (&[usize], &[CellId], &[f64]) {
        (&self.offsets, &self.targets, &self.weights)
    }
}

impl Pather for Graph {
    #[inline]
    fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    fn is_passable(&self, id: CellId) -> bool {
        !self.blocked[id]
    }

    fn edges(&self, from: CellId, buf: &mut Vec<Edge>) {
        buf.extend(self.edges_from(from));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use costgrid_core::RowCol;

    fn ramp() -> Raster<f64> {
        // Elevation rises to the east.
        Raster::from_rows(vec![
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0, 2.0],
        ])
        .unwrap()
    }

    #[test]
    fn both_slope_flags_is_config_error() {
        let err = build_graph(&ramp(), None, true, true).unwrap_err();
        assert_eq!(err, Error::ConflictingSlopePolicy);
        assert_eq!(err.kind(), crate::ErrorKind::Config);
    }

    #[test]
    fn mask_shape_mismatch_is_rejected() {
        let mask = Raster::new(Shape::new(2, 3), false);
        assert!(matches!(
            build_graph(&ramp(), Some(&mask), false, false),
            Err(Error::Grid(_))
        ));
    }

    #[test]
    fn unrestricted_graph_has_every_neighbor_pair() {
        let g = build_graph(&ramp(), None, false, false).unwrap();
        // 3x3 grid: 4 corners x 3 + 4 edges x 5 + 1 centre x 8.
        assert_eq!(g.num_edges(), 40);
        assert_eq!(g.out_degree(4), 8);
        assert_eq!(g.out_degree(0), 3);
        let (offsets, _, _) = g.as_csr();
        assert_eq!(offsets.len(), 10);
        assert_eq!(offsets[9], 40);
    }

    #[test]
    fn weights_are_scaled_absolute_deltas() {
        let g = build_graph(&ramp(), None, false, false).unwrap();
        // East: +1. West: -1. North-east diagonal: +1 * 1.41. Due south: 0.
        assert_relative_eq!(g.weight(4, 5).unwrap(), 1.0);
        assert_relative_eq!(g.weight(4, 3).unwrap(), 1.0);
        assert_relative_eq!(g.weight(4, 2).unwrap(), 1.41);
        assert_relative_eq!(g.weight(4, 7).unwrap(), 0.0);
        assert_eq!(g.weight(0, 8), None);
    }

    #[test]
    fn uphill_only_drops_descending_edges() {
        let g = build_graph(&ramp(), None, true, false).unwrap();
        assert!(g.weight(4, 5).is_some());
        assert!(g.weight(4, 7).is_some());
        assert_eq!(g.weight(4, 3), None);
        assert_eq!(g.weight(4, 6), None);
        // The reverse of a kept edge is evaluated on its own.
        assert!(g.weight(3, 4).is_some());
        assert_eq!(g.weight(5, 4), None);
    }

    #[test]
    fn downhill_only_drops_ascending_edges() {
        let g = build_graph(&ramp(), None, false, true).unwrap();
        assert_eq!(g.weight(4, 5), None);
        assert!(g.weight(4, 3).is_some());
        assert!(g.weight(4, 1).is_some());
    }

    #[test]
    fn barrier_cells_have_no_incident_edges() {
        let dem = ramp();
        let mut mask = Raster::new(dem.shape(), false);
        mask.set(RowCol::new(1, 1), true).unwrap();
        let g = build_graph(&dem, Some(&mask), false, false).unwrap();
        assert_eq!(g.out_degree(4), 0);
        for from in 0..g.num_cells() {
            assert!(g.edges_from(from).all(|e| e.to != 4));
        }
        assert!(!g.is_passable(4));
        assert_eq!(g.num_edges(), 40 - 16);
    }

    #[test]
    fn non_finite_elevation_is_blocked() {
        let dem = Raster::from_rows(vec![vec![0.0, f64::NAN], vec![0.0, 0.0]]).unwrap();
        let g = build_graph(&dem, None, false, false).unwrap();
        assert!(!g.is_passable(1));
        assert_eq!(g.out_degree(1), 0);
        assert!(g.edges_from(0).all(|e| e.to != 1));
    }

    #[test]
    fn flat_dem_has_zero_weights() {
        let dem = Raster::new(Shape::new(4, 5), 12.5);
        let g = build_graph(&dem, None, false, false).unwrap();
        let (_, _, weights) = g.as_csr();
        assert!(!weights.is_empty());
        assert!(weights.iter().all(|&w| w == 0.0));
    }

    #[test]
    fn isolated_cell_is_not_an_error() {
        // A pit: every neighbour is lower, so uphill-only leaves no out-edges
        // from the centre.
        let dem = Raster::from_rows(vec![
            vec![0.0, 0.0, 0.0],
            vec![0.0, 5.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap();
        let g = build_graph(&dem, None, true, false).unwrap();
        assert_eq!(g.out_degree(4), 0);
        assert!(g.is_passable(4));
    }
}

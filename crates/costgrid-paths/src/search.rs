use std::cmp::Ordering;

use costgrid_core::{CellId, GridError, Raster, RowCol, Shape};

/// Sentinel predecessor for sources, barriers and unreached cells.
pub const NO_PREDECESSOR: CellId = usize::MAX;

/// Sentinel owner for barriers and unreached cells.
pub const NO_OWNER: CellId = usize::MAX;

// ---------------------------------------------------------------------------
// Predecessors
// ---------------------------------------------------------------------------

/// Per-cell traceback links: the neighbour through which each cell's minimum
/// cost was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Predecessors {
    shape: Shape,
    links: Vec<CellId>,
}

impl Predecessors {
    /// Wrap raw links, one per cell, using [`NO_PREDECESSOR`] for "none".
    pub fn from_vec(shape: Shape, links: Vec<CellId>) -> Result<Self, GridError> {
        if links.len() != shape.len() {
            return Err(GridError::DataLength {
                expected: shape.len(),
                found: links.len(),
            });
        }
        Ok(Self { shape, links })
    }

    pub(crate) fn unlinked(shape: Shape) -> Self {
        Self {
            shape,
            links: vec![NO_PREDECESSOR; shape.len()],
        }
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Predecessor of `id`, or `None` for sources, barriers, unreached cells
    /// and out-of-range ids.
    #[inline]
    pub fn get(&self, id: CellId) -> Option<CellId> {
        match self.links.get(id) {
            Some(&p) if p != NO_PREDECESSOR => Some(p),
            _ => None,
        }
    }

    /// Raw links, [`NO_PREDECESSOR`] where there is none.
    #[inline]
    pub fn as_slice(&self) -> &[CellId] {
        &self.links
    }

    #[inline]
    pub(crate) fn set(&mut self, id: CellId, pred: CellId) {
        self.links[id] = pred;
    }
}

// ---------------------------------------------------------------------------
// ShortestPaths
// ---------------------------------------------------------------------------

/// Result of a multi-source expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    pub(crate) costs: Raster<f64>,
    pub(crate) predecessors: Predecessors,
    pub(crate) owners: Raster<CellId>,
    pub(crate) sources: Vec<CellId>,
}

impl ShortestPaths {
    /// Cumulative minimum cost per cell; `f64::INFINITY` where unreached.
    #[inline]
    pub fn costs(&self) -> &Raster<f64> {
        &self.costs
    }

    /// Traceback links.
    #[inline]
    pub fn predecessors(&self) -> &Predecessors {
        &self.predecessors
    }

    /// Id of the source that claimed each cell; [`NO_OWNER`] where unreached.
    #[inline]
    pub fn owners(&self) -> &Raster<CellId> {
        &self.owners
    }

    /// Distinct source ids, in the order they were first supplied.
    #[inline]
    pub fn sources(&self) -> &[CellId] {
        &self.sources
    }

    /// Cumulative cost at `rc`. `None` if `rc` is out of bounds.
    pub fn cost_at(&self, rc: RowCol) -> Option<f64> {
        self.costs.get(rc).copied()
    }

    /// Coordinate of the source that claimed `rc`, if any.
    pub fn owner_at(&self, rc: RowCol) -> Option<RowCol> {
        let &owner = self.owners.get(rc)?;
        self.owners.shape().checked_rowcol(owner)
    }

    /// Whether `id` was reached by any source.
    #[inline]
    pub fn is_reached(&self, id: CellId) -> bool {
        self.owners.as_slice().get(id).is_some_and(|&o| o != NO_OWNER)
    }

    /// Split into (costs, predecessors, owners).
    pub fn into_parts(self) -> (Raster<f64>, Predecessors, Raster<CellId>) {
        (self.costs, self.predecessors, self.owners)
    }
}

// ---------------------------------------------------------------------------
// Frontier entries
// ---------------------------------------------------------------------------

/// Frontier entry, ordered so that `BinaryHeap` (a max-heap) pops the lowest
/// `(cost, owner, idx)` first.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef {
    pub(crate) idx: CellId,
    pub(crate) cost: f64,
    pub(crate) owner: CellId,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.owner.cmp(&self.owner))
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

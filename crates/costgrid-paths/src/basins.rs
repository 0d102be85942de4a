//! Basin delineation: which source claims each cell.
//!
//! Owner labels written during expansion are not trusted on their own.
//! Instead, every traceback link is treated as an undirected edge and the
//! cells are grouped into connected components with a union-find. Each
//! component is a single traceback tree, so it holds exactly one source, and
//! every cell in it is labelled with that source's id.

use std::collections::BTreeMap;

#[cfg(feature = "threading")]
use rayon::prelude::*;

use costgrid_core::{CellId, Raster, RowCol, Shape};

use crate::error::Error;
use crate::search::Predecessors;
use crate::union_find::UnionFind;

/// Label of barrier cells.
pub const BARRIER_LABEL: i64 = -1;

/// Label of passable cells no source reached.
pub const UNREACHED_LABEL: i64 = -2;

/// Decoded basin label of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basin {
    /// Claimed by the source at this coordinate.
    Outlet(RowCol),
    Barrier,
    Unreached,
}

/// Per-cell basin labels: a source's cell id, [`BARRIER_LABEL`] or
/// [`UNREACHED_LABEL`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasinLabels {
    labels: Raster<i64>,
}

impl BasinLabels {
    #[inline]
    pub fn shape(&self) -> Shape {
        self.labels.shape()
    }

    /// The raw label raster.
    #[inline]
    pub fn as_raster(&self) -> &Raster<i64> {
        &self.labels
    }

    #[inline]
    pub fn into_raster(self) -> Raster<i64> {
        self.labels
    }

    /// Raw label at `rc`, or `None` when out of bounds.
    #[inline]
    pub fn label_at(&self, rc: RowCol) -> Option<i64> {
        self.labels.get(rc).copied()
    }

    /// Decoded label at `rc`, or `None` when out of bounds.
    pub fn basin_at(&self, rc: RowCol) -> Option<Basin> {
        let label = self.label_at(rc)?;
        Some(match label {
            BARRIER_LABEL => Basin::Barrier,
            UNREACHED_LABEL => Basin::Unreached,
            id => Basin::Outlet(self.shape().checked_rowcol(id as CellId)?),
        })
    }

    /// Number of cells in each basin, keyed by outlet coordinate.
    pub fn areas(&self) -> BTreeMap<RowCol, usize> {
        let shape = self.shape();
        let mut areas = BTreeMap::new();
        for &label in self.labels.iter() {
            if label < 0 {
                continue;
            }
            if let Some(outlet) = shape.checked_rowcol(label as CellId) {
                *areas.entry(outlet).or_insert(0) += 1;
            }
        }
        areas
    }
}

/// Group cells into basins by traceback connectivity.
///
/// `sources` are the expansion origins; `owners` is the per-cell owner grid
/// from the same expansion. Barrier cells always get [`BARRIER_LABEL`]; cells
/// without a traceback link that are not sources get [`UNREACHED_LABEL`].
///
/// Fails with [`Error::InternalInvariant`] if a source has a traceback link,
/// if a reached component contains no source, or if one contains two.
pub fn delineate_basins(
    predecessors: &Predecessors,
    owners: &Raster<CellId>,
    sources: &[CellId],
    barriers: &Raster<bool>,
) -> Result<BasinLabels, Error> {
    let shape = predecessors.shape();
    owners.ensure_shape(shape)?;
    barriers.ensure_shape(shape)?;
    let len = shape.len();

    let mut uf = UnionFind::new(len);
    for id in 0..len {
        if let Some(pred) = predecessors.get(id) {
            shape.rowcol(pred)?;
            uf.union(id, pred);
        }
    }
    let roots = uf.roots();

    let mut is_source = vec![false; len];
    let mut outlet_of_root = vec![None; len];
    for &src in sources {
        shape.rowcol(src)?;
        if predecessors.get(src).is_some() {
            return Err(Error::InternalInvariant(format!(
                "source {src} has a traceback link"
            )));
        }
        is_source[src] = true;
        let root = roots[src];
        let existing = outlet_of_root[root];
        match existing {
            None => outlet_of_root[root] = Some(src),
            Some(other) if other == src => {}
            Some(other) => {
                return Err(Error::InternalInvariant(format!(
                    "sources {other} and {src} share one traceback component"
                )));
            }
        }
    }

    let label_for = |id: CellId| -> Result<i64, Error> {
        if barriers[id] {
            return Ok(BARRIER_LABEL);
        }
        if !is_source[id] && predecessors.get(id).is_none() {
            return Ok(UNREACHED_LABEL);
        }
        match outlet_of_root[roots[id]] {
            Some(outlet) => Ok(outlet as i64),
            None => Err(Error::InternalInvariant(format!(
                "cell {id} is reached but its component has no source"
            ))),
        }
    };

    #[cfg(feature = "threading")]
    let labels: Vec<i64> = (0..len)
        .into_par_iter()
        .map(label_for)
        .collect::<Result<_, _>>()?;
    #[cfg(not(feature = "threading"))]
    let labels: Vec<i64> = (0..len).map(label_for).collect::<Result<_, _>>()?;

    let disagreements = labels
        .iter()
        .zip(owners.iter())
        .filter(|&(&label, &owner)| label >= 0 && owner != label as CellId)
        .count();
    if disagreements > 0 {
        log::debug!("{disagreements} cells relabelled from their expansion owner");
    }

    Ok(BasinLabels {
        labels: Raster::from_vec(shape, labels)?,
    })
}

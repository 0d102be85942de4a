//! The [`CostDistance`] facade: least-cost paths and cost accumulation over
//! either a cost surface or an elevation-derived directional graph.

use std::sync::OnceLock;

use costgrid_core::{CellId, Raster, RowCol, Shape};

use crate::basins::{BasinLabels, delineate_basins};
use crate::config::{CostDistanceConfig, Method, SlopePolicy};
use crate::dijkstra::search;
use crate::error::{CellRole, Error};
use crate::graph::{Graph, is_blocked};
use crate::search::ShortestPaths;
use crate::surface::CostSurface;
use crate::trace::{Path, trace_path};
use crate::traits::{Edge, Pather};

/// Cumulative costs and basin labels from one accumulation query.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulation {
    pub costs: Raster<f64>,
    pub basins: BasinLabels,
}

#[derive(Debug)]
enum Backend {
    Omnidirectional(CostSurface),
    Directional {
        dem: Raster<f64>,
        barriers: Option<Raster<bool>>,
        policy: SlopePolicy,
        graph: OnceLock<Graph>,
    },
}

/// Least-cost path and cost-accumulation queries over one grid.
///
/// The method is fixed at construction. In directional mode the graph is
/// built on first use and shared by every later query, including queries
/// from other threads.
#[derive(Debug)]
pub struct CostDistance {
    backend: Backend,
}

/// The searchable view of a backend.
enum ActivePather<'a> {
    Surface(&'a CostSurface),
    Graph(&'a Graph),
}

impl Pather for ActivePather<'_> {
    #[inline]
    fn shape(&self) -> Shape {
        match self {
            Self::Surface(s) => s.shape(),
            Self::Graph(g) => g.shape(),
        }
    }

    #[inline]
    fn is_passable(&self, id: CellId) -> bool {
        match self {
            Self::Surface(s) => s.is_passable(id),
            Self::Graph(g) => g.is_passable(id),
        }
    }

    #[inline]
    fn edges(&self, from: CellId, buf: &mut Vec<Edge>) {
        match self {
            Self::Surface(s) => s.edges(from, buf),
            Self::Graph(g) => g.edges(from, buf),
        }
    }
}

impl CostDistance {
    /// Build a facade from a configuration.
    ///
    /// `grid` holds per-cell cost (omnidirectional) or elevation
    /// (directional). `barriers`, if given, must have the grid's shape.
    pub fn new(
        config: &CostDistanceConfig,
        grid: Raster<f64>,
        barriers: Option<Raster<bool>>,
    ) -> Result<Self, Error> {
        config.validate()?;
        match config.method {
            Method::Omnidirectional => {
                let surface = match barriers {
                    Some(mask) => CostSurface::with_barriers(grid, mask)?,
                    None => CostSurface::new(grid),
                };
                Ok(Self {
                    backend: Backend::Omnidirectional(surface),
                })
            }
            Method::Directional => Self::directional(grid, barriers, config.slope),
        }
    }

    /// Grid-native facade over a cost surface. Negative costs are barriers.
    pub fn omnidirectional(costs: Raster<f64>) -> Self {
        Self {
            backend: Backend::Omnidirectional(CostSurface::new(costs)),
        }
    }

    /// Directional facade over an elevation grid.
    pub fn directional(
        dem: Raster<f64>,
        barriers: Option<Raster<bool>>,
        policy: SlopePolicy,
    ) -> Result<Self, Error> {
        if let Some(mask) = &barriers {
            mask.ensure_shape(dem.shape())?;
        }
        Ok(Self {
            backend: Backend::Directional {
                dem,
                barriers,
                policy,
                graph: OnceLock::new(),
            },
        })
    }

    /// The configured method.
    pub fn method(&self) -> Method {
        match self.backend {
            Backend::Omnidirectional(_) => Method::Omnidirectional,
            Backend::Directional { .. } => Method::Directional,
        }
    }

    /// Dimensions of the grid.
    pub fn shape(&self) -> Shape {
        match &self.backend {
            Backend::Omnidirectional(surface) => surface.shape(),
            Backend::Directional { dem, .. } => dem.shape(),
        }
    }

    /// The directional graph, built now if this is the first use. `None` in
    /// omnidirectional mode.
    pub fn graph(&self) -> Option<&Graph> {
        match self.pather() {
            ActivePather::Surface(_) => None,
            ActivePather::Graph(graph) => Some(graph),
        }
    }

    /// Mask of every cell no path may enter.
    pub fn barrier_mask(&self) -> Raster<bool> {
        match &self.backend {
            Backend::Omnidirectional(surface) => surface.barrier_mask(),
            Backend::Directional { dem, barriers, .. } => {
                let mut mask = Raster::new(dem.shape(), false);
                for (id, blocked) in mask.as_mut_slice().iter_mut().enumerate() {
                    *blocked = is_blocked(dem, barriers.as_ref(), id);
                }
                mask
            }
        }
    }

    /// Whether `id` is a barrier, answered without building the graph.
    fn is_barrier(&self, id: CellId) -> bool {
        match &self.backend {
            Backend::Omnidirectional(surface) => !surface.is_passable(id),
            Backend::Directional { dem, barriers, .. } => is_blocked(dem, barriers.as_ref(), id),
        }
    }

    /// Validate a query cell and convert it to an id.
    fn resolve(&self, rc: RowCol, role: CellRole) -> Result<CellId, Error> {
        let id = self.shape().id(rc)?;
        if self.is_barrier(id) {
            return Err(Error::BarrierCell { role, at: rc });
        }
        Ok(id)
    }

    fn pather(&self) -> ActivePather<'_> {
        match &self.backend {
            Backend::Omnidirectional(surface) => ActivePather::Surface(surface),
            Backend::Directional {
                dem,
                barriers,
                policy,
                graph,
            } => ActivePather::Graph(graph.get_or_init(|| {
                log::debug!("building directional graph for a {} grid", dem.shape());
                Graph::from_dem(dem, barriers.as_ref(), *policy)
            })),
        }
    }

    /// Least-cost path from `source` to `target`, both inclusive.
    ///
    /// Returns `Ok(None)` when `target` cannot be reached from `source`.
    pub fn trace_path(&self, source: RowCol, target: RowCol) -> Result<Option<Path>, Error> {
        let s = self.resolve(source, CellRole::Source)?;
        let t = self.resolve(target, CellRole::Target)?;
        let paths = search(&self.pather(), &[s], Some(t))?;
        trace_path(paths.predecessors(), s, t)
    }

    /// Raw multi-source expansion: costs, traceback links and owners.
    pub fn shortest_paths(&self, sources: &[RowCol]) -> Result<ShortestPaths, Error> {
        let ids = sources
            .iter()
            .map(|&rc| self.resolve(rc, CellRole::Source))
            .collect::<Result<Vec<_>, _>>()?;
        search(&self.pather(), &ids, None)
    }

    /// Cumulative least cost from the nearest source to every cell, and the
    /// basin each cell drains to.
    pub fn cost_accumulation(&self, sources: &[RowCol]) -> Result<Accumulation, Error> {
        let paths = self.shortest_paths(sources)?;
        let mask = self.barrier_mask();
        let basins = delineate_basins(paths.predecessors(), paths.owners(), paths.sources(), &mask)?;
        let (costs, _, _) = paths.into_parts();
        Ok(Accumulation { costs, basins })
    }

    /// [`cost_accumulation`](Self::cost_accumulation) with the sources given
    /// as the `true` cells of a mask shaped like the grid.
    pub fn cost_accumulation_from_mask(&self, sources: &Raster<bool>) -> Result<Accumulation, Error> {
        sources.ensure_shape(self.shape())?;
        self.cost_accumulation(&sources.positions())
    }
}

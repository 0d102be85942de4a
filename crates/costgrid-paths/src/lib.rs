//! Least-cost paths, cost accumulation and basin delineation on 2D grids.
//!
//! Two cost models are supported, selected once per [`CostDistance`]:
//!
//! - **Omnidirectional**: the grid holds per-cell traversal cost and edges
//!   are derived on the fly ([`CostSurface`]).
//! - **Directional**: the grid holds elevation and a directed graph of
//!   elevation-change costs is built once, in CSR form ([`build_graph`]).
//!
//! Both are searched by the same multi-source Dijkstra
//! ([`shortest_paths`]), whose traceback links feed the path tracer
//! ([`trace_path`]) and the basin delineator ([`delineate_basins`]).
//!
//! # Trait hierarchy
//!
//! | Trait | Implemented by |
//! |---|---|
//! | [`Pather`] | [`CostSurface`], [`Graph`] |

mod basins;
mod config;
mod cost_distance;
mod dijkstra;
mod distance;
mod error;
mod graph;
mod neighbors;
mod search;
mod surface;
mod trace;
mod traits;
mod union_find;

pub use basins::{BARRIER_LABEL, Basin, BasinLabels, UNREACHED_LABEL, delineate_basins};
pub use config::{CostDistanceConfig, Method, SlopePolicy};
pub use cost_distance::{Accumulation, CostDistance};
pub use dijkstra::shortest_paths;
pub use distance::{DIAGONAL_FACTOR, DIAGONAL_LENGTH, chebyshev, manhattan};
pub use error::{CellRole, Error, ErrorKind};
pub use graph::{Graph, build_graph};
pub use neighbors::{STEPS_8, Step, neighbors_8};
pub use search::{NO_OWNER, NO_PREDECESSOR, Predecessors, ShortestPaths};
pub use surface::CostSurface;
pub use trace::{Path, trace_path};
pub use traits::{Edge, Pather};

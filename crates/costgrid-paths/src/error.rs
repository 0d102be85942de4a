//! Error type for cost-distance queries.

use std::fmt;

use costgrid_core::{GridError, RowCol};
use thiserror::Error;

use crate::config::SlopePolicy;

/// Which end of a query a cell was supplied as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    Source,
    Target,
}

impl fmt::Display for CellRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Broad class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The query or facade was configured inconsistently.
    Config,
    /// The caller supplied cells or rasters that do not fit the grid.
    InvalidInput,
    /// The engine produced inconsistent internal state.
    Internal,
}

/// Errors returned by graph construction, searches and the facade.
///
/// An unreachable target is not an error: it is reported as `Ok(None)` or as
/// an infinite cost.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("enforce_uphill and enforce_downhill are mutually exclusive")]
    ConflictingSlopePolicy,
    #[error("slope policy {policy:?} is only valid with the directional method")]
    SlopePolicyNeedsDirectional { policy: SlopePolicy },
    #[error("unknown cost-distance method {0:?}")]
    UnknownMethod(String),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("{role} {at} is a barrier cell")]
    BarrierCell { role: CellRole, at: RowCol },
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

impl Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConflictingSlopePolicy
            | Self::SlopePolicyNeedsDirectional { .. }
            | Self::UnknownMethod(_) => ErrorKind::Config,
            Self::Grid(_) | Self::BarrierCell { .. } => ErrorKind::InvalidInput,
            Self::InternalInvariant(_) => ErrorKind::Internal,
        }
    }
}

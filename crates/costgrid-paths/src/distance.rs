use costgrid_core::RowCol;

/// Diagonal multiplier applied to elevation deltas in directional graphs.
pub const DIAGONAL_FACTOR: f64 = 1.41;

/// Length of a diagonal step in the grid-native cost model.
pub const DIAGONAL_LENGTH: f64 = std::f64::consts::SQRT_2;

/// Chebyshev (L∞) distance between two cells: the number of 8-connected
/// steps on the shortest unweighted route.
#[inline]
pub fn chebyshev(a: RowCol, b: RowCol) -> usize {
    a.row.abs_diff(b.row).max(a.col.abs_diff(b.col))
}

/// Manhattan (L1) distance between two cells.
#[inline]
pub fn manhattan(a: RowCol, b: RowCol) -> usize {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

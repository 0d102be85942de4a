use costgrid_core::{CellId, Shape};

/// A unit move between 8-connected cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub drow: isize,
    pub dcol: isize,
}

impl Step {
    /// Create a new step.
    #[inline]
    pub const fn new(drow: isize, dcol: isize) -> Self {
        Self { drow, dcol }
    }

    /// Whether the step moves along both axes.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.drow != 0 && self.dcol != 0
    }

    /// Length of the step: 1 for axis-aligned moves, `diagonal` otherwise.
    #[inline]
    pub const fn length(self, diagonal: f64) -> f64 {
        if self.is_diagonal() { diagonal } else { 1.0 }
    }
}

/// The eight neighbour steps, clockwise from north.
pub const STEPS_8: [Step; 8] = [
    Step::new(-1, 0),
    Step::new(-1, 1),
    Step::new(0, 1),
    Step::new(1, 1),
    Step::new(1, 0),
    Step::new(1, -1),
    Step::new(0, -1),
    Step::new(-1, -1),
];

/// In-bounds 8-connected neighbours of `from`, paired with the step that
/// reaches them. `from` must be a valid id for `shape`.
pub fn neighbors_8(shape: Shape, from: CellId) -> impl Iterator<Item = (CellId, Step)> {
    let origin = shape.checked_rowcol(from);
    STEPS_8.into_iter().filter_map(move |step| {
        let rc = shape.offset(origin?, step.drow, step.dcol)?;
        shape.checked_id(rc).map(|id| (id, step))
    })
}

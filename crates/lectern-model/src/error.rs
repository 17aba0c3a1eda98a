use thiserror::Error;

use crate::{Axis, Fill, GridPos};

/// Errors raised by structural table edits.
///
/// Every variant is detected before the table is touched, so a failed call leaves the
/// grid exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("cannot merge cell {pos} with itself")]
    SameCellMerge { pos: GridPos },
    #[error("{axis} index {index} is out of range (table has {len})")]
    GridIndexOutOfRange { axis: Axis, index: usize, len: usize },
    #[error("cannot add a row to a table with no columns")]
    EmptyTableMutation,
    #[error("invalid size {value} EMU (sizes must be non-negative)")]
    InvalidSize { value: i64 },
}

/// Malformed grid data discovered while loading a persisted table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("row {row} has {found} cells, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell {pos} declares a zero span")]
    InvalidSpan { pos: GridPos },
    #[error("span {row_span}x{col_span} anchored at {pos} extends past the grid")]
    SpanOutOfBounds {
        pos: GridPos,
        row_span: usize,
        col_span: usize,
    },
    #[error("cell {pos} is claimed by more than one merged region")]
    OverlappingSpans { pos: GridPos },
    #[error("cell {pos} is marked as merged but no span covers it")]
    OrphanCovered { pos: GridPos },
    #[error("cell {pos} lies inside a declared span but is not marked as merged")]
    SpanMismatch { pos: GridPos },
    #[error("merged cell {pos} carries its own content")]
    CoveredCellHasContent { pos: GridPos },
    #[error("negative size {value} EMU")]
    NegativeSize { value: i64 },
    #[error("{axis} sizes overflow the EMU range")]
    SizeOverflow { axis: Axis },
}

/// A problem in persisted grid data that loading repairs instead of rejecting.
///
/// Returned by [`crate::Table::from_raw_with_warnings`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadWarning {
    #[error("dropped fill {fill:?} of merged cell {pos}")]
    CoveredFillDropped { pos: GridPos, fill: Fill },
}

/// A grid invariant that does not hold, as reported by [`crate::Table::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridViolation {
    #[error("row {row} has {found} positions, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell {pos} references {anchor}, which is not an anchor covering it")]
    DanglingCover { pos: GridPos, anchor: GridPos },
    #[error("anchor {pos} spans past the grid")]
    SpanOutOfBounds { pos: GridPos },
    #[error("anchor {pos} spans position {covered}, which is not covered by it")]
    SpanGap { pos: GridPos, covered: GridPos },
    #[error("anchor {pos} declares a 1x1 or empty span")]
    DegenerateSpan { pos: GridPos },
    #[error("covered cell {pos} carries its own content")]
    CoveredContent { pos: GridPos },
    #[error("{axis} {index} has negative size {value} EMU")]
    NegativeSize { axis: Axis, index: usize, value: i64 },
    #[error("{axis} sizes overflow the EMU range")]
    SizeOverflow { axis: Axis },
    #[error("{axis} sizes sum to {sum} EMU but the table frame is {frame} EMU")]
    SizeMismatch { axis: Axis, sum: i64, frame: i64 },
}

use core::fmt;

use serde::{Deserialize, Serialize};

/// A position within a table grid.
///
/// Rows and columns are **0-indexed**.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    /// 0-indexed row.
    pub row: usize,
    /// 0-indexed column.
    pub col: usize,
}

impl GridPos {
    /// Construct a new [`GridPos`].
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Index of this position along `axis`.
    #[inline]
    pub const fn along(self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.row,
            Axis::Column => self.col,
        }
    }
}

impl From<(usize, usize)> for GridPos {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The two structural axes of a table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    /// The other axis.
    pub const fn cross(self) -> Axis {
        match self {
            Axis::Row => Axis::Column,
            Axis::Column => Axis::Row,
        }
    }

    /// Position at `offset` along the line `line` of this axis (row `line` for
    /// [`Axis::Row`], column `line` for [`Axis::Column`]).
    pub const fn pos(self, line: usize, offset: usize) -> GridPos {
        match self {
            Axis::Row => GridPos::new(line, offset),
            Axis::Column => GridPos::new(offset, line),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::Row => "row",
            Axis::Column => "column",
        })
    }
}

/// A rectangular region of a table grid.
///
/// The rectangle is inclusive and always normalized such that:
/// - `start.row <= end.row`
/// - `start.col <= end.col`
///
/// `start` is the top-left position, which is where a merged region keeps its anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRect {
    pub start: GridPos,
    pub end: GridPos,
}

impl GridRect {
    /// Construct a new rectangle, normalizing coordinates if needed.
    pub const fn new(a: GridPos, b: GridPos) -> Self {
        let start_row = if a.row <= b.row { a.row } else { b.row };
        let end_row = if a.row <= b.row { b.row } else { a.row };
        let start_col = if a.col <= b.col { a.col } else { b.col };
        let end_col = if a.col <= b.col { b.col } else { a.col };
        Self {
            start: GridPos::new(start_row, start_col),
            end: GridPos::new(end_row, end_col),
        }
    }

    /// Rectangle anchored at `start` covering `row_span` x `col_span` positions.
    ///
    /// Both spans must be at least 1.
    pub const fn from_span(start: GridPos, row_span: usize, col_span: usize) -> Self {
        Self {
            start,
            end: GridPos::new(start.row + row_span - 1, start.col + col_span - 1),
        }
    }

    /// Like [`GridRect::from_span`], but `None` for a zero span or one whose end does not
    /// fit in `usize`.
    pub const fn checked_from_span(
        start: GridPos,
        row_span: usize,
        col_span: usize,
    ) -> Option<Self> {
        if row_span == 0 || col_span == 0 {
            return None;
        }
        match (
            start.row.checked_add(row_span - 1),
            start.col.checked_add(col_span - 1),
        ) {
            (Some(end_row), Some(end_col)) => Some(Self {
                start,
                end: GridPos::new(end_row, end_col),
            }),
            _ => None,
        }
    }

    /// Returns true if `pos` lies within this rectangle.
    #[inline]
    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.row >= self.start.row
            && pos.row <= self.end.row
            && pos.col >= self.start.col
            && pos.col <= self.end.col
    }

    /// Returns true if the two rectangles share at least one position.
    #[inline]
    pub const fn intersects(&self, other: &GridRect) -> bool {
        self.start.row <= other.end.row
            && other.start.row <= self.end.row
            && self.start.col <= other.end.col
            && other.start.col <= self.end.col
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &GridRect) -> GridRect {
        GridRect {
            start: GridPos::new(
                self.start.row.min(other.start.row),
                self.start.col.min(other.start.col),
            ),
            end: GridPos::new(self.end.row.max(other.end.row), self.end.col.max(other.end.col)),
        }
    }

    /// Number of columns in the rectangle.
    #[inline]
    pub const fn width(&self) -> usize {
        self.end.col - self.start.col + 1
    }

    /// Number of rows in the rectangle.
    #[inline]
    pub const fn height(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    /// Extent of the rectangle along `axis`.
    #[inline]
    pub const fn len_along(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.height(),
            Axis::Column => self.width(),
        }
    }

    /// Returns true if the rectangle is exactly one position.
    #[inline]
    pub const fn is_single_cell(&self) -> bool {
        self.start.row == self.end.row && self.start.col == self.end.col
    }

    /// Iterate positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        let (start, end) = (self.start, self.end);
        (start.row..=end.row)
            .flat_map(move |row| (start.col..=end.col).map(move |col| GridPos::new(row, col)))
    }
}

impl fmt::Display for GridRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_normalizes_corners() {
        let r = GridRect::new(GridPos::new(2, 0), GridPos::new(0, 3));
        assert_eq!(r.start, GridPos::new(0, 0));
        assert_eq!(r.end, GridPos::new(2, 3));
        assert_eq!(r.height(), 3);
        assert_eq!(r.width(), 4);
    }

    #[test]
    fn rect_positions_are_row_major() {
        let r = GridRect::from_span(GridPos::new(1, 1), 2, 2);
        let positions: Vec<_> = r.positions().collect();
        assert_eq!(
            positions,
            vec![
                GridPos::new(1, 1),
                GridPos::new(1, 2),
                GridPos::new(2, 1),
                GridPos::new(2, 2),
            ]
        );
    }

    #[test]
    fn rect_intersection_and_union() {
        let a = GridRect::from_span(GridPos::new(0, 0), 2, 2);
        let b = GridRect::from_span(GridPos::new(1, 1), 2, 2);
        let c = GridRect::from_span(GridPos::new(3, 3), 1, 1);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.union(&c), GridRect::new(GridPos::new(0, 0), GridPos::new(3, 3)));
    }

    #[test]
    fn checked_span_rejects_empty_and_overflowing_spans() {
        let start = GridPos::new(1, 2);
        assert_eq!(
            GridRect::checked_from_span(start, 2, 1),
            Some(GridRect::from_span(start, 2, 1))
        );
        assert_eq!(GridRect::checked_from_span(start, 0, 1), None);
        assert_eq!(GridRect::checked_from_span(start, 1, usize::MAX), None);
    }
}

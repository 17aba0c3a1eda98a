use crate::{Axis, GridPos, GridRect, GridViolation, MergeState, StructuralError};

use super::Table;

impl Table {
    pub(crate) fn check_index(&self, axis: Axis, index: usize) -> Result<(), StructuralError> {
        let len = self.axis_len(axis);
        if index >= len {
            return Err(StructuralError::GridIndexOutOfRange { axis, index, len });
        }
        Ok(())
    }

    pub(crate) fn check_pos(&self, pos: GridPos) -> Result<(), StructuralError> {
        self.check_index(Axis::Row, pos.row)?;
        self.check_index(Axis::Column, pos.col)
    }

    pub(crate) fn axis_len(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.rows.len(),
            Axis::Column => self.columns.len(),
        }
    }

    /// Position of the anchor owning `pos` (or `pos` itself when it is not covered).
    pub fn resolve(&self, pos: GridPos) -> Result<GridPos, StructuralError> {
        self.check_pos(pos)?;
        Ok(self.raw_cell(pos).merge.anchor().unwrap_or(pos))
    }

    /// The rectangle governed by the cell at `pos` after resolution.
    pub fn region_of(&self, pos: GridPos) -> Result<GridRect, StructuralError> {
        let anchor = self.resolve(pos)?;
        let (row_span, col_span) = self.raw_cell(anchor).merge.span().unwrap_or((1, 1));
        Ok(GridRect::from_span(anchor, row_span, col_span))
    }

    /// Snapshot of every merged region (anchors spanning more than one position), in
    /// row-major anchor order.
    pub fn regions(&self) -> Vec<GridRect> {
        let mut out = Vec::new();
        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col_idx, cell) in row.cells.iter().enumerate() {
                if let MergeState::Anchor { row_span, col_span } = cell.merge {
                    out.push(GridRect::from_span(
                        GridPos::new(row_idx, col_idx),
                        row_span,
                        col_span,
                    ));
                }
            }
        }
        out
    }

    /// Rewrite every position's merge state from a region list.
    ///
    /// Positions outside all regions become standalone; positions inside a region other
    /// than its top-left are covered, losing any text and fill they held. Regions must be
    /// disjoint and inside the grid.
    pub(crate) fn apply_regions(&mut self, regions: &[GridRect]) {
        for cell in self.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
            cell.merge = MergeState::Standalone;
        }
        for rect in regions {
            if rect.is_single_cell() {
                continue;
            }
            self.raw_cell_mut(rect.start).merge = MergeState::for_span(rect.height(), rect.width());
            for pos in rect.positions().skip(1) {
                self.raw_cell_mut(pos).cover(rect.start);
            }
        }
    }

    /// Check the grid invariants: rectangularity, span/anchor consistency, content
    /// locality, and frame size consistency.
    pub fn validate(&self) -> Result<(), GridViolation> {
        let cols = self.columns.len();
        for (row, r) in self.rows.iter().enumerate() {
            if r.cells.len() != cols {
                return Err(GridViolation::NotRectangular {
                    row,
                    expected: cols,
                    found: r.cells.len(),
                });
            }
        }

        let bounds = GridPos::new(self.rows.len(), cols);
        for (row, r) in self.rows.iter().enumerate() {
            for (col, cell) in r.cells.iter().enumerate() {
                let pos = GridPos::new(row, col);
                match cell.merge {
                    MergeState::Standalone => {}
                    MergeState::Anchor { row_span, col_span } => {
                        if row_span == 0 || col_span == 0 || (row_span == 1 && col_span == 1) {
                            return Err(GridViolation::DegenerateSpan { pos });
                        }
                        if row.saturating_add(row_span) > bounds.row
                            || col.saturating_add(col_span) > bounds.col
                        {
                            return Err(GridViolation::SpanOutOfBounds { pos });
                        }
                        let rect = GridRect::from_span(pos, row_span, col_span);
                        for covered in rect.positions().skip(1) {
                            if self.raw_cell(covered).merge.anchor() != Some(pos) {
                                return Err(GridViolation::SpanGap { pos, covered });
                            }
                        }
                    }
                    MergeState::Covered {
                        anchor_row,
                        anchor_col,
                    } => {
                        let anchor = GridPos::new(anchor_row, anchor_col);
                        let owns = anchor_row < bounds.row
                            && anchor_col < bounds.col
                            && match self.raw_cell(anchor).merge {
                                // The anchor's own span is checked when the scan reaches it,
                                // which can be after this position.
                                MergeState::Anchor { row_span, col_span } => {
                                    GridRect::checked_from_span(anchor, row_span, col_span)
                                        .is_some_and(|rect| rect.contains(pos) && anchor != pos)
                                }
                                _ => false,
                            };
                        if !owns {
                            return Err(GridViolation::DanglingCover { pos, anchor });
                        }
                        if cell.has_content() {
                            return Err(GridViolation::CoveredContent { pos });
                        }
                    }
                }
            }
        }

        let tolerance = self.settings.size_tolerance.max(0).unsigned_abs();
        for axis in [Axis::Column, Axis::Row] {
            let sizes: Vec<i64> = match axis {
                Axis::Row => self.rows.iter().map(|r| r.height).collect(),
                Axis::Column => self.columns.iter().map(|c| c.width).collect(),
            };
            if let Some((index, &value)) = sizes.iter().enumerate().find(|(_, v)| **v < 0) {
                return Err(GridViolation::NegativeSize { axis, index, value });
            }
            let frame = match axis {
                Axis::Row => self.frame.height,
                Axis::Column => self.frame.width,
            };
            let sum = sizes
                .iter()
                .try_fold(0i64, |acc, v| acc.checked_add(*v))
                .ok_or(GridViolation::SizeOverflow { axis })?;
            if sum.abs_diff(frame) > tolerance {
                return Err(GridViolation::SizeMismatch { axis, sum, frame });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    fn table_3x3() -> Table {
        Table::new(&[100, 100, 100], &[50, 50, 50]).unwrap()
    }

    #[test]
    fn resolve_follows_covered_positions() {
        let mut table = table_3x3();
        table.apply_regions(&[GridRect::from_span(GridPos::new(1, 1), 2, 2)]);
        table.validate().unwrap();
        assert_eq!(table.resolve(GridPos::new(2, 2)).unwrap(), GridPos::new(1, 1));
        assert_eq!(table.resolve(GridPos::new(0, 2)).unwrap(), GridPos::new(0, 2));
        assert_eq!(
            table.region_of(GridPos::new(2, 1)).unwrap(),
            GridRect::from_span(GridPos::new(1, 1), 2, 2)
        );
        assert_eq!(
            table.resolve(GridPos::new(3, 0)).unwrap_err(),
            StructuralError::GridIndexOutOfRange {
                axis: Axis::Row,
                index: 3,
                len: 3
            }
        );
    }

    #[test]
    fn validate_reports_gaps_and_dangling_covers() {
        let mut table = table_3x3();
        table.raw_cell_mut(GridPos::new(0, 0)).merge = MergeState::Anchor {
            row_span: 1,
            col_span: 2,
        };
        assert_eq!(
            table.validate().unwrap_err(),
            GridViolation::SpanGap {
                pos: GridPos::new(0, 0),
                covered: GridPos::new(0, 1)
            }
        );

        let mut table = table_3x3();
        table.raw_cell_mut(GridPos::new(2, 2)).merge = MergeState::Covered {
            anchor_row: 0,
            anchor_col: 0,
        };
        assert_eq!(
            table.validate().unwrap_err(),
            GridViolation::DanglingCover {
                pos: GridPos::new(2, 2),
                anchor: GridPos::new(0, 0)
            }
        );
    }

    #[test]
    fn validate_reports_covered_content_and_size_drift() {
        let mut table = table_3x3();
        table.apply_regions(&[GridRect::from_span(GridPos::new(0, 0), 1, 2)]);
        let merge = table.raw_cell(GridPos::new(0, 1)).merge;
        *table.raw_cell_mut(GridPos::new(0, 1)) = Cell {
            merge,
            ..Cell::with_text("hidden")
        };
        assert_eq!(
            table.validate().unwrap_err(),
            GridViolation::CoveredContent {
                pos: GridPos::new(0, 1)
            }
        );

        let mut table = table_3x3();
        table.frame.width += 1;
        assert!(matches!(
            table.validate(),
            Err(GridViolation::SizeMismatch {
                axis: Axis::Column,
                ..
            })
        ));
    }
}

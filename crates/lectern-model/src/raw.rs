//! Flag-based grid representation used at the persistence boundary.
//!
//! Host formats such as DrawingML describe merges with independent per-cell attributes
//! (`gridSpan`, `rowSpan`, `hMerge`, `vMerge`). [`RawGrid`] mirrors that shape so format
//! crates can map to and from it without knowing about [`MergeState`];
//! [`Table::from_raw`] validates the flags and converts them into tagged merge states.

use serde::{Deserialize, Serialize};

use crate::table::{Column, FrameSize, Row};
use crate::{
    Axis, Borders, Cell, CellLayout, Fill, FormatError, GridPos, GridRect, LoadWarning,
    MergeState, Table, TableLook, TableSettings, TableStyle, TextBody,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGrid {
    /// Column widths in EMU.
    pub column_widths: Vec<i64>,
    pub rows: Vec<RawRow>,
    #[serde(default)]
    pub style: TableStyle,
    #[serde(default)]
    pub look: TableLook,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// Row height in EMU.
    pub height: i64,
    pub cells: Vec<RawCell>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCell {
    /// Number of columns spanned by this cell (`gridSpan`).
    pub grid_span: usize,
    /// Number of rows spanned by this cell (`rowSpan`).
    pub row_span: usize,
    /// Continuation of a span from the left (`hMerge`).
    pub h_merge: bool,
    /// Continuation of a span from above (`vMerge`).
    pub v_merge: bool,
    #[serde(default)]
    pub text: TextBody,
    #[serde(default)]
    pub fill: Fill,
    #[serde(default)]
    pub borders: Borders,
    #[serde(default)]
    pub layout: CellLayout,
}

impl Default for RawCell {
    fn default() -> Self {
        Self {
            grid_span: 1,
            row_span: 1,
            h_merge: false,
            v_merge: false,
            text: TextBody::default(),
            fill: Fill::default(),
            borders: Borders::default(),
            layout: CellLayout::default(),
        }
    }
}

impl RawCell {
    pub fn is_continuation(&self) -> bool {
        self.h_merge || self.v_merge
    }
}

fn total_size(axis: Axis, sizes: impl IntoIterator<Item = i64>) -> Result<i64, FormatError> {
    sizes
        .into_iter()
        .try_fold(0i64, i64::checked_add)
        .ok_or(FormatError::SizeOverflow { axis })
}

impl Table {
    /// Build a table from persisted grid data, rejecting inconsistent merge flags.
    ///
    /// Covered positions are resolved to the anchor whose declared span claims them.
    /// Any merge flag on a continuation cell is accepted; which flags are set does not
    /// change the result. The frame size is derived from the row and column sizes.
    ///
    /// Repairs listed by [`Table::from_raw_with_warnings`] are applied and logged.
    pub fn from_raw(raw: RawGrid, settings: TableSettings) -> Result<Table, FormatError> {
        let (table, warnings) = Self::from_raw_with_warnings(raw, settings)?;
        for warning in &warnings {
            log::warn!("{warning}");
        }
        Ok(table)
    }

    /// Like [`Table::from_raw`], also returning the repairs made while loading. A fill
    /// declared on a covered cell is dropped, since only the anchor owns the region's fill.
    pub fn from_raw_with_warnings(
        raw: RawGrid,
        settings: TableSettings,
    ) -> Result<(Table, Vec<LoadWarning>), FormatError> {
        let cols = raw.column_widths.len();
        let rows = raw.rows.len();
        if let Some(&value) = raw
            .column_widths
            .iter()
            .chain(raw.rows.iter().map(|r| &r.height))
            .find(|v| **v < 0)
        {
            return Err(FormatError::NegativeSize { value });
        }
        for (row, r) in raw.rows.iter().enumerate() {
            if r.cells.len() != cols {
                return Err(FormatError::NotRectangular {
                    row,
                    expected: cols,
                    found: r.cells.len(),
                });
            }
        }
        let frame = FrameSize {
            width: total_size(Axis::Column, raw.column_widths.iter().copied())?,
            height: total_size(Axis::Row, raw.rows.iter().map(|r| r.height))?,
        };

        // Anchor claiming each position, filled in row-major order: an anchor is always
        // visited before the positions it covers.
        let mut owner: Vec<Option<GridPos>> = vec![None; rows * cols];
        let mut regions = Vec::new();
        for (row, r) in raw.rows.iter().enumerate() {
            for (col, cell) in r.cells.iter().enumerate() {
                let pos = GridPos::new(row, col);
                let claimed = owner[row * cols + col];
                if cell.is_continuation() {
                    if claimed.is_none() {
                        return Err(FormatError::OrphanCovered { pos });
                    }
                    if !cell.text.is_empty() {
                        return Err(FormatError::CoveredCellHasContent { pos });
                    }
                    continue;
                }
                if claimed.is_some() {
                    return Err(FormatError::SpanMismatch { pos });
                }
                if cell.row_span == 0 || cell.grid_span == 0 {
                    return Err(FormatError::InvalidSpan { pos });
                }
                if row.saturating_add(cell.row_span) > rows
                    || col.saturating_add(cell.grid_span) > cols
                {
                    return Err(FormatError::SpanOutOfBounds {
                        pos,
                        row_span: cell.row_span,
                        col_span: cell.grid_span,
                    });
                }
                let rect = GridRect::from_span(pos, cell.row_span, cell.grid_span);
                for covered in rect.positions().skip(1) {
                    let slot = &mut owner[covered.row * cols + covered.col];
                    if slot.is_some() {
                        return Err(FormatError::OverlappingSpans { pos: covered });
                    }
                    *slot = Some(pos);
                }
                if !rect.is_single_cell() {
                    regions.push(rect);
                }
            }
        }

        let mut table = Table {
            columns: raw
                .column_widths
                .into_iter()
                .map(|width| Column { width })
                .collect(),
            rows: raw
                .rows
                .into_iter()
                .map(|r| Row {
                    height: r.height,
                    cells: r
                        .cells
                        .into_iter()
                        .map(|c| Cell {
                            text: c.text,
                            fill: c.fill,
                            borders: c.borders,
                            layout: c.layout,
                            merge: MergeState::Standalone,
                        })
                        .collect(),
                })
                .collect(),
            style: raw.style,
            look: raw.look,
            frame,
            settings,
        };
        let warnings = regions
            .iter()
            .flat_map(|rect| rect.positions().skip(1))
            .filter_map(|pos| {
                let fill = &table.raw_cell(pos).fill;
                (!fill.is_inherit()).then(|| LoadWarning::CoveredFillDropped {
                    pos,
                    fill: fill.clone(),
                })
            })
            .collect();
        table.apply_regions(&regions);
        Ok((table, warnings))
    }

    /// Persisted form of the table: anchors carry `grid_span`/`row_span`, covered cells
    /// carry `h_merge` when right of their anchor's column and `v_merge` when below its row.
    pub fn to_raw(&self) -> RawGrid {
        RawGrid {
            column_widths: self.columns.iter().map(|c| c.width).collect(),
            rows: self
                .rows
                .iter()
                .enumerate()
                .map(|(row, r)| RawRow {
                    height: r.height,
                    cells: r
                        .cells
                        .iter()
                        .enumerate()
                        .map(|(col, cell)| raw_cell(GridPos::new(row, col), cell))
                        .collect(),
                })
                .collect(),
            style: self.style.clone(),
            look: self.look,
        }
    }
}

fn raw_cell(pos: GridPos, cell: &Cell) -> RawCell {
    let mut raw = RawCell {
        text: cell.text.clone(),
        fill: cell.fill.clone(),
        borders: cell.borders.clone(),
        layout: cell.layout.clone(),
        ..RawCell::default()
    };
    match cell.merge {
        MergeState::Standalone => {}
        MergeState::Anchor { row_span, col_span } => {
            raw.row_span = row_span;
            raw.grid_span = col_span;
        }
        MergeState::Covered {
            anchor_row,
            anchor_col,
        } => {
            raw.h_merge = pos.col > anchor_col;
            raw.v_merge = pos.row > anchor_row;
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cells: Vec<Vec<RawCell>>) -> RawGrid {
        let cols = cells.first().map_or(0, Vec::len);
        RawGrid {
            column_widths: vec![100; cols],
            rows: cells
                .into_iter()
                .map(|cells| RawRow { height: 50, cells })
                .collect(),
            style: TableStyle::None,
            look: TableLook::default(),
        }
    }

    fn anchor(row_span: usize, grid_span: usize) -> RawCell {
        RawCell {
            row_span,
            grid_span,
            ..RawCell::default()
        }
    }

    fn h() -> RawCell {
        RawCell {
            h_merge: true,
            ..RawCell::default()
        }
    }

    fn v() -> RawCell {
        RawCell {
            v_merge: true,
            ..RawCell::default()
        }
    }

    #[test]
    fn loads_spans_into_merge_states() {
        let raw = grid(vec![
            vec![anchor(2, 2), h(), RawCell::default()],
            vec![v(), v(), RawCell::default()],
        ]);
        let table = Table::from_raw(raw, TableSettings::default()).unwrap();
        table.validate().unwrap();
        assert_eq!(
            table.regions(),
            vec![GridRect::from_span(GridPos::new(0, 0), 2, 2)]
        );
        assert_eq!(table.width(), 300);
        assert_eq!(table.height(), 100);
    }

    #[test]
    fn rejects_malformed_flags() {
        let settings = TableSettings::default();
        let orphan = grid(vec![vec![RawCell::default(), v()]]);
        assert_eq!(
            Table::from_raw(orphan, settings.clone()).unwrap_err(),
            FormatError::OrphanCovered {
                pos: GridPos::new(0, 1)
            }
        );

        let out_of_bounds = grid(vec![vec![anchor(1, 3), h()]]);
        assert!(matches!(
            Table::from_raw(out_of_bounds, settings.clone()),
            Err(FormatError::SpanOutOfBounds { .. })
        ));

        let mismatch = grid(vec![vec![anchor(1, 2), RawCell::default()]]);
        assert_eq!(
            Table::from_raw(mismatch, settings.clone()).unwrap_err(),
            FormatError::SpanMismatch {
                pos: GridPos::new(0, 1)
            }
        );

        let overlap = grid(vec![
            vec![RawCell::default(), anchor(2, 1)],
            vec![anchor(1, 2), v()],
        ]);
        assert_eq!(
            Table::from_raw(overlap, settings.clone()).unwrap_err(),
            FormatError::OverlappingSpans {
                pos: GridPos::new(1, 1)
            }
        );

        let mut ragged = grid(vec![vec![RawCell::default(), RawCell::default()]]);
        ragged.rows[0].cells.pop();
        assert!(matches!(
            Table::from_raw(ragged, settings.clone()),
            Err(FormatError::NotRectangular { row: 0, .. })
        ));

        let hidden_text = grid(vec![vec![
            anchor(1, 2),
            RawCell {
                text: TextBody::from_text("hidden"),
                ..h()
            },
        ]]);
        assert_eq!(
            Table::from_raw(hidden_text, settings).unwrap_err(),
            FormatError::CoveredCellHasContent {
                pos: GridPos::new(0, 1)
            }
        );
    }

    #[test]
    fn to_raw_emits_canonical_flags() {
        let raw = grid(vec![
            vec![anchor(2, 2), h()],
            // Interior continuation cells may carry either flag on input.
            vec![v(), h()],
        ]);
        let table = Table::from_raw(raw, TableSettings::default()).unwrap();
        let out = table.to_raw();
        assert_eq!(out.rows[0].cells[0].grid_span, 2);
        assert_eq!(out.rows[0].cells[0].row_span, 2);
        assert!(out.rows[1].cells[1].h_merge && out.rows[1].cells[1].v_merge);
        assert!(!out.rows[1].cells[0].h_merge && out.rows[1].cells[0].v_merge);

        let again = Table::from_raw(out, TableSettings::default()).unwrap();
        assert_eq!(again, table);
    }

    #[test]
    fn rejects_zero_spans_and_bad_sizes() {
        let settings = TableSettings::default();
        let zero = grid(vec![vec![anchor(0, 1), RawCell::default()]]);
        assert_eq!(
            Table::from_raw(zero, settings.clone()).unwrap_err(),
            FormatError::InvalidSpan {
                pos: GridPos::new(0, 0)
            }
        );

        let mut negative = grid(vec![vec![RawCell::default()]]);
        negative.rows[0].height = -1;
        assert_eq!(
            Table::from_raw(negative, settings.clone()).unwrap_err(),
            FormatError::NegativeSize { value: -1 }
        );

        let mut huge = grid(vec![vec![RawCell::default(), RawCell::default()]]);
        huge.column_widths = vec![i64::MAX, 1];
        assert_eq!(
            Table::from_raw(huge, settings).unwrap_err(),
            FormatError::SizeOverflow { axis: Axis::Column }
        );
    }

    #[test]
    fn covered_fills_are_dropped_and_reported() {
        let red = Fill::solid(crate::Color::new_rgb(0xFF0000));
        let raw = grid(vec![vec![
            anchor(1, 2),
            RawCell {
                fill: red.clone(),
                ..h()
            },
        ]]);
        let (table, warnings) =
            Table::from_raw_with_warnings(raw.clone(), TableSettings::default()).unwrap();
        assert_eq!(
            warnings,
            vec![LoadWarning::CoveredFillDropped {
                pos: GridPos::new(0, 1),
                fill: red,
            }]
        );
        assert!(table.rows()[0].cells()[1].fill.is_inherit());
        table.validate().unwrap();
        assert_eq!(Table::from_raw(raw, TableSettings::default()).unwrap(), table);

        let clean = grid(vec![vec![anchor(1, 2), h()]]);
        let (_, warnings) =
            Table::from_raw_with_warnings(clean, TableSettings::default()).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn layout_and_look_survive_the_boundary() {
        let mut raw = grid(vec![vec![
            RawCell {
                layout: CellLayout {
                    margin_left: Some(0),
                    anchor: Some(crate::VerticalAnchor::Middle),
                    ..CellLayout::default()
                },
                ..RawCell::default()
            },
        ]]);
        raw.look = TableLook::banded_header();
        let table = Table::from_raw(raw.clone(), TableSettings::default()).unwrap();
        assert_eq!(table.look(), TableLook::banded_header());
        assert_eq!(table.cell(0, 0).unwrap().layout().margin_left, Some(0));
        assert_eq!(table.to_raw(), raw);
    }
}

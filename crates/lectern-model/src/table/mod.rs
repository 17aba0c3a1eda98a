//! Table grid: rows, columns, merged regions and sizing.
//!
//! A [`Table`] is always rectangular: every [`Row`] holds exactly one [`Cell`] per
//! [`Column`]. Merged regions are encoded per position with [`MergeState`]; lookups through
//! [`Table::cell`] transparently resolve covered positions to their anchor.
//!
//! Structural edits compute their full effect (new region layout, content moves, size
//! changes) from the current state before mutating anything, so a rejected call leaves the
//! table untouched.

mod consolidate;
mod grid;
mod merge;
mod mutate;
mod sizing;

use serde::{Deserialize, Serialize};

use crate::{
    Borders, Cell, CellLayout, Fill, GridPos, GridViolation, MergeState, StructuralError,
    TableLook, TableSettings, TableStyle, TextBody,
};

pub use consolidate::consolidate_paragraphs;

/// A table column. Its index is its position in [`Table::columns`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Width in EMU.
    pub(crate) width: i64,
}

impl Column {
    pub fn width(&self) -> i64 {
        self.width
    }
}

/// A table row owning one cell per column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Height in EMU.
    pub(crate) height: i64,
    pub(crate) cells: Vec<Cell>,
}

impl Row {
    pub fn height(&self) -> i64 {
        self.height
    }

    /// Raw per-position cell records, covered positions included.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Outer size of the table as persisted by the host shape (the graphic frame extent).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: i64,
    pub height: i64,
}

/// A presentation table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TableData")]
pub struct Table {
    pub(crate) columns: Vec<Column>,
    pub(crate) rows: Vec<Row>,
    pub(crate) style: TableStyle,
    pub(crate) look: TableLook,
    pub(crate) frame: FrameSize,
    pub(crate) settings: TableSettings,
}

/// Unvalidated serde shape of [`Table`].
#[derive(Deserialize)]
struct TableData {
    columns: Vec<Column>,
    rows: Vec<Row>,
    #[serde(default)]
    style: TableStyle,
    #[serde(default)]
    look: TableLook,
    frame: FrameSize,
    #[serde(default)]
    settings: TableSettings,
}

impl TryFrom<TableData> for Table {
    type Error = GridViolation;

    fn try_from(data: TableData) -> Result<Self, Self::Error> {
        let table = Table {
            columns: data.columns,
            rows: data.rows,
            style: data.style,
            look: data.look,
            frame: data.frame,
            settings: data.settings,
        };
        table.validate()?;
        Ok(table)
    }
}

impl Table {
    /// Create a table of empty standalone cells with the given column widths and row
    /// heights (EMU).
    pub fn new(column_widths: &[i64], row_heights: &[i64]) -> Result<Self, StructuralError> {
        if let Some(&value) = column_widths.iter().chain(row_heights).find(|v| **v < 0) {
            return Err(StructuralError::InvalidSize { value });
        }
        let frame = FrameSize {
            width: sizing::checked_total(column_widths)?,
            height: sizing::checked_total(row_heights)?,
        };
        let columns: Vec<Column> = column_widths
            .iter()
            .map(|&width| Column { width })
            .collect();
        let rows = row_heights
            .iter()
            .map(|&height| Row {
                height,
                cells: vec![Cell::new(); columns.len()],
            })
            .collect();
        Ok(Self {
            frame,
            columns,
            rows,
            style: TableStyle::None,
            look: TableLook::default(),
            settings: TableSettings::default(),
        })
    }

    #[must_use]
    pub fn with_settings(mut self, settings: TableSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: TableSettings) {
        self.settings = settings;
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Table width in EMU (the frame width, kept equal to the sum of column widths).
    pub fn width(&self) -> i64 {
        self.frame.width
    }

    /// Table height in EMU (the frame height, kept equal to the sum of row heights).
    pub fn height(&self) -> i64 {
        self.frame.height
    }

    pub fn frame(&self) -> FrameSize {
        self.frame
    }

    pub fn style(&self) -> &TableStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: TableStyle) {
        self.style = style;
    }

    pub fn look(&self) -> TableLook {
        self.look
    }

    pub fn set_look(&mut self, look: TableLook) {
        self.look = look;
    }

    /// The logical cell at `(row, col)`, resolved to its anchor when the position is covered.
    pub fn cell(&self, row: usize, col: usize) -> Result<CellView<'_>, StructuralError> {
        let id = self.resolve(GridPos::new(row, col))?;
        Ok(CellView {
            id,
            cell: &self.rows[id.row].cells[id.col],
        })
    }

    /// Mutable access to the logical cell at `(row, col)`; writes go to the anchor.
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Result<CellMut<'_>, StructuralError> {
        let id = self.resolve(GridPos::new(row, col))?;
        Ok(CellMut {
            id,
            cell: &mut self.rows[id.row].cells[id.col],
        })
    }

    pub(crate) fn raw_cell(&self, pos: GridPos) -> &Cell {
        &self.rows[pos.row].cells[pos.col]
    }

    pub(crate) fn raw_cell_mut(&mut self, pos: GridPos) -> &mut Cell {
        &mut self.rows[pos.row].cells[pos.col]
    }
}

/// Read handle for a logical cell.
#[derive(Clone, Copy, Debug)]
pub struct CellView<'a> {
    id: GridPos,
    cell: &'a Cell,
}

impl<'a> CellView<'a> {
    /// Identity of the cell: the position of its anchor (or itself when standalone).
    pub fn id(&self) -> GridPos {
        self.id
    }

    /// `(row_span, col_span)` of the cell.
    pub fn span(&self) -> (usize, usize) {
        self.cell.merge.span().unwrap_or((1, 1))
    }

    pub fn is_merged(&self) -> bool {
        matches!(self.cell.merge, MergeState::Anchor { .. })
    }

    pub fn text(&self) -> &'a TextBody {
        &self.cell.text
    }

    pub fn fill(&self) -> &'a Fill {
        &self.cell.fill
    }

    pub fn borders(&self) -> &'a Borders {
        &self.cell.borders
    }

    pub fn layout(&self) -> &'a CellLayout {
        &self.cell.layout
    }
}

/// Write handle for a logical cell. Merge status is not editable through it.
#[derive(Debug)]
pub struct CellMut<'a> {
    id: GridPos,
    cell: &'a mut Cell,
}

impl CellMut<'_> {
    pub fn id(&self) -> GridPos {
        self.id
    }

    pub fn text(&self) -> &TextBody {
        &self.cell.text
    }

    pub fn text_mut(&mut self) -> &mut TextBody {
        &mut self.cell.text
    }

    /// Replace the text with one plain paragraph per line.
    pub fn set_text(&mut self, text: &str) {
        self.cell.text = TextBody::from_text(text);
    }

    pub fn fill(&self) -> &Fill {
        &self.cell.fill
    }

    pub fn set_fill(&mut self, fill: Fill) {
        self.cell.fill = fill;
    }

    pub fn set_borders(&mut self, borders: Borders) {
        self.cell.borders = borders;
    }

    pub fn set_layout(&mut self, layout: CellLayout) {
        self.cell.layout = layout;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_is_valid_and_sized() {
        let table = Table::new(&[100, 200], &[10, 20, 30]).unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.width(), 300);
        assert_eq!(table.height(), 60);
        table.validate().unwrap();
    }

    #[test]
    fn new_rejects_negative_sizes() {
        assert_eq!(
            Table::new(&[100, -1], &[10]).unwrap_err(),
            StructuralError::InvalidSize { value: -1 }
        );
    }

    #[test]
    fn cell_mut_writes_through_to_anchor() {
        let mut table = Table::new(&[10, 10], &[10, 10]).unwrap();
        table.merge_cells(GridPos::new(0, 0), GridPos::new(0, 1)).unwrap();
        table.cell_mut(0, 1).unwrap().set_text("shared");
        assert_eq!(table.cell(0, 0).unwrap().text().text(), "shared");
        assert_eq!(table.cell(0, 1).unwrap().id(), GridPos::new(0, 0));
        assert!(table.raw_cell(GridPos::new(0, 1)).text.is_empty());
    }

    #[test]
    fn serde_rejects_invalid_grids() {
        let table = Table::new(&[10, 10], &[10]).unwrap();
        let mut json = serde_json::to_value(&table).unwrap();
        json["rows"][0]["cells"][1]["merge"] =
            serde_json::json!({"kind": "covered", "anchor_row": 0, "anchor_col": 0});
        let err = serde_json::from_value::<Table>(json).unwrap_err();
        assert!(err.to_string().contains("references"), "{err}");

        let json = serde_json::to_string(&table).unwrap();
        let back: Table = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn serde_reports_cover_pointing_at_a_broken_anchor() {
        let table = Table::new(&[10, 10], &[10]).unwrap();
        let covered = serde_json::json!({"kind": "covered", "anchor_row": 0, "anchor_col": 1});
        for anchor_merge in [
            serde_json::json!({"kind": "anchor", "row_span": 0, "col_span": 1}),
            serde_json::json!({"kind": "anchor", "row_span": 1, "col_span": usize::MAX}),
        ] {
            let mut json = serde_json::to_value(&table).unwrap();
            json["rows"][0]["cells"][0]["merge"] = covered.clone();
            json["rows"][0]["cells"][1]["merge"] = anchor_merge;
            let err = serde_json::from_value::<Table>(json).unwrap_err();
            assert!(err.to_string().contains("references (0, 1)"), "{err}");
        }
    }

    #[test]
    fn serde_reports_negative_and_overflowing_sizes() {
        let table = Table::new(&[10, 10], &[10]).unwrap();

        let mut json = serde_json::to_value(&table).unwrap();
        json["columns"][1]["width"] = serde_json::json!(-10);
        json["frame"]["width"] = serde_json::json!(0);
        let err = serde_json::from_value::<Table>(json).unwrap_err();
        assert!(err.to_string().contains("negative size -10"), "{err}");

        let mut json = serde_json::to_value(&table).unwrap();
        json["columns"][0]["width"] = serde_json::json!(i64::MAX);
        let err = serde_json::from_value::<Table>(json).unwrap_err();
        assert!(err.to_string().contains("overflow"), "{err}");
    }
}

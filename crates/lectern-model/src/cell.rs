use serde::{Deserialize, Serialize};

use crate::{Borders, CellLayout, Fill, GridPos, Paragraph, TextBody};

/// Merge status of one grid position.
///
/// This replaces the independent `gridSpan` / `rowSpan` / `hMerge` / `vMerge` flags of the
/// persisted form; invalid flag combinations cannot be expressed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MergeState {
    /// Occupies exactly one grid position.
    #[default]
    Standalone,
    /// Top-left position of a merged rectangle; owns the region's text and fill.
    Anchor { row_span: usize, col_span: usize },
    /// Any other position inside a merged rectangle.
    Covered { anchor_row: usize, anchor_col: usize },
}

impl MergeState {
    /// Span covered by a cell in this state, or `None` for covered positions.
    pub const fn span(self) -> Option<(usize, usize)> {
        match self {
            MergeState::Standalone => Some((1, 1)),
            MergeState::Anchor { row_span, col_span } => Some((row_span, col_span)),
            MergeState::Covered { .. } => None,
        }
    }

    pub const fn is_covered(self) -> bool {
        matches!(self, MergeState::Covered { .. })
    }

    pub const fn anchor(self) -> Option<GridPos> {
        match self {
            MergeState::Covered {
                anchor_row,
                anchor_col,
            } => Some(GridPos::new(anchor_row, anchor_col)),
            _ => None,
        }
    }

    /// State for the anchor of a `row_span` x `col_span` region.
    pub(crate) const fn for_span(row_span: usize, col_span: usize) -> Self {
        if row_span == 1 && col_span == 1 {
            MergeState::Standalone
        } else {
            MergeState::Anchor { row_span, col_span }
        }
    }
}

/// A single table cell record.
///
/// Covered cells never carry text or fill; all lookups of a covered position resolve
/// to its anchor (see [`crate::Table::cell`]).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub text: TextBody,
    #[serde(default, skip_serializing_if = "Fill::is_inherit")]
    pub fill: Fill,
    #[serde(default, skip_serializing_if = "Borders::is_empty")]
    pub borders: Borders,
    #[serde(default, skip_serializing_if = "CellLayout::is_default")]
    pub layout: CellLayout,
    #[serde(default)]
    pub merge: MergeState,
}

impl Cell {
    /// An empty standalone cell.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: TextBody::from_text(text),
            ..Self::default()
        }
    }

    /// Returns true if the cell holds text or an explicit fill.
    pub fn has_content(&self) -> bool {
        !self.text.is_empty() || !self.fill.is_inherit()
    }

    /// An empty standalone cell carrying this cell's formatting: fill, borders, layout,
    /// frame attributes, and the font of its first formatted run.
    pub(crate) fn format_template(&self) -> Cell {
        let font = self
            .text
            .paragraphs
            .iter()
            .flat_map(|p| p.runs.iter().map(|r| &r.font).chain(p.end_font.as_ref()))
            .find(|font| !font.is_default())
            .cloned();
        let paragraphs = match font {
            Some(font) => vec![Paragraph {
                end_font: Some(font),
                ..Paragraph::default()
            }],
            None => Vec::new(),
        };
        Cell {
            text: TextBody {
                paragraphs,
                body_attributes: self.text.body_attributes.clone(),
            },
            fill: self.fill.clone(),
            borders: self.borders.clone(),
            layout: self.layout.clone(),
            merge: MergeState::Standalone,
        }
    }

    /// Demote to a covered position, dropping text and fill. Borders and layout stay.
    pub(crate) fn cover(&mut self, anchor: GridPos) {
        self.text.clear();
        self.fill = Fill::Inherit;
        self.merge = MergeState::Covered {
            anchor_row: anchor.row,
            anchor_col: anchor.col,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, TextRun};

    #[test]
    fn merge_state_spans() {
        assert_eq!(MergeState::Standalone.span(), Some((1, 1)));
        assert_eq!(MergeState::for_span(1, 1), MergeState::Standalone);
        assert_eq!(MergeState::for_span(2, 3).span(), Some((2, 3)));
        let covered = MergeState::Covered {
            anchor_row: 0,
            anchor_col: 1,
        };
        assert_eq!(covered.span(), None);
        assert_eq!(covered.anchor(), Some(GridPos::new(0, 1)));
    }

    #[test]
    fn format_template_keeps_formatting_but_not_text() {
        let mut cell = Cell::with_text("hello");
        cell.fill = Fill::solid(Color::new_rgb(0xFF0000));
        cell.text.paragraphs[0].runs[0].font.color = Some(Color::white());
        cell.text.paragraphs[0].runs.push(TextRun::new(" world"));

        let template = cell.format_template();
        assert!(template.text.is_empty());
        assert_eq!(template.fill, cell.fill);
        assert_eq!(
            template.text.paragraphs[0].end_font.as_ref().and_then(|f| f.color),
            Some(Color::white())
        );
    }

    #[test]
    fn cover_clears_content() {
        let mut cell = Cell::with_text("x");
        cell.fill = Fill::solid(Color::black());
        cell.cover(GridPos::new(0, 0));
        assert!(!cell.has_content());
        assert!(cell.merge.is_covered());
    }
}

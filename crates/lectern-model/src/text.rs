use serde::{Deserialize, Serialize};

use crate::Font;

/// Character used by [`Paragraph::text`] for a line break inside a paragraph.
pub const LINE_BREAK: char = '\u{000B}';

/// Text content of a table cell: an ordered sequence of paragraphs.
///
/// A body always renders at least one (possibly empty) paragraph; an empty
/// `paragraphs` vector is treated the same as a single empty paragraph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
    /// Text frame attributes (`a:bodyPr`: insets, wrapping, rotation), kept verbatim in
    /// document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body_attributes: Vec<(String, String)>,
}

impl TextBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// A body with a single plain paragraph per line of `text`.
    ///
    /// [`LINE_BREAK`] characters become line breaks inside a paragraph.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        Self {
            paragraphs: text.split('\n').map(Paragraph::plain).collect(),
            body_attributes: Vec::new(),
        }
    }

    /// Returns true if no paragraph carries any text.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(Paragraph::is_empty)
    }

    /// Visible text with paragraphs joined by `\n`.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Remove all paragraphs. Frame attributes are kept.
    pub fn clear(&mut self) {
        self.paragraphs.clear();
    }
}

/// Horizontal alignment of a paragraph (`a:pPr/@algn`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
    JustifyLow,
    Distributed,
    ThaiDistributed,
}

/// A paragraph: a sequence of formatted runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runs: Vec<TextRun>,
    /// Formatting applied to text typed at the end of the paragraph (`a:endParaRPr`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_font: Option<Font>,
}

impl Paragraph {
    pub fn plain(text: &str) -> Self {
        let mut runs = Vec::new();
        for (i, part) in text.split(LINE_BREAK).enumerate() {
            if i > 0 {
                runs.push(TextRun::line_break());
            }
            if !part.is_empty() {
                runs.push(TextRun::new(part));
            }
        }
        Self {
            runs,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.runs
            .iter()
            .all(|run| run.kind == RunKind::Text && run.text.is_empty())
    }

    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|run| match run.kind {
                RunKind::Text => run.text.as_str(),
                RunKind::LineBreak => "\u{000B}",
            })
            .collect()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    #[default]
    Text,
    /// A line break within the paragraph (`a:br`); `text` is empty.
    LineBreak,
}

impl RunKind {
    fn is_text(&self) -> bool {
        *self == RunKind::Text
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(default, skip_serializing_if = "RunKind::is_text")]
    pub kind: RunKind,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Font::is_default")]
    pub font: Font,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn line_break() -> Self {
        Self {
            kind: RunKind::LineBreak,
            ..Self::default()
        }
    }
}

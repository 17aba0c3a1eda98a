use core::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An RGB color.
///
/// Serialized as a `RRGGBB` hex string, the form DrawingML uses for `a:srgbClr/@val`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub rgb: u32,
}

impl Color {
    pub const fn new_rgb(rgb: u32) -> Self {
        Self { rgb: rgb & 0x00FF_FFFF }
    }

    pub const fn black() -> Self {
        Self { rgb: 0x000000 }
    }

    pub const fn white() -> Self {
        Self { rgb: 0xFFFFFF }
    }

    /// Parse a `RRGGBB` hex string (an optional leading `#` is accepted).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::new_rgb)
    }

    pub fn to_hex(self) -> String {
        format!("{:06X}", self.rgb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| D::Error::custom("color must be a RRGGBB hex string"))
    }
}

/// Run-level font formatting (subset).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Font {
    /// Font size in 1/100 points (e.g. 1800 = 18pt).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_100pt: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Font {
    pub fn is_default(&self) -> bool {
        *self == Font::default()
    }
}

/// Cell background fill.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Fill {
    /// No explicit fill; the table style decides.
    #[default]
    Inherit,
    /// Explicitly transparent (`a:noFill`).
    None,
    Solid { color: Color },
}

impl Fill {
    pub const fn solid(color: Color) -> Self {
        Fill::Solid { color }
    }

    pub fn is_inherit(&self) -> bool {
        matches!(self, Fill::Inherit)
    }
}

/// A single border line.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct BorderLine {
    /// Line width in EMU.
    pub width: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

/// Cell border lines. `None` means the table style decides.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Borders {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderLine>,
}

impl Borders {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.top.is_none() && self.bottom.is_none()
    }
}

/// Vertical placement of text in a cell (`a:tcPr/@anchor`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAnchor {
    Top,
    Middle,
    Bottom,
    Justified,
    Distributed,
}

/// Text flow direction in a cell (`a:tcPr/@vert`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    Horizontal,
    Vertical,
    Vertical270,
    Stacked,
    StackedRtl,
    EastAsianVertical,
    MongolianVertical,
}

/// Text placement inside a cell. `None` fields fall back to the table style.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CellLayout {
    /// Inner margins in EMU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<VerticalAnchor>,
    /// Center the text block horizontally (`anchorCtr`).
    #[serde(default, skip_serializing_if = "is_false")]
    pub anchor_center: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<TextDirection>,
}

impl CellLayout {
    pub fn is_default(&self) -> bool {
        *self == CellLayout::default()
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

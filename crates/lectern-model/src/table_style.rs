use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Built-in table styles known by name, keyed by their DrawingML style GUID.
const BUILTIN_STYLES: &[(&str, &str)] = &[
    ("{2D5ABB26-0587-4C30-8999-92F81FD0307C}", "No Style, No Grid"),
    ("{5940675A-B579-460E-94D1-54222C63F5DA}", "No Style, Table Grid"),
    ("{073A0DAA-6AF3-43AB-8588-CEC1D06C72B9}", "Medium Style 2"),
    ("{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}", "Medium Style 2 - Accent 1"),
];

/// A table style reference (`a:tblPr/a:tableStyleId`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum TableStyle {
    /// No style id present.
    #[default]
    None,
    /// Index into the built-in catalog.
    Builtin(usize),
    /// Any other style id, preserved verbatim.
    Custom(String),
}

impl TableStyle {
    /// PowerPoint's default style for newly inserted tables.
    pub fn medium_style_2_accent_1() -> Self {
        TableStyle::Builtin(3)
    }

    /// Resolve a style id to a catalog entry when possible.
    pub fn from_id(id: &str) -> Self {
        let id = id.trim();
        if id.is_empty() {
            return TableStyle::None;
        }
        BUILTIN_STYLES
            .iter()
            .position(|(guid, _)| guid.eq_ignore_ascii_case(id))
            .map(TableStyle::Builtin)
            .unwrap_or_else(|| TableStyle::Custom(id.to_string()))
    }

    /// Look up a built-in style by its display name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        BUILTIN_STYLES
            .iter()
            .position(|(_, n)| n.eq_ignore_ascii_case(name.trim()))
            .map(TableStyle::Builtin)
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            TableStyle::None => None,
            TableStyle::Builtin(idx) => BUILTIN_STYLES.get(*idx).map(|(guid, _)| *guid),
            TableStyle::Custom(id) => Some(id.as_str()),
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        match self {
            TableStyle::Builtin(idx) => BUILTIN_STYLES.get(*idx).map(|(_, name)| *name),
            _ => None,
        }
    }
}

/// Which parts of the table style are switched on (`a:tblPr` flags).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLook {
    pub first_row: bool,
    pub first_col: bool,
    pub last_row: bool,
    pub last_col: bool,
    pub band_row: bool,
    pub band_col: bool,
    /// Right-to-left column order.
    pub rtl: bool,
}

impl TableLook {
    /// Flags PowerPoint sets on newly inserted tables.
    pub const fn banded_header() -> Self {
        Self {
            first_row: true,
            first_col: false,
            last_row: false,
            last_col: false,
            band_row: true,
            band_col: false,
            rtl: false,
        }
    }
}

impl fmt::Display for TableStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.id()) {
            (Some(name), _) => f.write_str(name),
            (None, Some(id)) => f.write_str(id),
            (None, None) => f.write_str("(none)"),
        }
    }
}

impl Serialize for TableStyle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.id() {
            Some(id) => serializer.serialize_some(id),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for TableStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = Option::<String>::deserialize(deserializer)?;
        Ok(id.map(|id| TableStyle::from_id(&id)).unwrap_or_default())
    }
}

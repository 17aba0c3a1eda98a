use serde::{Deserialize, Serialize};

/// Height given to rows created by [`crate::Table::add_row`] (0.4055in, PowerPoint's
/// inserted-row height).
pub const DEFAULT_ROW_HEIGHT: i64 = 370_840;

/// Per-table editing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Height in EMU for rows added without a template.
    pub default_row_height: i64,
    /// How column widths change when a column is duplicated.
    pub column_width_policy: ColumnWidthPolicy,
    /// Allowed difference in EMU between the summed row/column sizes and the table frame.
    pub size_tolerance: i64,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            default_row_height: DEFAULT_ROW_HEIGHT,
            column_width_policy: ColumnWidthPolicy::Redistribute,
            size_tolerance: 0,
        }
    }
}

/// Width handling for [`crate::Table::duplicate_column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnWidthPolicy {
    /// Keep the table width fixed: every column, the copy included, is scaled by
    /// `old_total / (old_total + copied_width)`.
    #[default]
    Redistribute,
    /// Keep every existing width fixed and grow the table by the copied width.
    Append,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: TableSettings =
            serde_json::from_str(r#"{"column_width_policy":"append"}"#).unwrap();
        assert_eq!(settings.column_width_policy, ColumnWidthPolicy::Append);
        assert_eq!(settings.default_row_height, DEFAULT_ROW_HEIGHT);
        assert_eq!(settings.size_tolerance, 0);
    }
}

//! `lectern-model` defines the in-memory model of presentation tables.
//!
//! The centre of the crate is [`Table`]: a rectangular grid of rows and columns whose
//! cells can be merged into rectangular regions. The crate is format-independent; the
//! `.pptx` reader and writer live in `lectern-pptx` and talk to this crate through
//! [`RawGrid`].
//!
//! All lengths are English Metric Units (EMU, 914 400 per inch).

mod address;
mod cell;
mod error;
pub mod raw;
mod settings;
mod style;
mod table;
mod table_style;
mod text;

pub use address::{Axis, GridPos, GridRect};
pub use cell::{Cell, MergeState};
pub use error::{FormatError, GridViolation, LoadWarning, StructuralError};
pub use raw::{RawCell, RawGrid, RawRow};
pub use settings::{ColumnWidthPolicy, TableSettings, DEFAULT_ROW_HEIGHT};
pub use style::{
    BorderLine, Borders, CellLayout, Color, Fill, Font, TextDirection, VerticalAnchor,
};
pub use table::{consolidate_paragraphs, CellMut, CellView, Column, FrameSize, Row, Table};
pub use table_style::{TableLook, TableStyle};
pub use text::{Paragraph, RunKind, TextAlign, TextBody, TextRun, LINE_BREAK};

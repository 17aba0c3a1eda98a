//! DrawingML table import/export for Lectern.
//!
//! Tables live in slide parts as `<a:tbl>` elements nested inside `<p:graphicFrame>`.
//! This crate maps them to and from [`lectern_model::Table`]:
//!
//! - [`read_table_xml`] / [`write_table_xml`] convert a single `<a:tbl>` element.
//! - [`read_slide_tables`] collects every table frame on a slide; a table whose grid is
//!   malformed is kept as [`LoadedTable::Malformed`] so the rest of the slide stays usable.
//! - [`update_slide_xml`] streams a slide and rewrites the editable tables in place.
//! - [`read_slide_tables_from_pptx`] and [`write_pptx_with_parts`] work on the zip package.

mod error;
mod package;
mod slide;
mod table_xml;
mod xml;

pub use error::PptxError;
pub use package::{
    read_slide_tables_from_pptx, slide_part_names, write_pptx_with_parts, DEFAULT_MAX_PART_BYTES,
};
pub use slide::{read_slide_tables, update_slide_xml, LoadedTable, TableFrame};
pub use table_xml::{read_table_xml, read_table_xml_with_settings, write_table_xml};

/// DrawingML main namespace (`a:`).
pub const DRAWINGML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// `a:graphicData@uri` identifying a table payload.
pub const TABLE_GRAPHIC_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";

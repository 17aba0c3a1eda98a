use lectern_model::FormatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PptxError {
    #[error("xml parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("xml attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("xml document error: {0}")]
    Document(#[from] roxmltree::Error),
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("utf-8 error: {0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing <{0}> element")]
    MissingElement(&'static str),
    #[error("<{element}> is missing required attribute `{attr}`")]
    MissingAttribute {
        element: &'static str,
        attr: &'static str,
    },
    #[error("invalid value {value:?} for attribute `{attr}`")]
    InvalidAttribute { attr: &'static str, value: String },
    #[error("malformed table grid: {0}")]
    Format(#[from] FormatError),
    #[error("part {part} is {size} bytes (limit {max})")]
    PartTooLarge { part: String, size: u64, max: u64 },
}

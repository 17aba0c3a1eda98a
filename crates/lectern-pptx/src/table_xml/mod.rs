//! `<a:tbl>` element codec.

use lectern_model::{TextAlign, TextDirection, VerticalAnchor};

mod read;
mod write;

pub use read::{read_table_xml, read_table_xml_with_settings};
pub use write::write_table_xml;

pub(crate) use read::read_table_node;
pub(crate) use write::write_table;

/// `a:pPr/@algn` values (`ST_TextAlignType`).
const TEXT_ALIGN: &[(TextAlign, &str)] = &[
    (TextAlign::Left, "l"),
    (TextAlign::Center, "ctr"),
    (TextAlign::Right, "r"),
    (TextAlign::Justify, "just"),
    (TextAlign::JustifyLow, "justLow"),
    (TextAlign::Distributed, "dist"),
    (TextAlign::ThaiDistributed, "thaiDist"),
];

/// `a:tcPr/@anchor` values (`ST_TextAnchoringType`).
const VERTICAL_ANCHOR: &[(VerticalAnchor, &str)] = &[
    (VerticalAnchor::Top, "t"),
    (VerticalAnchor::Middle, "ctr"),
    (VerticalAnchor::Bottom, "b"),
    (VerticalAnchor::Justified, "just"),
    (VerticalAnchor::Distributed, "dist"),
];

/// `a:tcPr/@vert` values (`ST_TextVerticalType`).
const TEXT_DIRECTION: &[(TextDirection, &str)] = &[
    (TextDirection::Horizontal, "horz"),
    (TextDirection::Vertical, "vert"),
    (TextDirection::Vertical270, "vert270"),
    (TextDirection::Stacked, "wordArtVert"),
    (TextDirection::StackedRtl, "wordArtVertRtl"),
    (TextDirection::EastAsianVertical, "eaVert"),
    (TextDirection::MongolianVertical, "mongolianVert"),
];

fn token_of<T: Copy + PartialEq>(tokens: &[(T, &'static str)], value: T) -> &'static str {
    tokens
        .iter()
        .find(|(v, _)| *v == value)
        .map_or("", |(_, token)| *token)
}

fn value_of<T: Copy>(tokens: &[(T, &'static str)], token: &str) -> Option<T> {
    tokens
        .iter()
        .find(|(_, t)| *t == token.trim())
        .map(|(value, _)| *value)
}

use std::str::FromStr;

use lectern_model::{
    BorderLine, Borders, CellLayout, Color, Fill, Font, LoadWarning, Paragraph, RawCell, RawGrid,
    RawRow, Table, TableLook, TableSettings, TableStyle, TextBody, TextRun,
};
use roxmltree::Node;

use super::{value_of, TEXT_ALIGN, TEXT_DIRECTION, VERTICAL_ANCHOR};
use crate::xml::parse_bool;
use crate::PptxError;

/// Parse the first `<a:tbl>` element in `xml` with default [`TableSettings`].
pub fn read_table_xml(xml: &str) -> Result<Table, PptxError> {
    read_table_xml_with_settings(xml, TableSettings::default())
}

pub fn read_table_xml_with_settings(
    xml: &str,
    settings: TableSettings,
) -> Result<Table, PptxError> {
    let doc = roxmltree::Document::parse(xml)?;
    let tbl = doc
        .descendants()
        .find(|n| is_tag(n, "tbl"))
        .ok_or(PptxError::MissingElement("a:tbl"))?;
    Ok(Table::from_raw(read_raw_grid(tbl)?, settings)?)
}

/// Load one `<a:tbl>` node, returning the repairs made along the way.
pub(crate) fn read_table_node(
    tbl: Node<'_, '_>,
    settings: TableSettings,
) -> Result<(Table, Vec<LoadWarning>), PptxError> {
    let raw = read_raw_grid(tbl)?;
    Ok(Table::from_raw_with_warnings(raw, settings)?)
}

fn read_raw_grid(tbl: Node<'_, '_>) -> Result<RawGrid, PptxError> {
    let grid = child(tbl, "tblGrid").ok_or(PptxError::MissingElement("a:tblGrid"))?;
    let column_widths = children(grid, "gridCol")
        .map(|col| required_attr::<i64>(col, "gridCol", "w"))
        .collect::<Result<Vec<_>, _>>()?;

    let rows = children(tbl, "tr")
        .map(|tr| {
            Ok(RawRow {
                height: required_attr(tr, "tr", "h")?,
                cells: children(tr, "tc").map(read_cell).collect::<Result<_, PptxError>>()?,
            })
        })
        .collect::<Result<Vec<_>, PptxError>>()?;

    let table_pr = child(tbl, "tblPr");
    let style = table_pr
        .and_then(|pr| child(pr, "tableStyleId"))
        .and_then(|id| id.text())
        .map(TableStyle::from_id)
        .unwrap_or_default();
    let flag = |name: &str| {
        table_pr
            .and_then(|pr| pr.attribute(name))
            .is_some_and(parse_bool)
    };
    let look = TableLook {
        first_row: flag("firstRow"),
        first_col: flag("firstCol"),
        last_row: flag("lastRow"),
        last_col: flag("lastCol"),
        band_row: flag("bandRow"),
        band_col: flag("bandCol"),
        rtl: flag("rtl"),
    };

    Ok(RawGrid {
        column_widths,
        rows,
        style,
        look,
    })
}

fn read_cell(tc: Node<'_, '_>) -> Result<RawCell, PptxError> {
    let (fill, borders, layout) = match child(tc, "tcPr") {
        Some(pr) => (read_fill(pr), read_borders(pr)?, read_layout(pr)?),
        None => (Fill::Inherit, Borders::default(), CellLayout::default()),
    };
    Ok(RawCell {
        grid_span: attr(tc, "gridSpan")?.unwrap_or(1),
        row_span: attr(tc, "rowSpan")?.unwrap_or(1),
        h_merge: tc.attribute("hMerge").is_some_and(parse_bool),
        v_merge: tc.attribute("vMerge").is_some_and(parse_bool),
        text: child(tc, "txBody")
            .map(read_text_body)
            .transpose()?
            .unwrap_or_default(),
        fill,
        borders,
        layout,
    })
}

fn read_text_body(body: Node<'_, '_>) -> Result<TextBody, PptxError> {
    let mut paragraphs = children(body, "p")
        .map(read_paragraph)
        .collect::<Result<Vec<_>, _>>()?;
    // A lone empty paragraph is how an empty cell is written.
    if let [only] = paragraphs.as_slice() {
        if *only == Paragraph::default() {
            paragraphs.clear();
        }
    }
    let body_attributes = child(body, "bodyPr")
        .map(|pr| {
            pr.attributes()
                .filter(|a| a.namespace().is_none())
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect()
        })
        .unwrap_or_default();
    Ok(TextBody {
        paragraphs,
        body_attributes,
    })
}

fn read_paragraph(p: Node<'_, '_>) -> Result<Paragraph, PptxError> {
    let runs = p
        .children()
        .filter(|n| n.is_element())
        .filter_map(|n| match n.tag_name().name() {
            "r" => Some(TextRun {
                text: child(n, "t")
                    .and_then(|t| t.text())
                    .unwrap_or_default()
                    .to_string(),
                font: child(n, "rPr").map(read_font).unwrap_or_default(),
                ..TextRun::default()
            }),
            "br" => Some(TextRun {
                font: child(n, "rPr").map(read_font).unwrap_or_default(),
                ..TextRun::line_break()
            }),
            _ => None,
        })
        .collect();
    Ok(Paragraph {
        align: match child(p, "pPr") {
            Some(pr) => token_attr(pr, "algn", TEXT_ALIGN)?,
            None => None,
        },
        runs,
        end_font: child(p, "endParaRPr")
            .map(read_font)
            .filter(|font| !font.is_default()),
    })
}

fn read_font(pr: Node<'_, '_>) -> Font {
    Font {
        size_100pt: pr.attribute("sz").and_then(|v| v.trim().parse().ok()),
        bold: pr.attribute("b").is_some_and(parse_bool),
        italic: pr.attribute("i").is_some_and(parse_bool),
        color: child(pr, "solidFill").and_then(solid_color),
    }
}

/// The fill declared directly on `a:tcPr`. Border lines carry their own `a:solidFill`,
/// so only direct children count.
fn read_fill(pr: Node<'_, '_>) -> Fill {
    if child(pr, "noFill").is_some() {
        return Fill::None;
    }
    match child(pr, "solidFill") {
        Some(solid) => match solid_color(solid) {
            Some(color) => Fill::solid(color),
            None => {
                log::debug!("ignoring cell fill without an sRGB color");
                Fill::Inherit
            }
        },
        None => Fill::Inherit,
    }
}

fn read_borders(pr: Node<'_, '_>) -> Result<Borders, PptxError> {
    let line = |name: &str| -> Result<Option<BorderLine>, PptxError> {
        let Some(ln) = child(pr, name) else {
            return Ok(None);
        };
        Ok(Some(BorderLine {
            width: attr(ln, "w")?.unwrap_or(0),
            color: child(ln, "solidFill").and_then(solid_color),
        }))
    };
    Ok(Borders {
        left: line("lnL")?,
        right: line("lnR")?,
        top: line("lnT")?,
        bottom: line("lnB")?,
    })
}

fn read_layout(pr: Node<'_, '_>) -> Result<CellLayout, PptxError> {
    Ok(CellLayout {
        margin_left: attr(pr, "marL")?,
        margin_right: attr(pr, "marR")?,
        margin_top: attr(pr, "marT")?,
        margin_bottom: attr(pr, "marB")?,
        anchor: token_attr(pr, "anchor", VERTICAL_ANCHOR)?,
        anchor_center: pr.attribute("anchorCtr").is_some_and(parse_bool),
        direction: token_attr(pr, "vert", TEXT_DIRECTION)?,
    })
}

fn solid_color(solid: Node<'_, '_>) -> Option<Color> {
    child(solid, "srgbClr")
        .and_then(|clr| clr.attribute("val"))
        .and_then(Color::from_hex)
}

fn is_tag(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_tag(n, name))
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| is_tag(n, name))
}

fn attr<T: FromStr>(node: Node<'_, '_>, name: &'static str) -> Result<Option<T>, PptxError> {
    node.attribute(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| PptxError::InvalidAttribute {
                    attr: name,
                    value: value.to_string(),
                })
        })
        .transpose()
}

/// An enumerated attribute; values outside `tokens` are rejected.
fn token_attr<T: Copy>(
    node: Node<'_, '_>,
    name: &'static str,
    tokens: &[(T, &'static str)],
) -> Result<Option<T>, PptxError> {
    node.attribute(name)
        .map(|value| {
            value_of(tokens, value).ok_or_else(|| PptxError::InvalidAttribute {
                attr: name,
                value: value.to_string(),
            })
        })
        .transpose()
}

fn required_attr<T: FromStr>(
    node: Node<'_, '_>,
    element: &'static str,
    name: &'static str,
) -> Result<T, PptxError> {
    attr(node, name)?.ok_or(PptxError::MissingAttribute {
        element,
        attr: name,
    })
}

#[cfg(test)]
mod tests {
    use lectern_model::{FormatError, GridPos};
    use pretty_assertions::assert_eq;

    use super::*;

    const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#;

    #[test]
    fn reads_grid_spans_and_text() {
        let xml = format!(
            r#"<a:tbl {NS}>
  <a:tblPr firstRow="1" bandRow="1"><a:tableStyleId>{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}</a:tableStyleId></a:tblPr>
  <a:tblGrid><a:gridCol w="3048000"/><a:gridCol w="3048000"/></a:tblGrid>
  <a:tr h="370840">
    <a:tc gridSpan="2"><a:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US" b="1" sz="1800"/><a:t>Header</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>
    <a:tc hMerge="1"><a:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></a:txBody><a:tcPr/></a:tc>
  </a:tr>
  <a:tr h="370840">
    <a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>a</a:t></a:r></a:p><a:p><a:r><a:t>b</a:t></a:r></a:p></a:txBody><a:tcPr><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></a:tcPr></a:tc>
    <a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p/></a:txBody><a:tcPr><a:lnL w="12700"><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:lnL><a:noFill/></a:tcPr></a:tc>
  </a:tr>
</a:tbl>"#
        );
        let table = read_table_xml(&xml).unwrap();
        table.validate().unwrap();

        assert_eq!(table.style(), &TableStyle::medium_style_2_accent_1());
        assert_eq!(table.look(), TableLook::banded_header());
        assert_eq!(table.width(), 6_096_000);
        assert_eq!(table.height(), 741_680);
        let header = table.cell(0, 1).unwrap();
        assert_eq!(header.id(), GridPos::new(0, 0));
        assert_eq!(header.span(), (1, 2));
        let run = &header.text().paragraphs[0].runs[0];
        assert_eq!(run.text, "Header");
        assert!(run.font.bold);
        assert_eq!(run.font.size_100pt, Some(1800));

        let body = table.cell(1, 0).unwrap();
        assert_eq!(body.text().text(), "a\nb");
        assert_eq!(body.fill(), &Fill::solid(Color::new_rgb(0xFF0000)));

        let plain = table.cell(1, 1).unwrap();
        assert!(plain.text().paragraphs.is_empty());
        assert_eq!(plain.fill(), &Fill::None);
        assert_eq!(
            plain.borders().left,
            Some(BorderLine {
                width: 12_700,
                color: Some(Color::black())
            })
        );
    }

    #[test]
    fn reads_unprefixed_tables() {
        let xml = r#"<tbl><tblGrid><gridCol w="100"/></tblGrid><tr h="50"><tc><txBody><p><r><t>x</t></r></p></txBody></tc></tr></tbl>"#;
        let table = read_table_xml(xml).unwrap();
        assert_eq!(table.cell(0, 0).unwrap().text().text(), "x");
        assert_eq!(table.style(), &TableStyle::None);
    }

    #[test]
    fn reports_bad_attributes_and_grids() {
        let missing = r#"<tbl><tblGrid><gridCol/></tblGrid></tbl>"#;
        assert!(matches!(
            read_table_xml(missing),
            Err(PptxError::MissingAttribute {
                element: "gridCol",
                attr: "w"
            })
        ));

        let bad = r#"<tbl><tblGrid><gridCol w="wide"/></tblGrid></tbl>"#;
        assert!(matches!(
            read_table_xml(bad),
            Err(PptxError::InvalidAttribute { attr: "w", .. })
        ));

        let orphan = r#"<tbl><tblGrid><gridCol w="1"/><gridCol w="1"/></tblGrid><tr h="1"><tc/><tc vMerge="1"/></tr></tbl>"#;
        assert!(matches!(
            read_table_xml(orphan),
            Err(PptxError::Format(FormatError::OrphanCovered { .. }))
        ));

        let bad_anchor = r#"<tbl><tblGrid><gridCol w="1"/></tblGrid><tr h="1"><tc><tcPr anchor="middle"/></tc></tr></tbl>"#;
        assert!(matches!(
            read_table_xml(bad_anchor),
            Err(PptxError::InvalidAttribute { attr: "anchor", .. })
        ));

        assert!(matches!(
            read_table_xml("<p:sp xmlns:p=\"urn:p\"/>"),
            Err(PptxError::MissingElement(_))
        ));
    }
}

//! Table frames on a slide (`p:graphicFrame` elements whose graphic is an `a:tbl`).

use lectern_model::{FrameSize, LoadWarning, Table, TableSettings};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use roxmltree::Node;

use crate::table_xml::{read_table_node, write_table};
use crate::xml::{local_name, prefix_of};
use crate::PptxError;

/// Result of loading one table from a slide.
#[derive(Debug)]
pub enum LoadedTable {
    Editable(Table),
    /// The table's grid could not be loaded. The original XML is kept and written back
    /// untouched; the table cannot be edited.
    Malformed { xml: String, error: PptxError },
}

impl LoadedTable {
    pub fn table(&self) -> Option<&Table> {
        match self {
            LoadedTable::Editable(table) => Some(table),
            LoadedTable::Malformed { .. } => None,
        }
    }

    /// Mutable access, only available for tables that loaded cleanly.
    pub fn table_mut(&mut self) -> Option<&mut Table> {
        match self {
            LoadedTable::Editable(table) => Some(table),
            LoadedTable::Malformed { .. } => None,
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, LoadedTable::Editable(_))
    }
}

/// A graphic frame hosting a table.
#[derive(Debug)]
pub struct TableFrame {
    /// `p:cNvPr@id`, unique per slide.
    pub id: u32,
    /// `p:cNvPr@name`.
    pub name: String,
    /// `p:xfrm/a:ext` as found on the slide.
    pub ext: Option<FrameSize>,
    pub table: LoadedTable,
    /// Repairs made while loading an editable table.
    pub warnings: Vec<LoadWarning>,
}

/// Collect every table frame on a slide, in document order.
///
/// A frame whose table fails to load is reported as [`LoadedTable::Malformed`]; only
/// XML that cannot be parsed at all fails the whole call.
pub fn read_slide_tables(
    slide_xml: &str,
    settings: &TableSettings,
) -> Result<Vec<TableFrame>, PptxError> {
    let doc = roxmltree::Document::parse(slide_xml)?;
    let mut frames = Vec::new();
    for frame in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "graphicFrame")
    {
        let Some(tbl) = frame
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "tbl")
        else {
            continue;
        };
        let c_nv_pr = frame
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "cNvPr");
        let id = c_nv_pr
            .and_then(|n| n.attribute("id"))
            .and_then(|id| id.trim().parse().ok())
            .unwrap_or(0);
        let name = c_nv_pr
            .and_then(|n| n.attribute("name"))
            .unwrap_or_default()
            .to_string();

        let (table, warnings) = match read_table_node(tbl, settings.clone()) {
            Ok((table, warnings)) => {
                for warning in &warnings {
                    log::warn!("table frame {id} ({name:?}): {warning}");
                }
                (LoadedTable::Editable(table), warnings)
            }
            Err(error) => {
                log::warn!("table frame {id} ({name:?}) is not editable: {error}");
                let xml = slide_xml[tbl.range()].to_string();
                (LoadedTable::Malformed { xml, error }, Vec::new())
            }
        };
        frames.push(TableFrame {
            id,
            name,
            ext: frame_ext(frame),
            table,
            warnings,
        });
    }
    Ok(frames)
}

fn frame_ext(frame: Node<'_, '_>) -> Option<FrameSize> {
    let ext = frame
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "xfrm")?
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "ext")?;
    Some(FrameSize {
        width: ext.attribute("cx")?.trim().parse().ok()?,
        height: ext.attribute("cy")?.trim().parse().ok()?,
    })
}

/// Rewrite the editable tables of `frames` into `slide_xml`.
///
/// Each frame is matched by its `p:cNvPr@id`. For editable tables the `<a:tbl>` element
/// is regenerated from the model and `p:xfrm/a:ext` is set to the table size; everything
/// else, including malformed tables and frames not listed, is copied through unchanged.
pub fn update_slide_xml(slide_xml: &str, frames: &[TableFrame]) -> Result<String, PptxError> {
    let mut reader = Reader::from_str(slide_xml);
    reader.config_mut().trim_text(false);

    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();

    let mut skip_depth: usize = 0;
    let mut in_frame = false;
    let mut in_xfrm = false;
    let mut current: Option<&Table> = None;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Eof => break,
            _ if skip_depth > 0 => match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                _ => {}
            },
            Event::Start(ref e) if local_name(e.name().as_ref()) == b"graphicFrame" => {
                in_frame = true;
                current = None;
                writer.write_event(event.to_owned())?;
            }
            Event::End(ref e) if local_name(e.name().as_ref()) == b"graphicFrame" => {
                in_frame = false;
                in_xfrm = false;
                current = None;
                writer.write_event(event.to_owned())?;
            }
            Event::Start(ref e) | Event::Empty(ref e)
                if in_frame && local_name(e.name().as_ref()) == b"cNvPr" =>
            {
                let id = attribute(e, b"id")?.and_then(|id| id.trim().parse::<u32>().ok());
                current = id.and_then(|id| {
                    frames
                        .iter()
                        .find(|frame| frame.id == id)
                        .and_then(|frame| frame.table.table())
                });
                writer.write_event(event.to_owned())?;
            }
            Event::Start(ref e) if in_frame && local_name(e.name().as_ref()) == b"xfrm" => {
                in_xfrm = true;
                writer.write_event(event.to_owned())?;
            }
            Event::End(ref e) if in_frame && local_name(e.name().as_ref()) == b"xfrm" => {
                in_xfrm = false;
                writer.write_event(event.to_owned())?;
            }
            Event::Empty(ref e) if in_xfrm && local_name(e.name().as_ref()) == b"ext" => {
                match current {
                    Some(table) => {
                        writer.write_event(Event::Empty(resized_ext(e, table)?))?;
                    }
                    None => writer.write_event(event.to_owned())?,
                }
            }
            Event::Start(ref e) | Event::Empty(ref e)
                if current.is_some() && local_name(e.name().as_ref()) == b"tbl" =>
            {
                if let Some(table) = current {
                    write_table(&mut writer, table, prefix_of(e.name().as_ref()), false)?;
                }
                if matches!(event, Event::Start(_)) {
                    skip_depth = 1;
                }
            }
            _ => writer.write_event(event.to_owned())?,
        }
        buf.clear();
    }

    Ok(String::from_utf8(writer.into_inner())?)
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, PptxError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(std::str::from_utf8(&attr.value)?.to_string()));
        }
    }
    Ok(None)
}

/// Copy of an `a:ext` element with `cx`/`cy` replaced by the table size.
fn resized_ext(e: &BytesStart<'_>, table: &Table) -> Result<BytesStart<'static>, PptxError> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut ext = BytesStart::new(name);
    for attr in e.attributes() {
        let attr = attr?;
        if !matches!(attr.key.as_ref(), b"cx" | b"cy") {
            ext.push_attribute(attr);
        }
    }
    ext.push_attribute(("cx", table.width().to_string().as_str()));
    ext.push_attribute(("cy", table.height().to_string().as_str()));
    Ok(ext)
}

#[cfg(test)]
mod tests {
    use lectern_model::GridPos;
    use pretty_assertions::assert_eq;

    use super::*;

    fn slide(tables: &[(u32, &str)]) -> String {
        let mut frames = String::new();
        for (id, tbl) in tables {
            frames.push_str(&format!(
                r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Table {id}"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="0" y="0"/><a:ext cx="999" cy="999"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table">{tbl}</a:graphicData></a:graphic></p:graphicFrame>"#
            ));
        }
        format!(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:nvSpPr><p:cNvPr id="2" name="Title"/></p:nvSpPr></p:sp>{frames}</p:spTree></p:cSld></p:sld>"#
        )
    }

    const GOOD: &str = r#"<a:tbl><a:tblPr/><a:tblGrid><a:gridCol w="100"/><a:gridCol w="100"/></a:tblGrid><a:tr h="50"><a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>x</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc><a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p/></a:txBody><a:tcPr/></a:tc></a:tr><a:tr h="50"><a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p/></a:txBody><a:tcPr/></a:tc><a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p/></a:txBody><a:tcPr/></a:tc></a:tr></a:tbl>"#;

    const BROKEN: &str = r#"<a:tbl><a:tblGrid><a:gridCol w="100"/><a:gridCol w="100"/></a:tblGrid><a:tr h="50"><a:tc gridSpan="3"/><a:tc hMerge="1"/></a:tr></a:tbl>"#;

    #[test]
    fn malformed_tables_do_not_block_other_frames() {
        let xml = slide(&[(4, GOOD), (5, BROKEN)]);
        let frames = read_slide_tables(&xml, &TableSettings::default()).unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].id, 4);
        assert_eq!(frames[0].name, "Table 4");
        assert_eq!(
            frames[0].ext,
            Some(FrameSize {
                width: 999,
                height: 999
            })
        );
        assert!(frames[0].table.is_editable());
        match &frames[1].table {
            LoadedTable::Malformed { xml, error } => {
                assert_eq!(xml, BROKEN);
                assert!(matches!(error, PptxError::Format(_)), "{error}");
            }
            other => panic!("expected malformed table, got {other:?}"),
        }
    }

    #[test]
    fn update_rewrites_edited_tables_only() {
        let xml = slide(&[(4, GOOD), (5, BROKEN)]);
        let mut frames = read_slide_tables(&xml, &TableSettings::default()).unwrap();
        assert!(frames[1].table.table_mut().is_none());

        let table = frames[0].table.table_mut().unwrap();
        table.merge_cells(GridPos::new(0, 0), GridPos::new(0, 1)).unwrap();
        table.add_row().unwrap();

        let updated = update_slide_xml(&xml, &frames).unwrap();
        assert!(updated.contains(BROKEN), "{updated}");
        assert!(updated.contains(r#"<p:cNvPr id="2" name="Title"/>"#));
        assert!(updated.contains(r#"<a:ext cx="200" cy="370940"/>"#), "{updated}");
        assert!(updated.contains(r#"<a:ext cx="999" cy="999"/>"#), "{updated}");

        let reread = read_slide_tables(&updated, &TableSettings::default()).unwrap();
        assert_eq!(reread.len(), 2);
        let table = reread[0].table.table().unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(0, 1).unwrap().id(), GridPos::new(0, 0));
        assert_eq!(Some(table), frames[0].table.table());
        assert!(!reread[1].table.is_editable());
    }

    #[test]
    fn frames_report_fills_dropped_from_merged_cells() {
        let tbl = r#"<a:tbl><a:tblGrid><a:gridCol w="100"/><a:gridCol w="100"/></a:tblGrid><a:tr h="50"><a:tc gridSpan="2"/><a:tc hMerge="1"><a:tcPr><a:solidFill><a:srgbClr val="00FF00"/></a:solidFill></a:tcPr></a:tc></a:tr></a:tbl>"#;
        let xml = slide(&[(4, GOOD), (7, tbl)]);
        let frames = read_slide_tables(&xml, &TableSettings::default()).unwrap();

        assert!(frames[0].warnings.is_empty());
        assert!(frames[1].table.is_editable());
        assert_eq!(
            frames[1].warnings,
            vec![LoadWarning::CoveredFillDropped {
                pos: GridPos::new(0, 1),
                fill: lectern_model::Fill::solid(lectern_model::Color::new_rgb(0x00FF00)),
            }]
        );
    }
}

use std::io::Write;

use lectern_model::{
    BorderLine, Borders, CellLayout, Color, Fill, Font, Paragraph, RawCell, RunKind, Table,
    TableLook, TextBody,
};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{token_of, TEXT_ALIGN, TEXT_DIRECTION, VERTICAL_ANCHOR};
use crate::xml::prefixed_tag;
use crate::{PptxError, DRAWINGML_NS};

/// Serialize `table` as a standalone `<a:tbl>` element that declares the DrawingML
/// namespace.
pub fn write_table_xml(table: &Table) -> Result<String, PptxError> {
    let mut writer = Writer::new(Vec::new());
    write_table(&mut writer, table, Some("a"), true)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Write `table` as an `<a:tbl>` element using `prefix` for DrawingML names.
///
/// `declare_ns` adds the `xmlns` declaration, which is only needed when the element is
/// not embedded in a slide that already declares it.
pub(crate) fn write_table<W: Write>(
    writer: &mut Writer<W>,
    table: &Table,
    prefix: Option<&str>,
    declare_ns: bool,
) -> Result<(), PptxError> {
    let mut out = TableWriter { writer, prefix };
    let raw = table.to_raw();

    let tbl = out.tag("tbl");
    let mut start = BytesStart::new(tbl.as_str());
    if declare_ns {
        let key = match prefix {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => "xmlns".to_string(),
        };
        start.push_attribute((key.as_str(), DRAWINGML_NS));
    }
    out.writer.write_event(Event::Start(start))?;

    let look = look_attributes(&raw.look);
    match raw.style.id() {
        Some(id) => {
            out.start("tblPr", &look)?;
            out.text_element("tableStyleId", id)?;
            out.end("tblPr")?;
        }
        None => out.empty("tblPr", &look)?,
    }

    out.start("tblGrid", &[])?;
    for width in &raw.column_widths {
        out.empty("gridCol", &[("w", width.to_string().as_str())])?;
    }
    out.end("tblGrid")?;

    for row in &raw.rows {
        out.start("tr", &[("h", row.height.to_string().as_str())])?;
        for cell in &row.cells {
            out.cell(cell)?;
        }
        out.end("tr")?;
    }

    out.writer
        .write_event(Event::End(BytesEnd::new(tbl.as_str())))?;
    Ok(())
}

fn look_attributes(look: &TableLook) -> Vec<(&'static str, &'static str)> {
    [
        ("rtl", look.rtl),
        ("firstRow", look.first_row),
        ("firstCol", look.first_col),
        ("lastRow", look.last_row),
        ("lastCol", look.last_col),
        ("bandRow", look.band_row),
        ("bandCol", look.band_col),
    ]
    .into_iter()
    .filter(|(_, on)| *on)
    .map(|(name, _)| (name, "1"))
    .collect()
}

struct TableWriter<'w, 'p, W: Write> {
    writer: &'w mut Writer<W>,
    prefix: Option<&'p str>,
}

impl<W: Write> TableWriter<'_, '_, W> {
    fn tag(&self, local: &str) -> String {
        prefixed_tag(self.prefix, local)
    }

    fn element(&self, local: &str, attrs: &[(&str, &str)]) -> BytesStart<'static> {
        let mut start = BytesStart::new(self.tag(local));
        for &attr in attrs {
            start.push_attribute(attr);
        }
        start
    }

    fn start(&mut self, local: &str, attrs: &[(&str, &str)]) -> Result<(), PptxError> {
        let start = self.element(local, attrs);
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn empty(&mut self, local: &str, attrs: &[(&str, &str)]) -> Result<(), PptxError> {
        let start = self.element(local, attrs);
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    fn end(&mut self, local: &str) -> Result<(), PptxError> {
        let tag = self.tag(local);
        self.writer
            .write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        Ok(())
    }

    fn text_element(&mut self, local: &str, text: &str) -> Result<(), PptxError> {
        self.start(local, &[])?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end(local)
    }

    fn cell(&mut self, cell: &RawCell) -> Result<(), PptxError> {
        let grid_span = cell.grid_span.to_string();
        let row_span = cell.row_span.to_string();
        let mut attrs: Vec<(&str, &str)> = Vec::new();
        if cell.grid_span > 1 {
            attrs.push(("gridSpan", grid_span.as_str()));
        }
        if cell.row_span > 1 {
            attrs.push(("rowSpan", row_span.as_str()));
        }
        if cell.h_merge {
            attrs.push(("hMerge", "1"));
        }
        if cell.v_merge {
            attrs.push(("vMerge", "1"));
        }
        self.start("tc", &attrs)?;
        self.text_body(&cell.text)?;
        self.cell_properties(&cell.fill, &cell.borders, &cell.layout)?;
        self.end("tc")
    }

    fn text_body(&mut self, body: &TextBody) -> Result<(), PptxError> {
        self.start("txBody", &[])?;
        let body_attributes: Vec<(&str, &str)> = body
            .body_attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        self.empty("bodyPr", &body_attributes)?;
        self.empty("lstStyle", &[])?;
        if body.paragraphs.is_empty() {
            self.empty("p", &[])?;
        }
        for paragraph in &body.paragraphs {
            self.paragraph(paragraph)?;
        }
        self.end("txBody")
    }

    fn paragraph(&mut self, paragraph: &Paragraph) -> Result<(), PptxError> {
        if *paragraph == Paragraph::default() {
            return self.empty("p", &[]);
        }
        self.start("p", &[])?;
        if let Some(align) = paragraph.align {
            self.empty("pPr", &[("algn", token_of(TEXT_ALIGN, align))])?;
        }
        for run in &paragraph.runs {
            let local = match run.kind {
                RunKind::Text => "r",
                RunKind::LineBreak => "br",
            };
            if run.kind == RunKind::LineBreak && run.font.is_default() {
                self.empty(local, &[])?;
                continue;
            }
            self.start(local, &[])?;
            if !run.font.is_default() {
                self.font("rPr", &run.font)?;
            }
            if run.kind == RunKind::Text {
                self.text_element("t", &run.text)?;
            }
            self.end(local)?;
        }
        if let Some(font) = &paragraph.end_font {
            self.font("endParaRPr", font)?;
        }
        self.end("p")
    }

    fn font(&mut self, local: &str, font: &Font) -> Result<(), PptxError> {
        let size = font.size_100pt.map(|sz| sz.to_string());
        let mut attrs: Vec<(&str, &str)> = Vec::new();
        if let Some(size) = &size {
            attrs.push(("sz", size.as_str()));
        }
        if font.bold {
            attrs.push(("b", "1"));
        }
        if font.italic {
            attrs.push(("i", "1"));
        }
        match font.color {
            Some(color) => {
                self.start(local, &attrs)?;
                self.solid_fill(color)?;
                self.end(local)
            }
            None => self.empty(local, &attrs),
        }
    }

    fn cell_properties(
        &mut self,
        fill: &Fill,
        borders: &Borders,
        layout: &CellLayout,
    ) -> Result<(), PptxError> {
        let margins = [
            ("marL", layout.margin_left),
            ("marR", layout.margin_right),
            ("marT", layout.margin_top),
            ("marB", layout.margin_bottom),
        ]
        .map(|(name, value)| (name, value.map(|v| v.to_string())));
        let mut attrs: Vec<(&str, &str)> = margins
            .iter()
            .filter_map(|(name, value)| Some((*name, value.as_deref()?)))
            .collect();
        if let Some(direction) = layout.direction {
            attrs.push(("vert", token_of(TEXT_DIRECTION, direction)));
        }
        if let Some(anchor) = layout.anchor {
            attrs.push(("anchor", token_of(VERTICAL_ANCHOR, anchor)));
        }
        if layout.anchor_center {
            attrs.push(("anchorCtr", "1"));
        }

        if fill.is_inherit() && borders.is_empty() {
            return self.empty("tcPr", &attrs);
        }
        self.start("tcPr", &attrs)?;
        for (local, line) in [
            ("lnL", &borders.left),
            ("lnR", &borders.right),
            ("lnT", &borders.top),
            ("lnB", &borders.bottom),
        ] {
            if let Some(line) = line {
                self.border_line(local, line)?;
            }
        }
        match fill {
            Fill::Inherit => {}
            Fill::None => self.empty("noFill", &[])?,
            Fill::Solid { color } => self.solid_fill(*color)?,
        }
        self.end("tcPr")
    }

    fn border_line(&mut self, local: &str, line: &BorderLine) -> Result<(), PptxError> {
        let width = line.width.to_string();
        match line.color {
            Some(color) => {
                self.start(local, &[("w", width.as_str())])?;
                self.solid_fill(color)?;
                self.end(local)
            }
            None => self.empty(local, &[("w", width.as_str())]),
        }
    }

    fn solid_fill(&mut self, color: Color) -> Result<(), PptxError> {
        self.start("solidFill", &[])?;
        self.empty("srgbClr", &[("val", color.to_hex().as_str())])?;
        self.end("solidFill")
    }
}

#[cfg(test)]
mod tests {
    use lectern_model::GridPos;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::read_table_xml;

    #[test]
    fn writes_spans_as_drawingml_flags() {
        let mut table = Table::new(&[100, 100], &[50, 50]).unwrap();
        table
            .merge_cells(GridPos::new(0, 0), GridPos::new(1, 0))
            .unwrap();
        table.cell_mut(0, 0).unwrap().set_text("a < b & c");

        let xml = write_table_xml(&table).unwrap();
        assert!(xml.starts_with(
            r#"<a:tbl xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:tblPr/>"#
        ));
        assert!(xml.contains(r#"<a:tc rowSpan="2">"#), "{xml}");
        assert!(xml.contains(r#"<a:tc vMerge="1">"#), "{xml}");
        assert!(xml.contains("a &lt; b &amp; c"), "{xml}");

        assert_eq!(read_table_xml(&xml).unwrap(), table);
    }

    #[test]
    fn unprefixed_output_uses_default_namespace() {
        let table = Table::new(&[100], &[50]).unwrap();
        let mut writer = Writer::new(Vec::new());
        write_table(&mut writer, &table, None, true).unwrap();
        let xml = String::from_utf8(writer.into_inner()).unwrap();
        assert!(xml.starts_with(
            r#"<tbl xmlns="http://schemas.openxmlformats.org/drawingml/2006/main">"#
        ));
        assert_eq!(read_table_xml(&xml).unwrap(), table);
    }

    #[test]
    fn keeps_table_flags_breaks_and_cell_layout() {
        let xml = r#"<a:tbl xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:tblPr firstRow="1" bandRow="1"/><a:tblGrid><a:gridCol w="100"/></a:tblGrid><a:tr h="50"><a:tc><a:txBody><a:bodyPr lIns="0" anchor="t" wrap="square"/><a:lstStyle/><a:p><a:pPr algn="ctr"/><a:r><a:t>a</a:t></a:r><a:br><a:rPr b="1"/></a:br><a:r><a:t>b</a:t></a:r></a:p></a:txBody><a:tcPr marL="0" marT="45720" anchor="ctr" vert="vert270"/></a:tc></a:tr></a:tbl>"#;
        let table = read_table_xml(xml).unwrap();
        let out = write_table_xml(&table).unwrap();

        assert!(out.contains(r#"<a:tblPr firstRow="1" bandRow="1"/>"#), "{out}");
        assert!(
            out.contains(r#"<a:bodyPr lIns="0" anchor="t" wrap="square"/>"#),
            "{out}"
        );
        assert!(
            out.contains(r#"<a:p><a:pPr algn="ctr"/><a:r><a:t>a</a:t></a:r><a:br><a:rPr b="1"/></a:br><a:r><a:t>b</a:t></a:r></a:p>"#),
            "{out}"
        );
        assert!(
            out.contains(r#"<a:tcPr marL="0" marT="45720" vert="vert270" anchor="ctr"/>"#),
            "{out}"
        );
        assert_eq!(read_table_xml(&out).unwrap(), table);
    }

    #[test]
    fn merged_anchor_keeps_its_layout() {
        let mut table = Table::new(&[100, 100], &[50]).unwrap();
        table.set_look(TableLook::banded_header());
        table.cell_mut(0, 0).unwrap().set_layout(CellLayout {
            anchor: Some(lectern_model::VerticalAnchor::Bottom),
            ..CellLayout::default()
        });
        table.cell_mut(0, 1).unwrap().set_text("x\u{b}y");
        table
            .merge_cells(GridPos::new(0, 0), GridPos::new(0, 1))
            .unwrap();

        let xml = write_table_xml(&table).unwrap();
        assert!(xml.contains(r#"<a:tc gridSpan="2">"#), "{xml}");
        assert!(xml.contains(r#"<a:tcPr anchor="b"/>"#), "{xml}");
        assert!(xml.contains("<a:t>x</a:t></a:r><a:br/><a:r><a:t>y</a:t>"), "{xml}");
        assert_eq!(read_table_xml(&xml).unwrap(), table);
    }
}

use std::collections::HashMap;
use std::io::{Read, Seek, Write};

use lectern_model::TableSettings;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::slide::{read_slide_tables, TableFrame};
use crate::PptxError;

/// Maximum uncompressed size of a single part read into memory.
pub const DEFAULT_MAX_PART_BYTES: u64 = 64 * 1024 * 1024;

/// Open a part by name, accepting entries stored with a leading `/`.
fn open_part<'a, R: Read + Seek>(
    archive: &'a mut ZipArchive<R>,
    name: &str,
) -> Result<ZipFile<'a>, ZipError> {
    let wanted = name.trim_start_matches('/');
    let index = archive
        .file_names()
        .position(|entry| entry.trim_start_matches('/') == wanted)
        .ok_or(ZipError::FileNotFound)?;
    archive.by_index(index)
}

fn read_part_to_string<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    max_bytes: u64,
) -> Result<String, PptxError> {
    let file = open_part(archive, name)?;
    if file.size() > max_bytes {
        return Err(PptxError::PartTooLarge {
            part: name.to_string(),
            size: file.size(),
            max: max_bytes,
        });
    }
    // The declared size can be forged; cap the actual read as well.
    read_capped(file, name, max_bytes)
}

fn read_capped(reader: impl Read, name: &str, max_bytes: u64) -> Result<String, PptxError> {
    let mut bytes = Vec::new();
    reader.take(max_bytes + 1).read_to_end(&mut bytes)?;
    if bytes.len() as u64 > max_bytes {
        return Err(PptxError::PartTooLarge {
            part: name.to_string(),
            size: bytes.len() as u64,
            max: max_bytes,
        });
    }
    Ok(String::from_utf8(bytes)?)
}

/// Slide parts of a presentation (`ppt/slides/slideN.xml`), ordered by slide number.
pub fn slide_part_names<R: Read + Seek>(archive: &ZipArchive<R>) -> Vec<String> {
    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = name
                .trim_start_matches('/')
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?
                .parse()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort();
    slides.into_iter().map(|(_, name)| name).collect()
}

/// Read the table frames of one slide part.
pub fn read_slide_tables_from_pptx<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    slide_path: &str,
    settings: &TableSettings,
) -> Result<Vec<TableFrame>, PptxError> {
    let xml = read_part_to_string(archive, slide_path, DEFAULT_MAX_PART_BYTES)?;
    read_slide_tables(&xml, settings)
}

/// Copy `archive` into `out`, replacing the named parts with new contents.
///
/// Untouched parts are raw-copied without recompression. Replacement names must match
/// existing entries; unknown names are reported as [`ZipError::FileNotFound`].
pub fn write_pptx_with_parts<R: Read + Seek, W: Write + Seek>(
    archive: &mut ZipArchive<R>,
    out: W,
    parts: &HashMap<String, String>,
) -> Result<W, PptxError> {
    let mut zip = ZipWriter::new(out);
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);
    let mut written = 0;
    for index in 0..archive.len() {
        let file = archive.by_index(index)?;
        let name = file.name().to_string();
        match parts.get(name.trim_start_matches('/')) {
            Some(xml) => {
                zip.start_file(name, options)?;
                zip.write_all(xml.as_bytes())?;
                written += 1;
            }
            None => zip.raw_copy_file(file)?,
        }
    }
    if written != parts.len() {
        return Err(ZipError::FileNotFound.into());
    }
    Ok(zip.finish()?)
}

//! Built-in document format collaborators
//!
//! DOCX and XLSX are zip containers of XML parts; PDF is read and written
//! through `lopdf`. Each type plugs into [`ExtractorRegistry::builtin`].
//!
//! [`ExtractorRegistry::builtin`]: crate::session::ExtractorRegistry::builtin

pub mod docx;
pub mod pdf;
pub mod xlsx;

pub use docx::DocxExtractor;
pub use pdf::{PdfEncoder, PdfExtractor};
pub use xlsx::XlsxExtractor;

use anyhow::{Context, Result};
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

fn open_archive(bytes: &[u8]) -> Result<Archive<'_>> {
    ZipArchive::new(Cursor::new(bytes)).context("Not a valid zip container")
}

/// Read one XML part of a container, `None` when the part is absent
fn read_part(archive: &mut Archive<'_>, name: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to open {name}")),
    };

    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .with_context(|| format!("Failed to read {name}"))?;
    Ok(Some(xml))
}

#[cfg(test)]
pub(crate) fn zip_container(parts: &[(&str, &str)]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

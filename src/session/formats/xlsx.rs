//! XLSX text extraction
//!
//! Every worksheet becomes a block of tab-separated rows; blocks are separated
//! by a blank line, in sheet order.

use super::{open_archive, read_part, Archive};
use crate::session::TextExtractor;
use anyhow::{anyhow, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const SHEET_PREFIX: &str = "xl/worksheets/sheet";

/// Reads cell values of every worksheet
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxExtractor;

impl TextExtractor for XlsxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = open_archive(bytes)?;
        let shared = match read_part(&mut archive, SHARED_STRINGS_PART)? {
            Some(xml) => shared_strings(&xml)?,
            None => Vec::new(),
        };

        let sheets = sheet_parts(&archive);
        if sheets.is_empty() {
            anyhow::bail!("workbook has no worksheets");
        }

        let mut blocks = Vec::with_capacity(sheets.len());
        for part in sheets {
            let xml = read_part(&mut archive, &part)?
                .ok_or_else(|| anyhow!("{part} is missing"))?;
            blocks.push(sheet_rows(&xml, &shared).with_context(|| format!("Invalid {part}"))?);
        }

        Ok(blocks.join("\n\n"))
    }

    fn name(&self) -> &'static str {
        "xlsx_extractor"
    }
}

/// Worksheet part names ordered by sheet number
fn sheet_parts(archive: &Archive<'_>) -> Vec<String> {
    let mut numbered: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = name.strip_prefix(SHEET_PREFIX)?.strip_suffix(".xml")?;
            Some((number.parse().ok()?, name.to_string()))
        })
        .collect();
    numbered.sort();
    numbered.into_iter().map(|(_, name)| name).collect()
}

fn shared_strings(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"si" => strings.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(strings)
}

fn sheet_rows(xml: &str, shared: &[String]) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell_type: Option<String> = None;
    let mut value = String::new();
    let mut capture = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => row.clear(),
                b"c" => {
                    cell_type = type_attribute(&e)?;
                    value.clear();
                }
                b"v" | b"t" => capture = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"c" => row.push(String::new()),
                b"row" => rows.push(String::new()),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"v" | b"t" => capture = false,
                b"c" => row.push(cell_text(cell_type.as_deref(), &value, shared)?),
                b"row" => rows.push(row.join("\t").trim_end_matches('\t').to_string()),
                _ => {}
            },
            Event::Text(t) if capture => value.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rows.join("\n"))
}

fn type_attribute(element: &BytesStart<'_>) -> Result<Option<String>> {
    Ok(match element.try_get_attribute("t")? {
        Some(attribute) => Some(attribute.unescape_value()?.into_owned()),
        None => None,
    })
}

fn cell_text(cell_type: Option<&str>, value: &str, shared: &[String]) -> Result<String> {
    match cell_type {
        Some("s") => {
            let index: usize = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid shared string index {value:?}"))?;
            shared
                .get(index)
                .cloned()
                .ok_or_else(|| anyhow!("Shared string {index} does not exist"))
        }
        Some("b") => Ok(if value.trim() == "1" { "TRUE" } else { "FALSE" }.to_string()),
        _ => Ok(value.to_string()),
    }
}

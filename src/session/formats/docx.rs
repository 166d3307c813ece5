//! DOCX text extraction

use super::{open_archive, read_part};
use crate::session::TextExtractor;
use anyhow::{anyhow, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads the main document part, one line per paragraph
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = open_archive(bytes)?;
        let xml = read_part(&mut archive, DOCUMENT_PART)?
            .ok_or_else(|| anyhow!("{DOCUMENT_PART} is missing"))?;
        paragraphs(&xml)
    }

    fn name(&self) -> &'static str {
        "docx_extractor"
    }
}

fn paragraphs(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    // Tab stops in paragraph properties are not content
    let mut in_tab_stops = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                b"tabs" => in_tab_stops = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"tabs" => in_tab_stops = false,
                b"p" => lines.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" if !in_tab_stops => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                b"p" => lines.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}

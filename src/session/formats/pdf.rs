//! PDF text extraction and a minimal fixed-layout PDF writer

use crate::session::{DocumentEncoder, TextExtractor};
use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// A4 portrait, in points
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const FONT_SIZE: i64 = 10;
const LEADING: i64 = 12;

/// Concatenates the text of every page, in page order
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let document = Document::load_mem(bytes).context("Failed to parse PDF")?;
        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        if pages.is_empty() {
            return Ok(String::new());
        }
        document
            .extract_text(&pages)
            .context("Failed to extract PDF text")
    }

    fn name(&self) -> &'static str {
        "pdf_extractor"
    }
}

/// Writes text as monospaced lines on A4 pages
///
/// Long lines are wrapped at `columns`; characters outside Latin-1 are
/// written as `?`.
#[derive(Debug, Clone, Copy)]
pub struct PdfEncoder {
    columns: usize,
    lines_per_page: usize,
}

impl Default for PdfEncoder {
    fn default() -> Self {
        // Courier advances 0.6 em per glyph
        let usable_width = (PAGE_WIDTH - 2 * MARGIN) as f64;
        let columns = (usable_width / (FONT_SIZE as f64 * 0.6)) as usize;
        let lines_per_page = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;
        Self {
            columns,
            lines_per_page,
        }
    }
}

impl PdfEncoder {
    fn layout(&self, text: &str) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();
        for line in text.lines() {
            let encoded: Vec<u8> = line.chars().map(win_ansi_byte).collect();
            if encoded.is_empty() {
                lines.push(encoded);
                continue;
            }
            lines.extend(encoded.chunks(self.columns).map(<[u8]>::to_vec));
        }
        lines
    }

    fn page_content(lines: &[Vec<u8>]) -> Result<Vec<u8>> {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(FONT_SIZE)],
            ),
            Operation::new("TL", vec![Object::Integer(LEADING)]),
            Operation::new(
                "Td",
                vec![
                    Object::Integer(MARGIN),
                    Object::Integer(PAGE_HEIGHT - MARGIN),
                ],
            ),
        ];
        for line in lines {
            operations.push(Operation::new("Tj", vec![Object::string_literal(line.clone())]));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        Content { operations }
            .encode()
            .context("Failed to encode page content")
    }
}

impl DocumentEncoder for PdfEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let lines = self.layout(text);
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();

        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });

        let chunks: Vec<&[Vec<u8>]> = if lines.is_empty() {
            vec![&lines[..]]
        } else {
            lines.chunks(self.lines_per_page).collect()
        };

        let mut kids: Vec<Object> = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let content_id =
                document.add_object(Stream::new(dictionary! {}, Self::page_content(chunk)?));
            let page_id: ObjectId = document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(PAGE_WIDTH),
                    Object::Integer(PAGE_HEIGHT),
                ],
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        document
            .save_to(&mut bytes)
            .context("Failed to write PDF")?;
        Ok(bytes)
    }

    fn name(&self) -> &'static str {
        "pdf_encoder"
    }
}

fn win_ansi_byte(c: char) -> u8 {
    match c as u32 {
        0x09 => b' ',
        code @ 0x20..=0x7E => code as u8,
        code @ 0xA0..=0xFF => code as u8,
        _ => b'?',
    }
}

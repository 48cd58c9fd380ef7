//! # PDF Serializer
//!
//! The Page Renderer: takes the laid-out pages from the layout engine and
//! writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer. Reports only use the standard
//! Type1 fonts, so every object is a short dictionary and the only binary
//! data are the Flate-compressed content streams.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (catalog, page tree, fonts, pages, streams)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Layout works top-down in millimetres; PDF works bottom-up in points.
//! The conversion happens here and nowhere else.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;
use tracing::debug;

use crate::error::ReportError;
use crate::font::{FontContext, StandardFont, TextMeasure};
use crate::layout::{DrawInstruction, Document, LineSegment, Page, TextAlign, TextRun};
use crate::model::page::MM_PER_PT;
use crate::model::{non_blank, InterviewRecord};

/// Grey used for section rules.
const RULE_GREY: f64 = 0.78;
const RULE_WIDTH_PT: f64 = 0.5;

/// Document information dictionary entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

impl ReportMetadata {
    /// Title from the candidate, author from the interviewer.
    pub fn for_record(record: &InterviewRecord) -> Self {
        Self {
            title: non_blank(record.candidate_name.as_deref())
                .map(|name| format!("{} Interview Summary", name)),
            author: non_blank(record.interviewer_name.as_deref()).map(str::to_string),
            subject: non_blank(record.role.as_deref()).map(str::to_string),
        }
    }
}

pub struct PdfWriter {
    font_context: FontContext,
}

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<Vec<u8>>,
    /// Fonts in resource order: /F0, /F1, ...
    font_objects: Vec<(StandardFont, usize)>,
}

impl PdfBuilder {
    fn add(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len() - 1
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self {
            font_context: FontContext::new(),
        }
    }

    /// Write laid-out pages to a PDF byte vector.
    pub fn write(&self, document: &Document, metadata: &ReportMetadata) -> Result<Vec<u8>, ReportError> {
        if document.pages.is_empty() {
            return Err(ReportError::RenderError(
                "document has no pages".to_string(),
            ));
        }

        // Reserve object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3+ = fonts, then content streams and page objects
        let mut builder = PdfBuilder {
            objects: vec![Vec::new(), Vec::new(), Vec::new()],
            font_objects: Vec::new(),
        };

        self.register_fonts(&mut builder, document);
        let font_resources = self.build_font_resource_dict(&builder.font_objects);

        let mut page_obj_ids: Vec<usize> = Vec::new();
        for page in &document.pages {
            let content = self.build_content_stream_for_page(page, &builder);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            let content_obj_id = builder.add(content_data);

            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << {} >> >> >>",
                to_pt(page.width),
                to_pt(page.height),
                content_obj_id,
                font_resources
            );
            page_obj_ids.push(builder.add(page_dict.into_bytes()));
        }

        builder.objects[1] = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = self.write_info(&mut builder, metadata);
        let bytes = self.serialize(&builder, info_obj_id);
        debug!(
            pages = document.pages.len(),
            bytes = bytes.len(),
            "pdf serialized"
        );
        Ok(bytes)
    }

    fn write_info(&self, builder: &mut PdfBuilder, metadata: &ReportMetadata) -> Option<usize> {
        if metadata.title.is_none() && metadata.author.is_none() && metadata.subject.is_none() {
            return None;
        }
        let mut info = String::from("<< ");
        if let Some(ref title) = metadata.title {
            let _ = write!(info, "/Title {} ", Self::text_string(title));
        }
        if let Some(ref author) = metadata.author {
            let _ = write!(info, "/Author {} ", Self::text_string(author));
        }
        if let Some(ref subject) = metadata.subject {
            let _ = write!(info, "/Subject {} ", Self::text_string(subject));
        }
        let _ = write!(
            info,
            "/Producer (interview-report {}) >>",
            env!("CARGO_PKG_VERSION")
        );
        Some(builder.add(info.into_bytes()))
    }

    /// One Type1 font object per standard font actually used, in order of
    /// first use.
    fn register_fonts(&self, builder: &mut PdfBuilder, document: &Document) {
        let mut used: Vec<StandardFont> = Vec::new();
        for (_, run) in document.text_runs() {
            let font = StandardFont::resolve(run.font_family, run.font_style);
            if !used.contains(&font) {
                used.push(font);
            }
        }

        for font in used {
            let dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            let id = builder.add(dict.into_bytes());
            builder.font_objects.push((font, id));
        }
    }

    fn build_font_resource_dict(&self, font_objects: &[(StandardFont, usize)]) -> String {
        font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream_for_page(&self, page: &Page, builder: &PdfBuilder) -> String {
        let mut stream = String::new();
        let page_height = to_pt(page.height);

        for instruction in &page.instructions {
            match instruction {
                DrawInstruction::DrawText(run) => {
                    self.write_text(&mut stream, run, page_height, builder)
                }
                DrawInstruction::DrawLine(line) => self.write_line(&mut stream, line, page_height),
            }
        }

        stream
    }

    fn write_text(&self, stream: &mut String, run: &TextRun, page_height: f64, builder: &PdfBuilder) {
        let font = StandardFont::resolve(run.font_family, run.font_style);
        let font_idx = builder
            .font_objects
            .iter()
            .position(|(f, _)| *f == font)
            .unwrap_or(0);

        let width_mm = self
            .font_context
            .measure(&run.content, run.font_family, run.font_style, run.font_size)
            * MM_PER_PT;
        let x_mm = match run.align {
            TextAlign::Left => run.x,
            TextAlign::Center => run.x - width_mm / 2.0,
            TextAlign::Right => run.x - width_mm,
        };

        let _ = write!(
            stream,
            "BT\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            font_idx,
            run.font_size,
            to_pt(x_mm),
            page_height - to_pt(run.y),
            Self::encode_text(&run.content)
        );
    }

    fn write_line(&self, stream: &mut String, line: &LineSegment, page_height: f64) {
        let _ = write!(
            stream,
            "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
            RULE_GREY,
            RULE_GREY,
            RULE_GREY,
            RULE_WIDTH_PT,
            to_pt(line.x1),
            page_height - to_pt(line.y1),
            to_pt(line.x2),
            page_height - to_pt(line.y2)
        );
    }

    /// Encode text as a WinAnsi PDF string body with escapes.
    fn encode_text(text: &str) -> String {
        let mut out = String::new();
        for ch in text.chars() {
            let b = Self::unicode_to_winansi(ch).unwrap_or(b'?');
            match b {
                b'\\' => out.push_str("\\\\"),
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                0x20..=0x7E => out.push(b as char),
                _ => {
                    // Octal escape for bytes outside ASCII printable range
                    let _ = write!(out, "\\{:03o}", b);
                }
            }
        }
        out
    }

    /// A PDF text string: a literal for ASCII, UTF-16BE hex with a byte
    /// order mark for anything else.
    fn text_string(s: &str) -> String {
        if s.is_ascii() {
            return format!("({})", Self::escape_pdf_string(s));
        }
        let mut hex = String::from("<FEFF");
        for unit in s.encode_utf16() {
            let _ = write!(hex, "{:04X}", unit);
        }
        hex.push('>');
        hex
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is based on Windows-1252. Most codepoints in
    /// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
    /// contains special mappings for smart quotes, bullets, dashes, etc.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        if ch == '\t' {
            return Some(b' ');
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82), // Single low-9 quotation mark
            0x0192 => Some(0x83), // Latin small letter f with hook
            0x201E => Some(0x84), // Double low-9 quotation mark
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86), // Dagger
            0x2021 => Some(0x87), // Double dagger
            0x02C6 => Some(0x88), // Modifier letter circumflex accent
            0x2030 => Some(0x89), // Per mille sign
            0x0160 => Some(0x8A), // Latin capital letter S with caron
            0x2039 => Some(0x8B), // Single left-pointing angle quotation
            0x0152 => Some(0x8C), // Latin capital ligature OE
            0x017D => Some(0x8E), // Latin capital letter Z with caron
            0x2018 => Some(0x91), // Left single quotation mark
            0x2019 => Some(0x92), // Right single quotation mark
            0x201C => Some(0x93), // Left double quotation mark
            0x201D => Some(0x94), // Right double quotation mark
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x02DC => Some(0x98), // Small tilde
            0x2122 => Some(0x99), // Trade mark sign
            0x0161 => Some(0x9A), // Latin small letter s with caron
            0x203A => Some(0x9B), // Single right-pointing angle quotation
            0x0153 => Some(0x9C), // Latin small ligature oe
            0x017E => Some(0x9E), // Latin small letter z with caron
            0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
            _ => None,
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: Option<usize>) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(obj);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(output, "trailer\n<< /Size {} /Root 1 0 R", builder.objects.len());
        if let Some(info_id) = info_obj_id {
            let _ = write!(output, " /Info {} 0 R", info_id);
        }
        let _ = write!(output, " >>\nstartxref\n{}\n%%EOF\n", xref_offset);

        output
    }
}

fn to_pt(mm: f64) -> f64 {
    mm / MM_PER_PT
}

//! # Page-Aware Layout Engine
//!
//! Turns an interview record into pages of absolutely positioned draw
//! instructions. Nothing here knows about PDF; the [`crate::pdf`] writer
//! maps the instructions to PDF operators afterwards.
//!
//! ## How Layout Works
//!
//! There is no infinite canvas that gets sliced afterwards. A single
//! vertical cursor walks down the current page:
//!
//! 1. Content is grouped into blocks: rows of already wrapped text.
//! 2. Before a block is placed, its full height is compared with the space
//!    left above the bottom margin.
//! 3. If it fits, every row goes on this page and the cursor moves down.
//! 4. If it doesn't, the page is closed and the block starts on a fresh one.
//! 5. Only a block taller than a whole page flows across pages row by row.
//!
//! The check happens once per block, so a question with its code and
//! feedback stays together whenever it can.

pub mod page_break;
mod report;

use serde::Serialize;
use tracing::debug;

use crate::error::ReportError;
use crate::font::{FontFamily, FontStyle, TextMeasure};
use crate::model::page::MM_PER_PT;
use crate::model::{InterviewRecord, PageGeometry};
use page_break::{decide_break, BreakDecision, FIT_TOLERANCE};

/// Portion of the font size that hangs below the baseline.
const DESCENT_RATIO: f64 = 0.2;

// ── Output: pages of draw instructions ──────────────────────────────

/// The laid-out report: an ordered sequence of fixed-size pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

/// One page and the instructions drawn on it, in drawing order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub width: f64,
    pub height: f64,
    pub instructions: Vec<DrawInstruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawInstruction {
    DrawText(TextRun),
    DrawLine(LineSegment),
}

/// A single display line of text. `y` is the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub content: String,
    /// Anchor x: the left edge, the page centre, or the right margin,
    /// depending on `align`.
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub font_family: FontFamily,
    pub font_style: FontStyle,
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl Page {
    /// Text runs on this page, in drawing order.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.instructions.iter().filter_map(|i| match i {
            DrawInstruction::DrawText(run) => Some(run),
            DrawInstruction::DrawLine(_) => None,
        })
    }
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every text run with the index of the page it is on.
    pub fn text_runs(&self) -> impl Iterator<Item = (usize, &TextRun)> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(idx, page)| page.text_runs().map(move |run| (idx, run)))
    }

    /// First text run whose content starts with `prefix`.
    pub fn find_text(&self, prefix: &str) -> Option<(usize, &TextRun)> {
        self.text_runs().find(|(_, run)| run.content.starts_with(prefix))
    }

    pub fn contains_text(&self, content: &str) -> bool {
        self.text_runs().any(|(_, run)| run.content == content)
    }
}

// ── Layout state ────────────────────────────────────────────────────

/// The vertical cursor and the pages built so far.
///
/// Created once per render and threaded through every drawing call.
/// `current_y` never passes `page_height - margin`; it returns to `margin`
/// on every new page.
#[derive(Debug, Clone)]
pub struct LayoutState {
    pub geometry: PageGeometry,
    pub current_y: f64,
    /// Zero-based index of the page under construction.
    pub page_index: usize,
    instructions: Vec<DrawInstruction>,
    pages: Vec<Page>,
}

impl LayoutState {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            current_y: geometry.margin,
            geometry,
            page_index: 0,
            instructions: Vec::new(),
            pages: Vec::new(),
        }
    }

    /// Space left above the bottom margin.
    pub fn remaining_height(&self) -> f64 {
        (self.geometry.bottom() - self.current_y).max(0.0)
    }

    pub fn at_page_top(&self) -> bool {
        self.current_y <= self.geometry.margin + FIT_TOLERANCE
    }

    /// Close the current page and open a fresh one.
    pub fn new_page(&mut self) {
        debug!(
            page = self.page_index,
            cursor = self.current_y,
            "page break"
        );
        let finished = self.finalize_page();
        self.pages.push(finished);
        self.page_index += 1;
        self.current_y = self.geometry.margin;
    }

    /// Start a new page unless `required` fits below the cursor.
    pub fn ensure_space(&mut self, required: f64) {
        if self.current_y + required > self.geometry.bottom() + FIT_TOLERANCE && !self.at_page_top()
        {
            self.new_page();
        }
    }

    /// Move the cursor down, stopping at the bottom margin.
    pub fn advance(&mut self, dy: f64) {
        self.current_y = (self.current_y + dy).min(self.geometry.bottom());
    }

    pub fn push_text(&mut self, run: TextRun) {
        self.instructions.push(DrawInstruction::DrawText(run));
    }

    /// Horizontal rule across the content width at the cursor.
    pub fn push_rule(&mut self) {
        let y = self.current_y;
        self.instructions.push(DrawInstruction::DrawLine(LineSegment {
            x1: self.geometry.margin,
            y1: y,
            x2: self.geometry.page_width - self.geometry.margin,
            y2: y,
        }));
    }

    /// Close the last page and hand back the document.
    pub fn finish(mut self) -> Document {
        if !self.instructions.is_empty() || self.pages.is_empty() {
            let last = self.finalize_page();
            self.pages.push(last);
        }
        Document { pages: self.pages }
    }

    fn finalize_page(&mut self) -> Page {
        Page {
            width: self.geometry.page_width,
            height: self.geometry.page_height,
            instructions: std::mem::take(&mut self.instructions),
        }
    }

    /// Resolve the anchor x of a run from its alignment.
    fn anchor_x(&self, x: f64, align: TextAlign) -> f64 {
        match align {
            TextAlign::Left => x,
            TextAlign::Center => self.geometry.page_width / 2.0,
            TextAlign::Right => self.geometry.page_width - self.geometry.margin,
        }
    }
}

// ── Blocks: groups of rows checked against the page once ───────────

/// Font settings for one kind of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TextStyle {
    pub family: FontFamily,
    pub style: FontStyle,
    pub size: f64,
}

/// A piece of text on a row.
#[derive(Debug, Clone)]
pub(crate) struct Span {
    pub content: String,
    pub x: f64,
    pub text: TextStyle,
    pub align: TextAlign,
}

/// One display line: an optional gap above it, then `pitch` of height.
#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub gap_before: f64,
    pub pitch: f64,
    pub spans: Vec<Span>,
}

impl Row {
    fn height(&self) -> f64 {
        self.gap_before + self.pitch
    }
}

/// An atomic unit of layout.
#[derive(Debug, Clone, Default)]
pub(crate) struct Block {
    pub rows: Vec<Row>,
}

impl Block {
    pub fn height(&self) -> f64 {
        self.rows.iter().map(Row::height).sum()
    }

    /// Append another block; `gap` goes above its first row.
    pub fn append(&mut self, other: Block, gap: f64) {
        let mut rows = other.rows.into_iter();
        if let Some(mut first) = rows.next() {
            first.gap_before += gap;
            self.rows.push(first);
        }
        self.rows.extend(rows);
    }
}

/// Lay out an interview record with a caller-supplied measurer.
pub struct LayoutEngine<'a> {
    measurer: &'a dyn TextMeasure,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(measurer: &'a dyn TextMeasure) -> Self {
        Self { measurer }
    }

    /// Main entry point: lay out a record into pages.
    ///
    /// Fails only on invalid geometry, before any page is produced.
    pub fn layout(
        &self,
        record: &InterviewRecord,
        geometry: &PageGeometry,
    ) -> Result<Document, ReportError> {
        geometry.validate()?;
        let mut state = LayoutState::new(*geometry);
        self.layout_report(record, &mut state);
        Ok(state.finish())
    }

    /// Place a block, moving or (for oversized blocks) splitting it at page
    /// boundaries.
    pub(crate) fn place_block(&self, state: &mut LayoutState, block: &Block) {
        let heights: Vec<f64> = block.rows.iter().map(Row::height).collect();
        let mut next = 0;

        while next < block.rows.len() {
            let decision = decide_break(
                state.remaining_height(),
                &heights[next..],
                state.at_page_top(),
            );
            match decision {
                BreakDecision::Place => {
                    for row in &block.rows[next..] {
                        self.place_row(state, row);
                    }
                    next = block.rows.len();
                }
                BreakDecision::MoveToNextPage => state.new_page(),
                BreakDecision::Split {
                    rows_on_current_page,
                } => {
                    let end = (next + rows_on_current_page).min(block.rows.len());
                    for row in &block.rows[next..end] {
                        self.place_row(state, row);
                    }
                    next = end;
                    if next < block.rows.len() {
                        state.new_page();
                    }
                }
            }
        }
    }

    fn place_row(&self, state: &mut LayoutState, row: &Row) {
        // Gaps collapse at the top of a page.
        if !state.at_page_top() {
            state.current_y += row.gap_before;
        }
        let top = state.current_y;
        for span in &row.spans {
            let descent = span.text.size * MM_PER_PT * DESCENT_RATIO;
            let run = TextRun {
                content: span.content.clone(),
                x: state.anchor_x(span.x, span.align),
                y: top + row.pitch - descent,
                font_size: span.text.size,
                font_family: span.text.family,
                font_style: span.text.style,
                align: span.align,
            };
            state.push_text(run);
        }
        state.current_y = top + row.pitch;
    }

    /// Wrap `text` into a block of rows at `x`, `width` wide.
    pub(crate) fn text_block(
        &self,
        text: &str,
        x: f64,
        width: f64,
        style: TextStyle,
        pitch: f64,
    ) -> Block {
        // A trailing newline would otherwise become a blank row.
        let text = text.trim_end_matches(|c| c == '\n' || c == '\r');
        let lines = crate::text::wrap_text(
            self.measurer,
            text,
            width,
            style.family,
            style.style,
            style.size,
        );
        Block {
            rows: lines
                .into_iter()
                .map(|content| Row {
                    gap_before: 0.0,
                    pitch,
                    spans: vec![Span {
                        content,
                        x,
                        text: style,
                        align: TextAlign::Left,
                    }],
                })
                .collect(),
        }
    }
}

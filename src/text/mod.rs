//! # Text Wrapping
//!
//! Greedy line breaking of report text into display lines.
//!
//! Break opportunities come from UAX#14, so a line only ends where the
//! text allows it (after spaces, hyphens, CJK ideographs) and never inside
//! a word. A word wider than the line keeps a line to itself and overflows.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::{FontFamily, FontStyle, TextMeasure};
use crate::model::page::MM_PER_PT;

/// Characters that end a line on their own. They are not drawn.
fn is_hard_break(ch: char) -> bool {
    matches!(
        ch,
        '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// Break `text` into display lines no wider than `max_width` millimetres.
///
/// `\n` (and `\r\n`) are hard breaks; blank hard lines survive as empty
/// display lines. Leading whitespace of a hard line is kept, which keeps
/// code indentation intact. Empty input produces no lines.
pub fn wrap_text(
    measurer: &dyn TextMeasure,
    text: &str,
    max_width: f64,
    family: FontFamily,
    style: FontStyle,
    font_size: f64,
) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let max_width_pt = max_width / MM_PER_PT;
    let mut lines = Vec::new();
    for hard_line in text.split('\n') {
        let hard_line = hard_line.strip_suffix('\r').unwrap_or(hard_line);
        if hard_line.is_empty() {
            lines.push(String::new());
            continue;
        }
        wrap_hard_line(
            measurer,
            hard_line,
            max_width_pt,
            family,
            style,
            font_size,
            &mut lines,
        );
    }
    lines
}

#[allow(clippy::too_many_arguments)]
fn wrap_hard_line(
    measurer: &dyn TextMeasure,
    text: &str,
    max_width_pt: f64,
    family: FontFamily,
    style: FontStyle,
    font_size: f64,
    lines: &mut Vec<String>,
) {
    let mut current = String::new();
    let mut start = 0;

    // linebreaks() yields the byte offset AFTER each break opportunity; the
    // last one is always the mandatory break at the end of the text.
    for (end, opportunity) in linebreaks(text) {
        let segment = &text[start..end];
        start = end;

        let (segment, forced) = match opportunity {
            BreakOpportunity::Mandatory => (segment.trim_end_matches(is_hard_break), true),
            BreakOpportunity::Allowed => (segment, false),
        };

        if !current.trim().is_empty() {
            let candidate = format!("{}{}", current, segment);
            let width = measurer.measure(candidate.trim_end(), family, style, font_size);
            if width > max_width_pt {
                lines.push(current.trim_end().to_string());
                current.clear();
            }
        }
        current.push_str(segment);

        if forced {
            lines.push(current.trim_end().to_string());
            current.clear();
        }
    }

    if !current.is_empty() {
        lines.push(current.trim_end().to_string());
    }
}

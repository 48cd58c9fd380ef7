//! Page geometry: the fixed page size and the spacing rhythm of a report.
//!
//! All values share one unit, millimetres. Font sizes stay in points and
//! are converted with [`MM_PER_PT`] when text is measured.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Millimetres per PostScript point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Pitch of one line of the title.
pub const TITLE_PITCH: f64 = 10.0;

/// Pitch of a section heading.
pub const HEADING_PITCH: f64 = 7.0;

/// Page and spacing constants for one render pass.
///
/// The first seven fields are required when geometry is read from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub margin: f64,
    pub page_width: f64,
    pub page_height: f64,
    /// Pitch of one line of body text.
    pub line_height: f64,
    pub section_spacing: f64,
    pub subsection_spacing: f64,
    pub item_spacing: f64,
    /// Pitch of one line of monospace code.
    #[serde(default = "default_code_line_height")]
    pub code_line_height: f64,
    /// Indent of code blocks, feedback text and list bullets.
    #[serde(default = "default_code_indent")]
    pub code_indent: f64,
    /// Width of the label column in the details table.
    #[serde(default = "default_label_width")]
    pub label_width: f64,
}

fn default_code_line_height() -> f64 {
    4.0
}

fn default_code_indent() -> f64 {
    5.0
}

fn default_label_width() -> f64 {
    40.0
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageGeometry {
    /// A4 portrait, the reference geometry.
    pub fn a4() -> Self {
        Self::for_size(PageSize::A4)
    }

    /// Reference spacing on a page of the given size.
    pub fn for_size(size: PageSize) -> Self {
        let (page_width, page_height) = size.dimensions();
        Self {
            margin: 10.0,
            page_width,
            page_height,
            line_height: 5.0,
            section_spacing: 8.0,
            subsection_spacing: 4.0,
            item_spacing: 2.0,
            code_line_height: default_code_line_height(),
            code_indent: default_code_indent(),
            label_width: default_label_width(),
        }
    }

    /// Parse geometry from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        let geometry: PageGeometry = serde_json::from_str(json)?;
        geometry.validate()?;
        Ok(geometry)
    }

    /// Width available to text between the side margins.
    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Height available to content between the top and bottom margins.
    pub fn usable_height(&self) -> f64 {
        self.page_height - 2.0 * self.margin
    }

    /// Lowest y a line box may reach.
    pub fn bottom(&self) -> f64 {
        self.page_height - self.margin
    }

    /// Reject geometry that cannot hold any content.
    pub fn validate(&self) -> Result<(), ReportError> {
        let constants = [
            ("margin", self.margin),
            ("pageWidth", self.page_width),
            ("pageHeight", self.page_height),
            ("lineHeight", self.line_height),
            ("sectionSpacing", self.section_spacing),
            ("subsectionSpacing", self.subsection_spacing),
            ("itemSpacing", self.item_spacing),
            ("codeLineHeight", self.code_line_height),
            ("codeIndent", self.code_indent),
            ("labelWidth", self.label_width),
        ];
        for (name, value) in constants {
            if !value.is_finite() || value <= 0.0 {
                return Err(ReportError::InvalidGeometry(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.content_width() <= 0.0 {
            return Err(ReportError::InvalidGeometry(format!(
                "margins ({} each) leave no content width on a {} wide page",
                self.margin, self.page_width
            )));
        }
        if self.usable_height() <= 0.0 {
            return Err(ReportError::InvalidGeometry(format!(
                "margins ({} each) leave no usable height on a {} tall page",
                self.margin, self.page_height
            )));
        }
        if self.label_width >= self.content_width() || self.code_indent >= self.content_width() {
            return Err(ReportError::InvalidGeometry(format!(
                "labelWidth ({}) and codeIndent ({}) must be narrower than the content width ({})",
                self.label_width,
                self.code_indent,
                self.content_width()
            )));
        }

        // A single row is never split, so every pitch must fit a fresh page.
        let pitches = [
            ("lineHeight", self.line_height),
            ("codeLineHeight", self.code_line_height),
            ("title pitch", TITLE_PITCH),
            ("heading pitch", HEADING_PITCH),
        ];
        for (name, pitch) in pitches {
            if pitch > self.usable_height() {
                return Err(ReportError::InvalidGeometry(format!(
                    "{} ({}) is taller than the usable page height ({})",
                    name,
                    pitch,
                    self.usable_height()
                )));
            }
        }
        Ok(())
    }
}

/// Standard page sizes in millimetres, portrait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in millimetres.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::A5 => (148.0, 210.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    /// Look up a preset by its common name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a4" => Some(PageSize::A4),
            "a5" => Some(PageSize::A5),
            "letter" => Some(PageSize::Letter),
            "legal" => Some(PageSize::Legal),
            _ => None,
        }
    }
}

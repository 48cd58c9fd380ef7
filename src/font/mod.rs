//! # Font Management
//!
//! Reports only use the standard PDF fonts (Helvetica for prose, Courier
//! for code), which never need embedding. Measurement comes from the
//! built-in AFM width tables.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use serde::Serialize;

/// Typeface family of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FontFamily {
    /// Proportional body font.
    Sans,
    /// Fixed-width font for code.
    Mono,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FontStyle {
    Normal,
    Bold,
}

/// The standard PDF fonts a report can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    Courier,
    CourierBold,
}

impl StandardFont {
    /// Map a family and style to the concrete font.
    pub fn resolve(family: FontFamily, style: FontStyle) -> Self {
        match (family, style) {
            (FontFamily::Sans, FontStyle::Normal) => StandardFont::Helvetica,
            (FontFamily::Sans, FontStyle::Bold) => StandardFont::HelveticaBold,
            (FontFamily::Mono, FontStyle::Normal) => StandardFont::Courier,
            (FontFamily::Mono, FontStyle::Bold) => StandardFont::CourierBold,
        }
    }

    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
        }
    }

    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica => &metrics::HELVETICA,
            Self::HelveticaBold => &metrics::HELVETICA_BOLD,
            Self::Courier | Self::CourierBold => &metrics::COURIER,
        }
    }
}

/// The text-measurement function used for wrapping and alignment.
pub trait TextMeasure {
    /// Width of `text` in points when set in the given font.
    fn measure(&self, text: &str, family: FontFamily, style: FontStyle, font_size: f64) -> f64;
}

/// Measures text with the standard font metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontContext;

impl FontContext {
    pub fn new() -> Self {
        Self
    }
}

impl TextMeasure for FontContext {
    fn measure(&self, text: &str, family: FontFamily, style: FontStyle, font_size: f64) -> f64 {
        StandardFont::resolve(family, style)
            .metrics()
            .measure_string(text, font_size, 0.0)
    }
}

//! # Interview Model
//!
//! The input representation for the report engine: one interview record
//! (who interviewed whom, for which role), an optional résumé summary,
//! the ordered questions with per-question notes, and the closing verdict.
//!
//! The record is immutable for the duration of one render. Every optional
//! field maps to an optional section; the engine never fails because a
//! field is missing.

pub mod page;

pub use page::{PageGeometry, PageSize};

use serde::{Deserialize, Serialize};

/// Rendered in place of a required display field that is wholly absent.
pub const PLACEHOLDER: &str = "N/A";

/// A complete interview ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interviewer_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Free text entered before the interview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_notes: Option<String>,

    #[serde(default)]
    pub selection_status: SelectionStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_feedback: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_info: Option<CandidateProfile>,

    /// Insertion order is rendering order.
    #[serde(default)]
    pub questions: Vec<InterviewQuestion>,

    /// Date line printed under the title. Rendering is pure, so the caller
    /// decides what "today" is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Hiring decision. Serialized as `"Selected"`, `"Rejected"` or `""`;
/// `"Unset"` is also accepted on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionStatus {
    Selected,
    Rejected,
    #[default]
    #[serde(rename = "", alias = "Unset")]
    Unset,
}

impl SelectionStatus {
    /// Display label, or `None` when no decision was recorded.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            SelectionStatus::Selected => Some("Selected"),
            SelectionStatus::Rejected => Some("Rejected"),
            SelectionStatus::Unset => None,
        }
    }
}

/// Structured résumé summary produced by the question generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_to_explore: Vec<String>,
    #[serde(default)]
    pub years_of_experience: f64,
}

impl CandidateProfile {
    /// Whether any subsection of the profile would render.
    pub fn has_content(&self) -> bool {
        !self.summary.trim().is_empty()
            || [
                &self.skills,
                &self.experience,
                &self.education,
                &self.projects,
                &self.strengths,
                &self.areas_to_explore,
            ]
            .iter()
            .any(|items| !items.is_empty())
            || self.years_of_experience > 0.0
    }
}

/// One generated question with the interviewer's notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    /// Snippet rendered in monospace under the question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Interviewer feedback, rendered as a "Feedback" sub-block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InterviewQuestion {
    pub fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
            code: None,
            notes: None,
        }
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

/// The one placeholder policy: absent renders as [`PLACEHOLDER`], any
/// present value (even empty) renders as given.
pub fn display_or_placeholder(value: Option<&str>) -> &str {
    value.unwrap_or(PLACEHOLDER)
}

/// Optional free text that only counts when it has visible characters.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

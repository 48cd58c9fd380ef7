//! # Interview Pipeline
//!
//! The steps around the renderer: turning a résumé into questions and a
//! candidate profile, regenerating single questions, and exporting the
//! finished report.
//!
//! Résumé text extraction, PII redaction and question generation are
//! external services. They are reached through the traits below so the
//! pipeline can be driven by any backend (or by a test double).
//!
//! Every stage fails independently and reports which one failed. A failed
//! stage never leaves the record half-updated. Résumé extraction is the
//! exception: it is best effort and falls back to empty text.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::export::{report_bytes, report_file_name, write_report};
use crate::model::{non_blank, CandidateProfile, InterviewQuestion, InterviewRecord, PageGeometry};

/// Error returned by an external collaborator.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Pulls plain text out of an uploaded résumé.
pub trait ResumeExtractor {
    fn extract_text(&self, resume: &[u8]) -> Result<String, CollaboratorError>;
}

/// Removes personal data from résumé text before it leaves the machine.
pub trait PiiRedactor {
    fn redact(&self, text: &str) -> String;
}

/// The question-generation backend.
pub trait QuestionGenerator {
    fn generate_questions(
        &self,
        resume_text: &str,
        role: &str,
        other_notes: Option<&str>,
    ) -> Result<Vec<InterviewQuestion>, CollaboratorError>;

    fn extract_candidate_profile(
        &self,
        resume_text: &str,
        role: &str,
    ) -> Result<CandidateProfile, CollaboratorError>;

    /// Produce a replacement for `current`, optionally steered by the
    /// interviewer's own prompt.
    fn regenerate_question(
        &self,
        current: &InterviewQuestion,
        role: &str,
        custom_prompt: Option<&str>,
    ) -> Result<InterviewQuestion, CollaboratorError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validation,
    Generation,
    Render,
    Serialize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validation => "validation",
            Stage::Generation => "question generation",
            Stage::Render => "render",
            Stage::Serialize => "serialize",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("{stage} failed: {message}")]
pub struct PipelineError {
    pub stage: Stage,
    pub message: String,
}

impl PipelineError {
    fn new(stage: Stage, message: impl fmt::Display) -> Self {
        Self {
            stage,
            message: message.to_string(),
        }
    }
}

/// Generate questions and a candidate profile for `record` from a résumé.
///
/// On success the record's questions and profile are replaced. On failure
/// the record is untouched.
pub fn generate_interview(
    record: &mut InterviewRecord,
    resume: Option<&[u8]>,
    extractor: &dyn ResumeExtractor,
    redactor: &dyn PiiRedactor,
    generator: &dyn QuestionGenerator,
) -> Result<(), PipelineError> {
    let (Some(resume), Some(role)) = (resume, non_blank(record.role.as_deref())) else {
        return Err(PipelineError::new(
            Stage::Validation,
            "a resume and a role are required",
        ));
    };

    let text = match extractor.extract_text(resume) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "resume extraction failed, continuing with empty text");
            String::new()
        }
    };
    let text = redactor.redact(&text);

    let profile = generator
        .extract_candidate_profile(&text, role)
        .map_err(|e| PipelineError::new(Stage::Generation, e))?;
    let questions = generator
        .generate_questions(&text, role, non_blank(record.other_notes.as_deref()))
        .map_err(|e| PipelineError::new(Stage::Generation, e))?;

    info!(questions = questions.len(), "interview generated");
    record.questions = questions;
    record.candidate_info = Some(profile);
    Ok(())
}

/// Replace the question at `index`, keeping the interviewer's notes.
pub fn regenerate_question(
    record: &mut InterviewRecord,
    index: usize,
    custom_prompt: Option<&str>,
    generator: &dyn QuestionGenerator,
) -> Result<(), PipelineError> {
    let Some(current) = record.questions.get(index) else {
        return Err(PipelineError::new(
            Stage::Validation,
            format!("question {} not found", index + 1),
        ));
    };
    let role = record.role.as_deref().unwrap_or_default();

    let mut replacement = generator
        .regenerate_question(current, role, non_blank(custom_prompt))
        .map_err(|e| PipelineError::new(Stage::Generation, e))?;
    replacement.notes = current.notes.clone();
    record.questions[index] = replacement;
    Ok(())
}

/// Render the record and write the PDF into `dir`.
pub fn export_interview(
    record: &InterviewRecord,
    geometry: &PageGeometry,
    dir: &Path,
) -> Result<PathBuf, PipelineError> {
    if non_blank(record.interviewer_name.as_deref()).is_none()
        || non_blank(record.candidate_name.as_deref()).is_none()
    {
        return Err(PipelineError::new(
            Stage::Validation,
            "interviewer and candidate names are required",
        ));
    }

    let document =
        crate::render(record, geometry).map_err(|e| PipelineError::new(Stage::Render, e))?;
    let bytes = report_bytes(record, &document)
        .map_err(|e| PipelineError::new(Stage::Serialize, e))?;

    let path = dir.join(report_file_name(record));
    write_report(&path, &bytes).map_err(|e| PipelineError::new(Stage::Serialize, e))?;
    info!(path = %path.display(), pages = document.page_count(), "interview exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TextExtractor;
    impl ResumeExtractor for TextExtractor {
        fn extract_text(&self, resume: &[u8]) -> Result<String, CollaboratorError> {
            Ok(String::from_utf8_lossy(resume).into_owned())
        }
    }

    struct BrokenExtractor;
    impl ResumeExtractor for BrokenExtractor {
        fn extract_text(&self, _: &[u8]) -> Result<String, CollaboratorError> {
            Err("not a pdf".into())
        }
    }

    struct MaskEmails;
    impl PiiRedactor for MaskEmails {
        fn redact(&self, text: &str) -> String {
            text.split_whitespace()
                .map(|w| if w.contains('@') { "[EMAIL]" } else { w })
                .collect::<Vec<_>>()
                .join(" ")
        }
    }

    /// Echoes what it was given so tests can see the inputs.
    struct EchoGenerator {
        fail: bool,
    }

    impl QuestionGenerator for EchoGenerator {
        fn generate_questions(
            &self,
            resume_text: &str,
            role: &str,
            other_notes: Option<&str>,
        ) -> Result<Vec<InterviewQuestion>, CollaboratorError> {
            if self.fail {
                return Err("rate limited".into());
            }
            Ok(vec![
                InterviewQuestion::new(&format!("{} | {}", role, resume_text)),
                InterviewQuestion::new(other_notes.unwrap_or("no notes")),
            ])
        }

        fn extract_candidate_profile(
            &self,
            resume_text: &str,
            _role: &str,
        ) -> Result<CandidateProfile, CollaboratorError> {
            Ok(CandidateProfile {
                summary: resume_text.to_string(),
                ..Default::default()
            })
        }

        fn regenerate_question(
            &self,
            current: &InterviewQuestion,
            _role: &str,
            custom_prompt: Option<&str>,
        ) -> Result<InterviewQuestion, CollaboratorError> {
            if self.fail {
                return Err("timeout".into());
            }
            Ok(InterviewQuestion {
                question: format!("{} ({})", current.question, custom_prompt.unwrap_or("again")),
                code: Some("let x = 1;".to_string()),
                notes: None,
            })
        }
    }

    fn record() -> InterviewRecord {
        InterviewRecord {
            interviewer_name: Some("Alice".to_string()),
            candidate_name: Some("Bob".to_string()),
            role: Some("SRE".to_string()),
            questions: vec![InterviewQuestion::new("Old").with_notes("kept")],
            ..Default::default()
        }
    }

    #[test]
    fn generate_fills_questions_and_profile() {
        let mut rec = record();
        generate_interview(
            &mut rec,
            Some(b"mail me at bob@example.com".as_slice()),
            &TextExtractor,
            &MaskEmails,
            &EchoGenerator { fail: false },
        )
        .unwrap();

        assert_eq!(rec.questions.len(), 2);
        assert_eq!(rec.questions[0].question, "SRE | mail me at [EMAIL]");
        assert_eq!(rec.questions[1].question, "no notes");
        assert_eq!(
            rec.candidate_info.unwrap().summary,
            "mail me at [EMAIL]"
        );
    }

    #[test]
    fn generate_requires_resume_and_role() {
        let mut rec = record();
        let err = generate_interview(&mut rec, None, &TextExtractor, &MaskEmails, &EchoGenerator { fail: false })
            .unwrap_err();
        assert_eq!(err.stage, Stage::Validation);

        rec.role = Some("  ".to_string());
        let err = generate_interview(&mut rec, Some(b"cv".as_slice()), &TextExtractor, &MaskEmails, &EchoGenerator { fail: false })
            .unwrap_err();
        assert_eq!(err.stage, Stage::Validation);
        assert_eq!(rec.questions, record().questions);
    }

    #[test]
    fn extraction_failure_degrades_to_empty_text() {
        let mut rec = record();
        generate_interview(&mut rec, Some(b"%PDF".as_slice()), &BrokenExtractor, &MaskEmails, &EchoGenerator { fail: false })
            .unwrap();
        assert_eq!(rec.questions[0].question, "SRE | ");
    }

    #[test]
    fn generation_failure_leaves_record_untouched() {
        let mut rec = record();
        let err = generate_interview(&mut rec, Some(b"cv".as_slice()), &TextExtractor, &MaskEmails, &EchoGenerator { fail: true })
            .unwrap_err();
        assert_eq!(err.stage, Stage::Generation);
        assert_eq!(err.to_string(), "question generation failed: rate limited");
        assert_eq!(rec, record());
    }

    #[test]
    fn regenerate_preserves_notes() {
        let mut rec = record();
        regenerate_question(&mut rec, 0, Some("harder"), &EchoGenerator { fail: false }).unwrap();
        assert_eq!(rec.questions[0].question, "Old (harder)");
        assert_eq!(rec.questions[0].code.as_deref(), Some("let x = 1;"));
        assert_eq!(rec.questions[0].notes.as_deref(), Some("kept"));
    }

    #[test]
    fn regenerate_out_of_range_is_validation_error() {
        let mut rec = record();
        let err = regenerate_question(&mut rec, 3, None, &EchoGenerator { fail: false }).unwrap_err();
        assert_eq!(err.stage, Stage::Validation);
    }

    #[test]
    fn regenerate_failure_keeps_question() {
        let mut rec = record();
        let err = regenerate_question(&mut rec, 0, None, &EchoGenerator { fail: true }).unwrap_err();
        assert_eq!(err.stage, Stage::Generation);
        assert_eq!(rec, record());
    }

    #[test]
    fn export_requires_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut rec = record();
        rec.interviewer_name = None;
        let err = export_interview(&rec, &PageGeometry::a4(), dir.path()).unwrap_err();
        assert_eq!(err.stage, Stage::Validation);
    }

    #[test]
    fn export_bad_geometry_is_render_stage() {
        let dir = tempfile::tempdir().unwrap();
        let geometry = PageGeometry {
            margin: 0.0,
            ..PageGeometry::a4()
        };
        let err = export_interview(&record(), &geometry, dir.path()).unwrap_err();
        assert_eq!(err.stage, Stage::Render);
    }

    #[test]
    fn export_write_failure_is_serialize_stage() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let rec = record();
        let err = export_interview(&rec, &PageGeometry::a4(), &missing).unwrap_err();
        assert_eq!(err.stage, Stage::Serialize);
        assert_eq!(rec, record());
    }

    #[test]
    fn export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_interview(&record(), &PageGeometry::a4(), dir.path()).unwrap();
        assert!(path.ends_with("Bob_Interview_Summary.pdf"));
        assert!(path.exists());
    }
}

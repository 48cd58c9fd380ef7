//! Persistence of the interview in progress.
//!
//! One JSON file in a directory holds the current interview, in the same
//! flat shape the renderer reads.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ReportError;
use crate::model::{InterviewQuestion, InterviewRecord};

const CURRENT_INTERVIEW_FILE: &str = "currentInterview.json";

#[derive(Debug, Clone)]
pub struct InterviewStore {
    path: PathBuf,
}

impl InterviewStore {
    /// A store keeping its file inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CURRENT_INTERVIEW_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, record: &InterviewRecord) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, json).map_err(|e| ReportError::io(&self.path, e))?;
        debug!(path = %self.path.display(), questions = record.questions.len(), "interview saved");
        Ok(())
    }

    /// The stored interview, or `None` when nothing has been saved.
    pub fn load(&self) -> Result<Option<InterviewRecord>, ReportError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ReportError::io(&self.path, e)),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    pub fn clear(&self) -> Result<(), ReportError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ReportError::io(&self.path, e)),
        }
    }

    /// Replace the notes of one stored question.
    ///
    /// Returns `false` without writing when nothing is stored or `index` is
    /// out of range.
    pub fn update_question_notes(&self, index: usize, notes: &str) -> Result<bool, ReportError> {
        let Some(mut record) = self.load()? else {
            return Ok(false);
        };
        let Some(question) = record.questions.get_mut(index) else {
            return Ok(false);
        };
        question.notes = Some(notes.to_string());
        self.save(&record)?;
        Ok(true)
    }

    /// Replace the whole question list. Returns `false` when nothing is stored.
    pub fn update_questions(&self, questions: Vec<InterviewQuestion>) -> Result<bool, ReportError> {
        let Some(mut record) = self.load()? else {
            return Ok(false);
        };
        record.questions = questions;
        self.save(&record)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> InterviewRecord {
        InterviewRecord {
            interviewer_name: Some("Alice".to_string()),
            candidate_name: Some("Bob".to_string()),
            role: Some("Backend Engineer".to_string()),
            questions: vec![
                InterviewQuestion::new("Explain ownership."),
                InterviewQuestion::new("Reverse a list.").with_code("fn rev() {}"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn load_without_save_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterviewStore::in_dir(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterviewStore::in_dir(dir.path());
        store.save(&record()).unwrap();
        assert_eq!(store.load().unwrap(), Some(record()));
    }

    #[test]
    fn stored_shape_is_flat() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterviewStore::in_dir(dir.path());
        store.save(&record()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert!(value["questions"].is_array());
        assert_eq!(value["candidateName"], "Bob");
    }

    #[test]
    fn clear_removes_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterviewStore::in_dir(dir.path());
        store.clear().unwrap();
        store.save(&record()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn update_notes_in_range() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterviewStore::in_dir(dir.path());
        store.save(&record()).unwrap();
        assert!(store.update_question_notes(1, "Solid").unwrap());
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.questions[1].notes.as_deref(), Some("Solid"));
        assert_eq!(loaded.questions[1].code.as_deref(), Some("fn rev() {}"));
    }

    #[test]
    fn update_notes_out_of_range_or_empty_store_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterviewStore::in_dir(dir.path());
        assert!(!store.update_question_notes(0, "x").unwrap());
        store.save(&record()).unwrap();
        assert!(!store.update_question_notes(5, "x").unwrap());
        assert_eq!(store.load().unwrap(), Some(record()));
    }

    #[test]
    fn update_questions_replaces_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterviewStore::in_dir(dir.path());
        assert!(!store.update_questions(vec![]).unwrap());
        store.save(&record()).unwrap();
        assert!(store
            .update_questions(vec![InterviewQuestion::new("Only one")])
            .unwrap());
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.questions.len(), 1);
        assert_eq!(loaded.candidate_name.as_deref(), Some("Bob"));
    }

    #[test]
    fn corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterviewStore::in_dir(dir.path());
        fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(ReportError::ParseError { .. })));
    }
}

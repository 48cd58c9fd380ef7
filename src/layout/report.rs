//! Report sections, in their fixed order: title block, Interview Details,
//! Candidate Profile, Interview Questions, Final Feedback.
//!
//! Sections without renderable content are skipped entirely.

use tracing::debug;

use super::{Block, LayoutEngine, LayoutState, Row, Span, TextAlign, TextStyle};
use crate::font::{FontFamily, FontStyle};
use crate::model::page::{HEADING_PITCH, TITLE_PITCH};
use crate::model::{
    display_or_placeholder, non_blank, CandidateProfile, InterviewQuestion, InterviewRecord,
};

const TITLE: TextStyle = TextStyle {
    family: FontFamily::Sans,
    style: FontStyle::Bold,
    size: 24.0,
};

const DATE: TextStyle = TextStyle {
    family: FontFamily::Sans,
    style: FontStyle::Normal,
    size: 10.0,
};

const HEADING: TextStyle = TextStyle {
    family: FontFamily::Sans,
    style: FontStyle::Bold,
    size: 16.0,
};

const BODY: TextStyle = TextStyle {
    family: FontFamily::Sans,
    style: FontStyle::Normal,
    size: 12.0,
};

const LABEL: TextStyle = TextStyle {
    family: FontFamily::Sans,
    style: FontStyle::Bold,
    size: 12.0,
};

const CODE: TextStyle = TextStyle {
    family: FontFamily::Mono,
    style: FontStyle::Normal,
    size: 10.0,
};

const BULLET: &str = "\u{2022} ";

impl LayoutEngine<'_> {
    pub(super) fn layout_report(&self, record: &InterviewRecord, state: &mut LayoutState) {
        self.title_block(record, state);
        self.details_section(record, state);

        if let Some(profile) = record.candidate_info.as_ref().filter(|p| p.has_content()) {
            self.section(state, "Candidate Profile", |state| {
                self.profile_body(profile, state)
            });
        }

        if !record.questions.is_empty() {
            self.section(state, "Interview Questions", |state| {
                self.questions_body(&record.questions, state)
            });
        }

        if let Some(feedback) = non_blank(record.final_feedback.as_deref()) {
            self.section(state, "Final Feedback", |state| {
                let block = self.paragraph(feedback, state);
                self.place_block(state, &block);
            });
        }

        debug!(
            pages = state.page_index + 1,
            questions = record.questions.len(),
            "report laid out"
        );
    }

    /// Candidate name (large, centred, wrapped) and the date line (small,
    /// centred).
    fn title_block(&self, record: &InterviewRecord, state: &mut LayoutState) {
        let g = state.geometry;
        let name = display_or_placeholder(record.candidate_name.as_deref());
        let mut block = self.text_block(name, g.margin, g.content_width(), TITLE, TITLE_PITCH);
        if block.rows.is_empty() {
            // A present but empty name still takes the title row.
            block = self.single_row(name, g.margin, TITLE, TITLE_PITCH);
        }
        if let Some(date) = non_blank(record.date.as_deref()) {
            block.append(
                self.single_row(date, g.margin, DATE, g.line_height),
                0.0,
            );
        }
        for span in block.rows.iter_mut().flat_map(|row| row.spans.iter_mut()) {
            span.align = TextAlign::Center;
        }
        self.place_block(state, &block);
    }

    /// Write a section title, a rule under it, then the body.
    fn section(&self, state: &mut LayoutState, title: &str, body: impl FnOnce(&mut LayoutState)) {
        let g = state.geometry;
        debug!(section = title, page = state.page_index, "section");

        state.advance(g.section_spacing);
        // Keep the heading with its first line of body.
        state.ensure_space(HEADING_PITCH + g.subsection_spacing + g.line_height);
        let heading = self.single_row(title, g.margin, HEADING, HEADING_PITCH);
        self.place_block(state, &heading);
        state.push_rule();
        state.advance(g.subsection_spacing);
        body(state);
    }

    /// Same pattern as a section with smaller gaps and no rule.
    fn subsection(&self, state: &mut LayoutState, title: &str, body: impl FnOnce(&mut LayoutState)) {
        let g = state.geometry;
        state.advance(g.item_spacing);
        let heading = self.single_row(title, g.margin, LABEL, g.line_height);
        self.place_block(state, &heading);
        state.advance(g.item_spacing);
        body(state);
    }

    fn details_section(&self, record: &InterviewRecord, state: &mut LayoutState) {
        let mut rows: Vec<(&str, &str)> = vec![
            (
                "Interviewer:",
                display_or_placeholder(record.interviewer_name.as_deref()),
            ),
            (
                "Candidate:",
                display_or_placeholder(record.candidate_name.as_deref()),
            ),
            ("Role:", display_or_placeholder(record.role.as_deref())),
        ];
        if let Some(status) = record.selection_status.label() {
            rows.push(("Status:", status));
        }
        if let Some(notes) = non_blank(record.other_notes.as_deref()) {
            rows.push(("Additional Notes:", notes));
        }

        self.section(state, "Interview Details", |state| {
            let g = state.geometry;
            for (i, (label, value)) in rows.iter().enumerate() {
                if i > 0 {
                    state.advance(g.item_spacing);
                }
                let block = self.label_row(label, value, state);
                self.place_block(state, &block);
            }
        });
    }

    /// Bold label in the label column, wrapped value beside it.
    fn label_row(&self, label: &str, value: &str, state: &LayoutState) -> Block {
        let g = state.geometry;
        let value_x = g.margin + g.label_width;
        let mut block = self.text_block(
            value,
            value_x,
            g.content_width() - g.label_width,
            BODY,
            g.line_height,
        );
        let label_span = Span {
            content: label.to_string(),
            x: g.margin,
            text: LABEL,
            align: TextAlign::Left,
        };
        match block.rows.first_mut() {
            Some(first) => first.spans.insert(0, label_span),
            None => block.rows.push(Row {
                gap_before: 0.0,
                pitch: g.line_height,
                spans: vec![label_span],
            }),
        }
        block
    }

    fn profile_body(&self, profile: &CandidateProfile, state: &mut LayoutState) {
        if let Some(summary) = non_blank(Some(profile.summary.as_str())) {
            self.subsection(state, "Summary", |state| {
                self.paragraph_then_gap(summary, state)
            });
        }
        if !profile.experience.is_empty() {
            self.subsection(state, "Experience", |state| {
                self.bullet_list(&profile.experience, state)
            });
        }
        if !profile.skills.is_empty() {
            let skills = profile.skills.join(", ");
            self.subsection(state, "Skills", |state| {
                self.paragraph_then_gap(&skills, state)
            });
        }
        let lists = [
            ("Education", &profile.education),
            ("Projects", &profile.projects),
            ("Strengths", &profile.strengths),
            ("Areas to Explore", &profile.areas_to_explore),
        ];
        for (title, items) in lists {
            if !items.is_empty() {
                self.subsection(state, title, |state| self.bullet_list(items, state));
            }
        }
        if profile.years_of_experience > 0.0 {
            let years = format_years(profile.years_of_experience);
            self.subsection(state, "Years of Experience", |state| {
                self.paragraph_then_gap(&years, state)
            });
        }
    }

    fn questions_body(&self, questions: &[InterviewQuestion], state: &mut LayoutState) {
        let g = state.geometry;
        for (i, question) in questions.iter().enumerate() {
            let block = self.question_block(i + 1, question, state);
            self.place_block(state, &block);
            if i + 1 < questions.len() {
                state.advance(g.section_spacing);
            }
        }
    }

    /// `Q{n}: text`, then the code snippet, then the feedback, checked as
    /// one block so the group never straddles a page when it fits on one.
    fn question_block(&self, number: usize, question: &InterviewQuestion, state: &LayoutState) -> Block {
        let g = state.geometry;
        let indented_x = g.margin + g.code_indent;
        let indented_width = g.content_width() - g.code_indent;

        let mut block = self.text_block(
            &format!("Q{}: {}", number, question.question),
            g.margin,
            g.content_width(),
            BODY,
            g.line_height,
        );

        if let Some(code) = non_blank(question.code.as_deref()) {
            let code_block = self.text_block(
                code,
                indented_x,
                indented_width,
                CODE,
                g.code_line_height,
            );
            block.append(code_block, g.item_spacing);
        }

        if let Some(notes) = non_blank(question.notes.as_deref()) {
            block.append(
                self.single_row("Feedback:", g.margin, LABEL, g.line_height),
                g.item_spacing,
            );
            block.append(
                self.text_block(notes, indented_x, indented_width, BODY, g.line_height),
                0.0,
            );
        }

        block
    }

    /// Each item drawn as "• item", indented, with `item_spacing` between
    /// items and `subsection_spacing` after the last.
    fn bullet_list(&self, items: &[String], state: &mut LayoutState) {
        let g = state.geometry;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                state.advance(g.item_spacing);
            }
            let block = self.text_block(
                &format!("{}{}", BULLET, item),
                g.margin + g.code_indent,
                g.content_width() - g.code_indent,
                BODY,
                g.line_height,
            );
            self.place_block(state, &block);
        }
        state.advance(g.subsection_spacing);
    }

    fn paragraph(&self, text: &str, state: &LayoutState) -> Block {
        let g = state.geometry;
        self.text_block(text, g.margin, g.content_width(), BODY, g.line_height)
    }

    fn paragraph_then_gap(&self, text: &str, state: &mut LayoutState) {
        let block = self.paragraph(text, state);
        self.place_block(state, &block);
        state.advance(state.geometry.subsection_spacing);
    }

    fn single_row(&self, content: &str, x: f64, text: TextStyle, pitch: f64) -> Block {
        Block {
            rows: vec![Row {
                gap_before: 0.0,
                pitch,
                spans: vec![Span {
                    content: content.to_string(),
                    x,
                    text,
                    align: TextAlign::Left,
                }],
            }],
        }
    }
}

/// `~5 years`, or `~2.5 years` for fractional values.
fn format_years(years: f64) -> String {
    if years.fract() == 0.0 {
        format!("~{} years", years as u64)
    } else {
        format!("~{:.1} years", years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FontContext, TextMeasure};
    use crate::layout::{DrawInstruction, Document};
    use crate::model::{PageGeometry, SelectionStatus};

    fn layout(record: &InterviewRecord) -> Document {
        let fc = FontContext::new();
        LayoutEngine::new(&fc)
            .layout(record, &PageGeometry::a4())
            .unwrap()
    }

    fn record() -> InterviewRecord {
        InterviewRecord {
            interviewer_name: Some("Alice".to_string()),
            candidate_name: Some("Bob".to_string()),
            role: Some("Engineer".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn title_is_centered_candidate_name() {
        let doc = layout(&record());
        let first = doc.pages[0].text_runs().next().unwrap();
        assert_eq!(first.content, "Bob");
        assert_eq!(first.align, TextAlign::Center);
        assert_eq!(first.x, 105.0);
        assert_eq!(first.font_size, 24.0);
    }

    #[test]
    fn absent_name_uses_placeholder_but_empty_does_not() {
        let mut r = record();
        r.candidate_name = None;
        let doc = layout(&r);
        assert_eq!(doc.pages[0].text_runs().next().unwrap().content, "N/A");

        r.candidate_name = Some(String::new());
        let doc = layout(&r);
        assert_eq!(doc.pages[0].text_runs().next().unwrap().content, "");
    }

    #[test]
    fn long_title_wraps_and_stays_centered() {
        let mut r = record();
        r.candidate_name =
            Some("Maximilian Alexander Konstantin von Hohenzollern-Sigmaringen".to_string());
        let doc = layout(&r);
        let fc = FontContext::new();

        let title_rows: Vec<_> = doc.pages[0]
            .text_runs()
            .filter(|run| run.font_size == 24.0)
            .collect();
        assert!(title_rows.len() > 1, "long name should wrap");
        for run in &title_rows {
            assert_eq!(run.align, TextAlign::Center);
            assert_eq!(run.x, 105.0);
            let width_mm = fc.measure(&run.content, FontFamily::Sans, FontStyle::Bold, 24.0)
                * crate::model::page::MM_PER_PT;
            assert!(width_mm <= 190.0, "'{}' is {}mm wide", run.content, width_mm);
        }
        assert!((title_rows[1].y - title_rows[0].y - TITLE_PITCH).abs() < 1e-9);
    }

    #[test]
    fn section_heading_is_not_left_alone_at_page_bottom() {
        let fc = FontContext::new();
        let engine = LayoutEngine::new(&fc);
        let mut state = LayoutState::new(PageGeometry::a4());
        // After the section spacing 7mm are left: room for the heading
        // alone, not its body.
        state.advance(262.0);
        engine.section(&mut state, "Final Feedback", |state| {
            let block = engine.paragraph("Hire", state);
            engine.place_block(state, &block);
        });
        let doc = state.finish();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.find_text("Final Feedback").unwrap().0, 1);
        assert_eq!(doc.find_text("Hire").unwrap().0, 1);
    }

    #[test]
    fn date_line_follows_title() {
        let mut r = record();
        r.date = Some("2026-10-18".to_string());
        let doc = layout(&r);
        let runs: Vec<_> = doc.pages[0].text_runs().collect();
        assert_eq!(runs[1].content, "2026-10-18");
        assert_eq!(runs[1].font_size, 10.0);
        assert!(runs[1].y > runs[0].y);
    }

    #[test]
    fn status_row_only_when_set() {
        let doc = layout(&record());
        assert!(!doc.contains_text("Status:"));

        let mut r = record();
        r.selection_status = SelectionStatus::Rejected;
        let doc = layout(&r);
        let (_, label) = doc.find_text("Status:").unwrap();
        let (_, value) = doc.find_text("Rejected").unwrap();
        assert_eq!(label.y, value.y, "label and value share a row");
        assert_eq!(value.x, 50.0);
    }

    #[test]
    fn additional_notes_row_for_other_notes() {
        let mut r = record();
        r.other_notes = Some("Referred by the platform team".to_string());
        let doc = layout(&r);
        assert!(doc.contains_text("Additional Notes:"));
        assert!(doc.contains_text("Referred by the platform team"));
    }

    #[test]
    fn section_heading_has_rule_below() {
        let doc = layout(&record());
        let rule = doc.pages[0].instructions.iter().find_map(|i| match i {
            DrawInstruction::DrawLine(line) => Some(line.clone()),
            _ => None,
        });
        let rule = rule.expect("heading rule");
        assert_eq!(rule.x1, 10.0);
        assert_eq!(rule.x2, 200.0);
        let (_, heading) = doc.find_text("Interview Details").unwrap();
        assert!(rule.y1 > heading.y);
    }

    #[test]
    fn profile_lists_use_bullets() {
        let mut r = record();
        r.candidate_info = Some(CandidateProfile {
            education: vec!["BSc Computer Science".to_string()],
            strengths: vec!["Debugging".to_string()],
            years_of_experience: 6.0,
            ..Default::default()
        });
        let doc = layout(&r);
        assert!(doc.contains_text("\u{2022} BSc Computer Science"));
        assert!(doc.contains_text("\u{2022} Debugging"));
        assert!(doc.contains_text("~6 years"));
        assert!(!doc.contains_text("Summary"));
        assert!(!doc.contains_text("Skills"));
    }

    #[test]
    fn profile_without_content_is_omitted() {
        let mut r = record();
        r.candidate_info = Some(CandidateProfile::default());
        let doc = layout(&r);
        assert!(!doc.contains_text("Candidate Profile"));
    }

    #[test]
    fn feedback_block_is_indented() {
        let mut r = record();
        r.questions = vec![InterviewQuestion::new("Explain Send and Sync").with_notes("Good answer")];
        let doc = layout(&r);
        let (_, label) = doc.find_text("Feedback:").unwrap();
        let (_, notes) = doc.find_text("Good answer").unwrap();
        assert_eq!(label.x, 10.0);
        assert_eq!(label.font_style, FontStyle::Bold);
        assert_eq!(notes.x, 15.0);
        assert!(notes.y > label.y);
    }

    #[test]
    fn blank_final_feedback_is_omitted() {
        let mut r = record();
        r.final_feedback = Some("   ".to_string());
        let doc = layout(&r);
        assert!(!doc.contains_text("Final Feedback"));
    }

    #[test]
    fn years_formatting() {
        assert_eq!(format_years(3.0), "~3 years");
        assert_eq!(format_years(2.5), "~2.5 years");
    }
}

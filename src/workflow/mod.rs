//! The interview wizard state machine.
//!
//! Tracks the current step, the selected category and question, the captured
//! answer, and the returned feedback, and owns every transition between them.
//! The machine is free of rendering concerns: the terminal wizard drives it,
//! and tests drive it the same way.

use crate::analysis::Feedback;
use crate::catalog::{Catalog, Category, Question};
use crate::error::{Error, Result};
use crate::recording::RecordingSession;
use std::path::PathBuf;

/// Steps of the interview wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Picking a question category
    CategorySelect,
    /// Picking a question within the selected category
    QuestionSelect,
    /// Recording an answer (before or after a take is captured)
    Recording,
    /// Reviewing the returned feedback
    Feedback,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::CategorySelect => "category-select",
            Step::QuestionSelect => "question-select",
            Step::Recording => "recording",
            Step::Feedback => "feedback",
        };
        write!(f, "{name}")
    }
}

/// Everything the analysis client needs for one upload, detached from the
/// workflow so the request can be awaited without borrowing the machine.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Path of the captured WAV file
    pub wav_path: PathBuf,
    /// Prompt text of the selected question
    pub question: String,
}

/// The interview wizard state machine.
///
/// Holds the single source of truth for the wizard. Invariants:
/// - a question is selected only while a category is selected
/// - feedback exists only after a captured answer was analyzed
/// - at most one analysis request is in flight
pub struct Workflow<'a> {
    catalog: &'a Catalog,
    step: Step,
    category: Option<usize>,
    question: Option<usize>,
    session: Option<RecordingSession>,
    feedback: Option<Feedback>,
    analyzing: bool,
}

impl<'a> Workflow<'a> {
    /// Creates a fresh workflow at the category-select step.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            step: Step::CategorySelect,
            category: None,
            question: None,
            session: None,
            feedback: None,
            analyzing: false,
        }
    }

    /// Current wizard step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// The catalog this workflow reads from.
    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    /// The selected category, if any.
    pub fn category(&self) -> Option<&Category> {
        self.category.map(|i| &self.catalog.categories()[i])
    }

    /// The selected question, if any.
    pub fn question(&self) -> Option<&Question> {
        match (self.category, self.question) {
            (Some(c), Some(q)) => Some(&self.catalog.categories()[c].questions[q]),
            _ => None,
        }
    }

    /// The captured answer, if one exists.
    pub fn session(&self) -> Option<&RecordingSession> {
        self.session.as_ref()
    }

    /// The feedback for the last analyzed answer, if any.
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Whether an analysis request is currently in flight.
    pub fn analysis_in_flight(&self) -> bool {
        self.analyzing
    }

    /// `category-select --choose--> question-select`
    ///
    /// # Errors
    /// - `InvalidTransition` outside the category-select step or for an
    ///   out-of-range index
    pub fn choose_category(&mut self, index: usize) -> Result<()> {
        self.expect_step(Step::CategorySelect, "choose category")?;
        if index >= self.catalog.categories().len() {
            return Err(Error::InvalidTransition(format!(
                "category index {index} out of range"
            )));
        }
        self.category = Some(index);
        self.question = None;
        self.step = Step::QuestionSelect;
        tracing::debug!(
            "Category selected: {}",
            self.catalog.categories()[index].title
        );
        Ok(())
    }

    /// `question-select --back--> category-select`
    pub fn back_to_categories(&mut self) -> Result<()> {
        self.expect_step(Step::QuestionSelect, "back to categories")?;
        self.category = None;
        self.question = None;
        self.step = Step::CategorySelect;
        Ok(())
    }

    /// `question-select --choose--> recording`
    ///
    /// # Errors
    /// - `InvalidTransition` outside the question-select step or for an
    ///   out-of-range index
    pub fn choose_question(&mut self, index: usize) -> Result<()> {
        self.expect_step(Step::QuestionSelect, "choose question")?;
        let category = self.category.ok_or_else(|| {
            Error::InvalidTransition("no category selected".to_string())
        })?;
        if index >= self.catalog.categories()[category].questions.len() {
            return Err(Error::InvalidTransition(format!(
                "question index {index} out of range"
            )));
        }
        self.question = Some(index);
        self.step = Step::Recording;
        tracing::debug!(
            "Question selected: {}",
            self.catalog.categories()[category].questions[index].id
        );
        Ok(())
    }

    /// `recording --back--> question-select`, discarding any captured take.
    pub fn back_to_questions(&mut self) -> Result<()> {
        self.expect_step(Step::Recording, "back to questions")?;
        self.forbid_in_flight("back to questions")?;
        self.question = None;
        self.session = None;
        self.step = Step::QuestionSelect;
        Ok(())
    }

    /// Stores a captured take. The prior take, if any, is released first.
    ///
    /// Stays in the recording step; the wizard moves to its "captured"
    /// sub-state simply by the session existing.
    pub fn capture_ready(&mut self, session: RecordingSession) -> Result<()> {
        self.expect_step(Step::Recording, "store capture")?;
        self.forbid_in_flight("store capture")?;
        self.session = Some(session);
        Ok(())
    }

    /// `recording --reset--> recording`: discards the captured take and
    /// returns to the not-yet-recorded sub-state.
    pub fn reset_capture(&mut self) -> Result<()> {
        self.expect_step(Step::Recording, "reset capture")?;
        self.forbid_in_flight("reset capture")?;
        self.session = None;
        Ok(())
    }

    /// Starts `recording --analyze--> feedback`: marks the analysis as in
    /// flight and hands back what the client needs for the upload.
    ///
    /// # Errors
    /// - `InvalidTransition` outside the recording step, without a captured
    ///   take, or while another analysis is already in flight
    pub fn begin_analysis(&mut self) -> Result<AnalysisRequest> {
        self.expect_step(Step::Recording, "analyze")?;
        self.forbid_in_flight("analyze")?;
        let session = self.session.as_ref().ok_or_else(|| {
            Error::InvalidTransition("no captured answer to analyze".to_string())
        })?;
        let question = self.question().ok_or_else(|| {
            Error::InvalidTransition("no question selected".to_string())
        })?;

        let request = AnalysisRequest {
            wav_path: session.path().to_path_buf(),
            question: question.prompt.to_string(),
        };
        tracing::info!("Analysis started for question {}", question.id);
        self.analyzing = true;
        Ok(request)
    }

    /// Completes the in-flight analysis.
    ///
    /// On success the feedback is stored and the step becomes `feedback`.
    /// On failure the error is returned to the caller for display; the step
    /// stays at `recording` and the captured take is left untouched so the
    /// user can retry.
    ///
    /// # Errors
    /// - `InvalidTransition` when no analysis is in flight
    /// - The analysis error itself, passed through
    pub fn complete_analysis(&mut self, outcome: Result<Feedback>) -> Result<()> {
        if !self.analyzing {
            return Err(Error::InvalidTransition(
                "no analysis in flight".to_string(),
            ));
        }
        self.analyzing = false;

        match outcome {
            Ok(feedback) => {
                self.feedback = Some(feedback);
                self.step = Step::Feedback;
                tracing::info!("Analysis completed");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Analysis failed: {}", e);
                Err(e)
            }
        }
    }

    /// `feedback --retry-question--> question-select`: clears the captured
    /// take and the feedback, keeps the selected category.
    pub fn retry_question(&mut self) -> Result<()> {
        self.expect_step(Step::Feedback, "retry question")?;
        self.question = None;
        self.session = None;
        self.feedback = None;
        self.step = Step::QuestionSelect;
        Ok(())
    }

    /// `feedback --main-menu--> category-select`: clears everything except
    /// the catalog.
    pub fn main_menu(&mut self) -> Result<()> {
        self.expect_step(Step::Feedback, "main menu")?;
        self.category = None;
        self.question = None;
        self.session = None;
        self.feedback = None;
        self.step = Step::CategorySelect;
        Ok(())
    }

    fn expect_step(&self, expected: Step, action: &str) -> Result<()> {
        if self.step != expected {
            return Err(Error::InvalidTransition(format!(
                "cannot {action} at step {}",
                self.step
            )));
        }
        Ok(())
    }

    fn forbid_in_flight(&self, action: &str) -> Result<()> {
        if self.analyzing {
            return Err(Error::InvalidTransition(format!(
                "cannot {action} while an analysis is in flight"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ConfidenceScore, StarAnalysis};

    fn sample_feedback() -> Feedback {
        Feedback {
            transcription: "Hi".to_string(),
            critique: "Good".to_string(),
            star_analysis: StarAnalysis {
                situation: "s".to_string(),
                task: "t".to_string(),
                action: "a".to_string(),
                result: "r".to_string(),
            },
            confidence_score: ConfidenceScore {
                score: 7.5,
                hesitation_words: 1,
                hesitation_details: vec!["um".to_string()],
                clarity: 8.0,
            },
            strengths: vec!["Clear".to_string()],
            improvements: vec!["Pace".to_string()],
            overall_rating: 7.8,
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn captured_workflow(catalog: &Catalog) -> Workflow<'_> {
        let mut wf = Workflow::new(catalog);
        wf.choose_category(0).unwrap();
        wf.choose_question(0).unwrap();
        wf.capture_ready(RecordingSession::write(&[1, 2, 3], 16000).unwrap())
            .unwrap();
        wf
    }

    #[test]
    fn test_happy_path_reaches_feedback() {
        let catalog = Catalog::builtin();
        let mut wf = captured_workflow(&catalog);

        let request = wf.begin_analysis().unwrap();
        assert!(wf.analysis_in_flight());
        assert_eq!(request.question, wf.question().unwrap().prompt);

        wf.complete_analysis(Ok(sample_feedback())).unwrap();
        assert_eq!(wf.step(), Step::Feedback);
        assert!(!wf.analysis_in_flight());
        assert_eq!(wf.feedback().unwrap().overall_rating, 7.8);
    }

    #[test]
    fn test_question_requires_category() {
        let catalog = Catalog::builtin();
        let mut wf = Workflow::new(&catalog);
        assert!(wf.choose_question(0).is_err());
        assert!(wf.question().is_none());
    }

    #[test]
    fn test_back_from_questions_clears_category() {
        let catalog = Catalog::builtin();
        let mut wf = Workflow::new(&catalog);
        wf.choose_category(1).unwrap();
        assert!(wf.category().is_some());

        wf.back_to_categories().unwrap();
        assert_eq!(wf.step(), Step::CategorySelect);
        assert!(wf.category().is_none());
        assert!(wf.question().is_none());
    }

    #[test]
    fn test_back_from_recording_discards_capture() {
        let catalog = Catalog::builtin();
        let mut wf = captured_workflow(&catalog);
        let wav_path = wf.session().unwrap().path().to_path_buf();

        wf.back_to_questions().unwrap();
        assert_eq!(wf.step(), Step::QuestionSelect);
        assert!(wf.session().is_none());
        assert!(!wav_path.exists());
    }

    #[test]
    fn test_reset_discards_capture_and_stays_recording() {
        let catalog = Catalog::builtin();
        let mut wf = captured_workflow(&catalog);
        let wav_path = wf.session().unwrap().path().to_path_buf();

        wf.reset_capture().unwrap();
        assert_eq!(wf.step(), Step::Recording);
        assert!(wf.session().is_none());
        assert!(!wav_path.exists());
    }

    #[test]
    fn test_recapture_releases_prior_take() {
        let catalog = Catalog::builtin();
        let mut wf = captured_workflow(&catalog);
        let first_path = wf.session().unwrap().path().to_path_buf();

        wf.capture_ready(RecordingSession::write(&[9, 9], 16000).unwrap())
            .unwrap();
        assert!(!first_path.exists());
        assert!(wf.session().unwrap().path().exists());
    }

    #[test]
    fn test_analysis_failure_keeps_step_and_audio() {
        let catalog = Catalog::builtin();
        let mut wf = captured_workflow(&catalog);
        let wav_before = std::fs::read(wf.session().unwrap().path()).unwrap();

        wf.begin_analysis().unwrap();
        let err = wf
            .complete_analysis(Err(Error::AnalysisFailed("boom".to_string())))
            .unwrap_err();
        assert!(err.is_analysis_error());

        assert_eq!(wf.step(), Step::Recording);
        assert!(!wf.analysis_in_flight());
        let wav_after = std::fs::read(wf.session().unwrap().path()).unwrap();
        assert_eq!(wav_before, wav_after);
        assert!(wf.feedback().is_none());
    }

    #[test]
    fn test_analysis_is_never_concurrent() {
        let catalog = Catalog::builtin();
        let mut wf = captured_workflow(&catalog);

        wf.begin_analysis().unwrap();
        assert!(wf.begin_analysis().is_err());
        // Nothing else may mutate the capture mid-flight either
        assert!(wf.reset_capture().is_err());
        assert!(wf.back_to_questions().is_err());

        wf.complete_analysis(Ok(sample_feedback())).unwrap();
    }

    #[test]
    fn test_begin_analysis_requires_a_capture() {
        let catalog = Catalog::builtin();
        let mut wf = Workflow::new(&catalog);
        wf.choose_category(0).unwrap();
        wf.choose_question(0).unwrap();
        assert!(wf.begin_analysis().is_err());
    }

    #[test]
    fn test_retry_question_keeps_category() {
        let catalog = Catalog::builtin();
        let mut wf = captured_workflow(&catalog);
        let wav_path = wf.session().unwrap().path().to_path_buf();
        wf.begin_analysis().unwrap();
        wf.complete_analysis(Ok(sample_feedback())).unwrap();

        wf.retry_question().unwrap();
        assert_eq!(wf.step(), Step::QuestionSelect);
        assert!(wf.category().is_some());
        assert!(wf.session().is_none());
        assert!(wf.feedback().is_none());
        assert!(!wav_path.exists());
    }

    #[test]
    fn test_main_menu_clears_everything() {
        let catalog = Catalog::builtin();
        let mut wf = captured_workflow(&catalog);
        wf.begin_analysis().unwrap();
        wf.complete_analysis(Ok(sample_feedback())).unwrap();

        wf.main_menu().unwrap();
        assert_eq!(wf.step(), Step::CategorySelect);
        assert!(wf.category().is_none());
        assert!(wf.question().is_none());
        assert!(wf.session().is_none());
        assert!(wf.feedback().is_none());
    }

    #[test]
    fn test_complete_without_begin_is_rejected() {
        let catalog = Catalog::builtin();
        let mut wf = Workflow::new(&catalog);
        assert!(wf.complete_analysis(Ok(sample_feedback())).is_err());
    }
}

//! The interview practice wizard.
//!
//! Drives the workflow state machine through its steps: category selection,
//! question selection, answer recording, analysis and feedback review. The
//! machine holds all state; this module only renders menus and screens and
//! feeds user decisions back into it.

use crate::analysis::AnalysisClient;
use crate::catalog::{Catalog, Question};
use crate::commands::replay::play_audio;
use crate::config::{self, StarprepConfig};
use crate::error::Error;
use crate::history::HistoryStore;
use crate::recording::{AnswerRecorder, RecorderCommand, RecorderTui, RecordingSession};
use crate::ui::{render_feedback, ErrorScreen};
use crate::workflow::{Step, Workflow};
use cliclack::{intro, outro, select, spinner};
use console::style;

/// Sentinel menu values for navigation entries.
const MENU_BACK: usize = usize::MAX;
const MENU_QUIT: usize = usize::MAX - 1;

/// Runs the interview practice wizard.
///
/// # Errors
/// - If configuration cannot be loaded
/// - If a selection prompt fails (a cancelled prompt surfaces as an error
///   containing "cancelled", which the caller treats as a normal exit)
pub async fn handle_practice() -> Result<(), anyhow::Error> {
    tracing::info!("=== starprep practice started ===");

    let config = match StarprepConfig::load_or_create() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err}");
            let error_message = format!(
                "Configuration Error:\n\n{err}\n\nPlease check your ~/.config/starprep/starprep.toml file and try again."
            );
            let mut error_screen = ErrorScreen::new()?;
            error_screen.show_error(&error_message)?;
            error_screen.cleanup()?;
            return Err(anyhow::anyhow!("Configuration error: {err}"));
        }
    };

    ctrlc::set_handler(move || {}).expect("setting Ctrl-C handler");

    println!("\n {}\n", style(" starprep ").on_white().black());

    intro(style(" practice ").on_white().black())?;

    let catalog = Catalog::builtin();
    let client = AnalysisClient::new(config.analysis.endpoint.clone());
    let mut workflow = Workflow::new(&catalog);

    tracing::info!(
        "Wizard started: {} categories, endpoint {}",
        catalog.categories().len(),
        client.endpoint()
    );

    loop {
        let keep_going = match workflow.step() {
            Step::CategorySelect => step_category_select(&mut workflow)?,
            Step::QuestionSelect => step_question_select(&mut workflow)?,
            Step::Recording => step_recording(&mut workflow, &client, &config).await?,
            Step::Feedback => step_feedback(&mut workflow)?,
        };
        if !keep_going {
            break;
        }
    }

    outro("Good practice. Come back for another round.")?;
    tracing::info!("=== starprep practice exited ===");
    Ok(())
}

/// Category picker. Returns false when the user quits.
fn step_category_select(workflow: &mut Workflow<'_>) -> Result<bool, anyhow::Error> {
    let mut prompt = select("Choose a topic to practice:");
    for (i, category) in workflow.catalog().categories().iter().enumerate() {
        prompt = prompt.item(
            i,
            format!("{} {}", category.icon, category.title),
            category.description,
        );
    }
    prompt = prompt.item(MENU_QUIT, "Quit", "");

    let choice: usize = prompt
        .interact()
        .map_err(|e| anyhow::anyhow!("Selection cancelled: {e}"))?;

    if choice == MENU_QUIT {
        return Ok(false);
    }
    workflow.choose_category(choice)?;
    Ok(true)
}

/// Question picker within the selected category.
fn step_question_select(workflow: &mut Workflow<'_>) -> Result<bool, anyhow::Error> {
    let category_title = workflow
        .category()
        .map(|c| c.title)
        .unwrap_or("questions");

    let mut prompt = select(format!("{category_title}: choose a question:"));
    if let Some(category) = workflow.category() {
        for (i, question) in category.questions.iter().enumerate() {
            prompt = prompt.item(i, question.prompt, question.difficulty.id());
        }
    }
    prompt = prompt.item(MENU_BACK, "← Back to topics", "");

    let choice: usize = prompt
        .interact()
        .map_err(|e| anyhow::anyhow!("Selection cancelled: {e}"))?;

    if choice == MENU_BACK {
        workflow.back_to_categories()?;
    } else {
        workflow.choose_question(choice)?;
    }
    Ok(true)
}

/// Recording step, in both its sub-states: before a take is captured and
/// after.
async fn step_recording(
    workflow: &mut Workflow<'_>,
    client: &AnalysisClient,
    config: &StarprepConfig,
) -> Result<bool, anyhow::Error> {
    let question = workflow
        .question()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("recording step without a selected question"))?;

    if workflow.session().is_none() {
        return step_recording_capture(workflow, &question, config);
    }

    let duration = workflow
        .session()
        .map(|s| s.duration_secs())
        .unwrap_or_default();

    let choice: usize = select(format!("Answer captured ({duration:.0}s). What next?"))
        .item(0, "Analyze & get feedback", "uploads your answer")
        .item(1, "Play back", "")
        .item(2, "Re-record", "discards this take")
        .item(MENU_BACK, "← Back to questions", "discards this take")
        .interact()
        .map_err(|e| anyhow::anyhow!("Selection cancelled: {e}"))?;

    match choice {
        0 => {
            let request = workflow.begin_analysis()?;
            let progress = spinner();
            progress.start("Analyzing your answer...");

            let outcome = client.analyze(&request.wav_path, &request.question).await;

            match workflow.complete_analysis(outcome) {
                Ok(()) => {
                    progress.stop("Analysis complete");
                }
                Err(e) => {
                    // Step stays at recording with the take intact; the
                    // user decides whether to try again.
                    progress.stop("Analysis failed");
                    cliclack::log::error(format!("{e}"))?;
                }
            }
        }
        1 => {
            if let Some(session) = workflow.session() {
                if let Err(e) = play_audio(session.path()) {
                    cliclack::log::warning(format!("Playback failed: {e}"))?;
                }
            }
        }
        2 => workflow.reset_capture()?,
        _ => workflow.back_to_questions()?,
    }
    Ok(true)
}

/// The not-yet-recorded sub-state: offer to start the microphone.
fn step_recording_capture(
    workflow: &mut Workflow<'_>,
    question: &Question,
    config: &StarprepConfig,
) -> Result<bool, anyhow::Error> {
    cliclack::note(
        format!("{} · {}", question.category, question.difficulty),
        question.prompt,
    )?;

    let choice: usize = select("Ready to answer out loud?")
        .item(0, "Start recording", "Enter stops, Esc cancels")
        .item(MENU_BACK, "← Back to questions", "")
        .interact()
        .map_err(|e| anyhow::anyhow!("Selection cancelled: {e}"))?;

    if choice == MENU_BACK {
        workflow.back_to_questions()?;
        return Ok(true);
    }

    match record_answer(question, config) {
        Ok(Some(session)) => {
            workflow.capture_ready(session)?;
        }
        Ok(None) => {
            cliclack::log::info("Recording discarded.")?;
        }
        Err(Error::DeviceUnavailable(msg)) => {
            // No partial session; the step does not change.
            tracing::error!("Capture device unavailable: {msg}");
            cliclack::log::error(format!(
                "Could not access the microphone: {msg}\nCheck permissions and your audio configuration."
            ))?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(true)
}

/// Records one take with the live recording screen.
///
/// Returns `Ok(None)` when the user cancels or nothing was captured.
///
/// # Errors
/// - `Error::DeviceUnavailable` if the microphone cannot be acquired
/// - If the captured take cannot be written
fn record_answer(
    question: &Question,
    config: &StarprepConfig,
) -> Result<Option<RecordingSession>, Error> {
    let mut recorder = AnswerRecorder::new(
        config.audio.sample_rate,
        config.audio.device.clone(),
    );
    recorder.start()?;

    let mut tui = match RecorderTui::new(
        question.prompt,
        recorder.sample_rate(),
        config.audio.peak_volume_threshold,
        config.audio.reference_level_db,
    ) {
        Ok(tui) => tui,
        Err(e) => {
            // Release the device before reporting
            let _ = recorder.stop();
            return Err(Error::DeviceUnavailable(format!(
                "failed to initialize recording screen: {e}"
            )));
        }
    };

    let mut keep_take = false;
    loop {
        match tui.handle_input() {
            Ok(RecorderCommand::Continue) => {
                let samples = recorder.samples();
                if let Err(e) = tui.render(&samples) {
                    tracing::warn!("Render failed: {e}");
                }
            }
            Ok(RecorderCommand::Stop) => {
                keep_take = true;
                break;
            }
            Ok(RecorderCommand::Cancel) => {
                break;
            }
            Err(e) => {
                tracing::error!("Input handling error: {e}");
                break;
            }
        }
    }

    let session = recorder.stop()?;
    if let Err(e) = tui.cleanup() {
        tracing::warn!("Terminal cleanup failed: {e}");
    }

    if keep_take {
        Ok(session)
    } else {
        // Dropping the session releases the WAV file
        Ok(None)
    }
}

/// Feedback step: render the report, persist the session, offer what next.
/// Returns false when the user quits.
fn step_feedback(workflow: &mut Workflow<'_>) -> Result<bool, anyhow::Error> {
    let question = workflow
        .question()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("feedback step without a selected question"))?;
    let feedback = workflow
        .feedback()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("feedback step without feedback"))?;

    render_feedback(question.prompt, &feedback);

    persist_session(workflow, &question);

    let choice: usize = select("What next?")
        .item(0, "Try another question", "keeps this topic")
        .item(1, "Main menu", "")
        .item(MENU_QUIT, "Quit", "")
        .interact()
        .map_err(|e| anyhow::anyhow!("Selection cancelled: {e}"))?;

    match choice {
        0 => {
            workflow.retry_question()?;
            Ok(true)
        }
        1 => {
            workflow.main_menu()?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Saves the analyzed session to history and keeps a copy of the audio for
/// `starprep replay`. Failures are logged, never fatal.
fn persist_session(workflow: &Workflow<'_>, question: &Question) {
    let feedback = match workflow.feedback() {
        Some(feedback) => feedback,
        None => return,
    };

    match config::data_dir() {
        Ok(data_dir) => {
            match HistoryStore::new(&data_dir) {
                Ok(mut store) => {
                    if let Err(e) =
                        store.save_session(question.prompt, question.category, feedback)
                    {
                        tracing::warn!("Failed to save session to history: {e}");
                    }
                }
                Err(e) => tracing::warn!("Failed to open history store: {e}"),
            }

            if let Some(session) = workflow.session() {
                if let Err(e) = session.persist_copy(&data_dir.join("last_answer.wav")) {
                    tracing::warn!("Failed to keep a copy of the answer: {e}");
                }
            }
        }
        Err(e) => tracing::warn!("Failed to resolve data directory: {e}"),
    }
}

//! End-to-end wizard flow against a stub analysis endpoint.
//!
//! Drives the workflow state machine the same way the terminal wizard does,
//! with a local HTTP server standing in for the analysis service.

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use starprep::analysis::AnalysisClient;
use starprep::catalog::{Catalog, Difficulty};
use starprep::error::Error;
use starprep::recording::{AnswerRecorder, RecordingSession};
use starprep::workflow::{Step, Workflow};

/// The exact response body the stub returns for a successful analysis.
const FEEDBACK_JSON: &str = r#"{
    "transcription": "Hi",
    "critique": "Good",
    "starAnalysis": {"situation": "s", "task": "t", "action": "a", "result": "r"},
    "confidenceScore": {"score": 7.5, "hesitationWords": 1, "hesitationDetails": ["um"], "clarity": 8.0},
    "strengths": ["Clear"],
    "improvements": ["Pace"],
    "overallRating": 7.8,
    "timestamp": "2024-01-01T00:00:00Z"
}"#;

/// Starts a stub server and returns the URL of its /analyze route.
async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/analyze")
}

/// Builds a captured answer from two one-second fragments, delivered in
/// order like the audio callback would.
fn captured_answer() -> RecordingSession {
    let fragment_one: Vec<i16> = (0..16000).map(|i| (i % 311) as i16).collect();
    let fragment_two: Vec<i16> = (0..16000).map(|i| ((i % 173) + 400) as i16).collect();

    let mut samples = Vec::new();
    samples.extend_from_slice(&fragment_one);
    samples.extend_from_slice(&fragment_two);

    RecordingSession::write(&samples, 16000).unwrap()
}

/// Advances a fresh workflow to the recording step on a beginner
/// "Algorithms" question.
fn select_beginner_algorithms_question<'a>(catalog: &'a Catalog) -> Workflow<'a> {
    let mut workflow = Workflow::new(catalog);

    let category_index = catalog
        .categories()
        .iter()
        .position(|c| c.title == "Algorithms")
        .expect("Algorithms category");
    workflow.choose_category(category_index).unwrap();

    let question_index = catalog.categories()[category_index]
        .questions
        .iter()
        .position(|q| q.difficulty == Difficulty::Beginner)
        .expect("beginner question");
    workflow.choose_question(question_index).unwrap();

    assert_eq!(workflow.step(), Step::Recording);
    workflow
}

#[tokio::test]
async fn scenario_a_successful_analysis_reaches_feedback() {
    // The stub checks the upload contract before answering: a multipart
    // body with a WAV `file` part and the question prompt under `question`.
    let app = Router::new().route(
        "/analyze",
        post(|mut multipart: Multipart| async move {
            let mut saw_file = false;
            let mut saw_question = false;

            while let Some(field) = multipart.next_field().await.unwrap() {
                let name = field.name().unwrap_or_default().to_string();
                match name.as_str() {
                    "file" => {
                        let bytes = field.bytes().await.unwrap();
                        assert_eq!(&bytes[..4], b"RIFF");
                        assert_eq!(&bytes[8..12], b"WAVE");
                        saw_file = true;
                    }
                    "question" => {
                        let text = field.text().await.unwrap();
                        assert!(!text.is_empty());
                        saw_question = true;
                    }
                    other => panic!("unexpected multipart field {other}"),
                }
            }

            if saw_file && saw_question {
                ([("content-type", "application/json")], FEEDBACK_JSON).into_response()
            } else {
                StatusCode::BAD_REQUEST.into_response()
            }
        }),
    );
    let endpoint = spawn_stub(app).await;

    let catalog = Catalog::builtin();
    let mut workflow = select_beginner_algorithms_question(&catalog);

    workflow.capture_ready(captured_answer()).unwrap();

    let client = AnalysisClient::new(endpoint);
    let request = workflow.begin_analysis().unwrap();
    let outcome = client.analyze(&request.wav_path, &request.question).await;
    workflow.complete_analysis(outcome).unwrap();

    assert_eq!(workflow.step(), Step::Feedback);

    let feedback = workflow.feedback().unwrap();
    assert_eq!(feedback.transcription, "Hi");
    assert_eq!(feedback.critique, "Good");
    assert_eq!(feedback.star_analysis.situation, "s");
    assert_eq!(feedback.star_analysis.task, "t");
    assert_eq!(feedback.star_analysis.action, "a");
    assert_eq!(feedback.star_analysis.result, "r");
    assert_eq!(feedback.confidence_score.score, 7.5);
    assert_eq!(feedback.confidence_score.hesitation_words, 1);
    assert_eq!(feedback.confidence_score.hesitation_details, vec!["um"]);
    assert_eq!(feedback.confidence_score.clarity, 8.0);
    assert_eq!(feedback.strengths, vec!["Clear"]);
    assert_eq!(feedback.improvements, vec!["Pace"]);
    assert_eq!(feedback.overall_rating, 7.8);
    assert_eq!(feedback.timestamp, "2024-01-01T00:00:00Z");
}

#[tokio::test]
async fn scenario_b_server_error_keeps_audio_for_retry() {
    let app = Router::new().route(
        "/analyze",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let endpoint = spawn_stub(app).await;

    let catalog = Catalog::builtin();
    let mut workflow = select_beginner_algorithms_question(&catalog);
    workflow.capture_ready(captured_answer()).unwrap();

    let wav_before = std::fs::read(workflow.session().unwrap().path()).unwrap();

    let client = AnalysisClient::new(endpoint);
    let request = workflow.begin_analysis().unwrap();
    let outcome = client.analyze(&request.wav_path, &request.question).await;
    let err = workflow.complete_analysis(outcome).unwrap_err();

    assert!(matches!(err, Error::AnalysisFailed(_)));
    assert_eq!(workflow.step(), Step::Recording);
    assert!(workflow.feedback().is_none());

    // The captured audio is bit-identical and still owned by the session
    let wav_after = std::fs::read(workflow.session().unwrap().path()).unwrap();
    assert_eq!(wav_before, wav_after);
}

#[tokio::test]
async fn scenario_c_rejected_capture_leaves_no_session() {
    let catalog = Catalog::builtin();
    let mut workflow = select_beginner_algorithms_question(&catalog);

    // A device that cannot exist: acquisition must fail without leaving
    // any partial capture state.
    let mut recorder = AnswerRecorder::new(16000, "starprep-test-missing-device".to_string());
    let err = recorder.start().unwrap_err();
    assert!(matches!(err, Error::DeviceUnavailable(_)));

    assert!(recorder.stop().unwrap().is_none());
    assert_eq!(workflow.step(), Step::Recording);
    assert!(workflow.session().is_none());

    // The wizard stays in the recording step and can still go back
    workflow.back_to_questions().unwrap();
    assert_eq!(workflow.step(), Step::QuestionSelect);
}

#[tokio::test]
async fn malformed_success_body_is_reported_as_such() {
    let app = Router::new().route("/analyze", post(|| async { "not feedback json" }));
    let endpoint = spawn_stub(app).await;

    let catalog = Catalog::builtin();
    let mut workflow = select_beginner_algorithms_question(&catalog);
    workflow.capture_ready(captured_answer()).unwrap();

    let client = AnalysisClient::new(endpoint);
    let request = workflow.begin_analysis().unwrap();
    let outcome = client.analyze(&request.wav_path, &request.question).await;
    let err = workflow.complete_analysis(outcome).unwrap_err();

    assert!(matches!(err, Error::MalformedResponse(_)));
    assert!(err.is_analysis_error());
    assert_eq!(workflow.step(), Step::Recording);
    assert!(workflow.session().is_some());
}

#[tokio::test]
async fn unreachable_endpoint_is_an_analysis_failure() {
    let catalog = Catalog::builtin();
    let mut workflow = select_beginner_algorithms_question(&catalog);
    workflow.capture_ready(captured_answer()).unwrap();

    // Nothing listens on this port
    let client = AnalysisClient::new("http://127.0.0.1:9/analyze");
    let request = workflow.begin_analysis().unwrap();
    let outcome = client.analyze(&request.wav_path, &request.question).await;
    let err = workflow.complete_analysis(outcome).unwrap_err();

    assert!(matches!(err, Error::AnalysisFailed(_)));
    assert_eq!(workflow.step(), Step::Recording);
}

use std::time::Duration;

use moodlog_classifier::{
    ClassifierError, ErrorKind, HuggingFaceClassifier, MoodClassifier,
};
use moodlog_schema::{AnalysisSource, MoodLabel};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/j-hartmann/emotion-english-distilroberta-base";

fn emotion_scores() -> serde_json::Value {
    serde_json::json!([[
        {"label": "sadness", "score": 0.64},
        {"label": "fear", "score": 0.21},
        {"label": "neutral", "score": 0.09},
        {"label": "joy", "score": 0.06}
    ]])
}

fn classifier_for(server: &MockServer) -> HuggingFaceClassifier {
    HuggingFaceClassifier::new("hf_test", format!("{}{}", server.uri(), MODEL_PATH))
}

#[tokio::test]
async fn classify_sends_bearer_auth_and_inputs() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("authorization", "Bearer hf_test"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({"inputs": "I miss home."})))
        .respond_with(ResponseTemplate::new(200).set_body_json(emotion_scores()))
        .expect(1)
        .mount(&server)
        .await;

    let classifier = classifier_for(&server);
    let c = classifier.classify("I miss home.").await.unwrap();

    assert_eq!(c.mood, MoodLabel::Sad);
    assert_eq!(c.intensity, 6);
    assert_eq!(c.emotions, vec!["sadness", "fear", "neutral"]);
    assert_eq!(classifier.source(), AnalysisSource::Remote);
}

#[tokio::test]
async fn model_loading_is_reported_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "error": "Model j-hartmann/emotion-english-distilroberta-base is currently loading",
            "estimated_time": 20.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = classifier_for(&server).classify("hello").await.unwrap_err();
    match err {
        ClassifierError::Status { status, kind, body } => {
            assert_eq!(status, 503);
            assert_eq!(kind, ErrorKind::ModelLoading);
            assert!(body.contains("currently loading"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_is_a_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let err = classifier_for(&server).classify("hello").await.unwrap_err();
    assert!(matches!(
        err,
        ClassifierError::Status {
            kind: ErrorKind::AuthError,
            ..
        }
    ));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = classifier_for(&server).classify("hello").await.unwrap_err();
    assert!(matches!(err, ClassifierError::MalformedPayload(_)));
}

#[tokio::test]
async fn empty_label_list_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([[]])))
        .mount(&server)
        .await;

    let err = classifier_for(&server).classify("hello").await.unwrap_err();
    assert!(matches!(err, ClassifierError::MalformedPayload(_)));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(emotion_scores())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let classifier = classifier_for(&server).with_timeout(Duration::from_millis(200));
    let err = classifier.classify("hello").await.unwrap_err();
    assert!(matches!(err, ClassifierError::Timeout));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let classifier = HuggingFaceClassifier::new("hf_test", "http://127.0.0.1:9/models/x")
        .with_timeout(Duration::from_secs(2));
    let err = classifier.classify("hello").await.unwrap_err();
    assert!(matches!(
        err,
        ClassifierError::Transport(_) | ClassifierError::Timeout
    ));
}

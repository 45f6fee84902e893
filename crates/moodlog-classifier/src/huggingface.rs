//! Hosted emotion classifier on the Hugging Face inference API
//!
//! https://huggingface.co/docs/api-inference

use std::time::Duration;

use async_trait::async_trait;
use moodlog_schema::{clamp_intensity, AnalysisSource, MoodLabel};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::{Classification, ClassifierError, ErrorKind, MoodClassifier};

pub const DEFAULT_EMOTION_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/j-hartmann/emotion-english-distilroberta-base";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_REMOTE_EMOTIONS: usize = 3;
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct HuggingFaceClassifier {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl HuggingFaceClassifier {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: build_client(DEFAULT_TIMEOUT),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Fails with [`ClassifierError::NotConfigured`] when no usable key is given.
    pub fn try_new(
        api_key: Option<&str>,
        endpoint: impl Into<String>,
    ) -> Result<Self, ClassifierError> {
        match api_key.map(str::trim) {
            Some(key) if !key.is_empty() => Ok(Self::new(key, endpoint)),
            _ => Err(ClassifierError::NotConfigured),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

#[async_trait]
impl MoodClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        let resp = match self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&EmotionRequest { inputs: text })
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return Err(ClassifierError::Timeout),
            Err(e) => return Err(ClassifierError::Transport(e.to_string())),
        };

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), endpoint = %self.endpoint, "emotion endpoint returned error status");
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                kind: ErrorKind::from_status(status.as_u16()),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let bytes = match resp.bytes().await {
            Ok(b) => b,
            Err(e) if e.is_timeout() => return Err(ClassifierError::Timeout),
            Err(e) => return Err(ClassifierError::Transport(e.to_string())),
        };

        let payload: EmotionPayload = serde_json::from_slice(&bytes)
            .map_err(|e| ClassifierError::MalformedPayload(e.to_string()))?;
        to_classification(payload.into_scores())
    }

    fn source(&self) -> AnalysisSource {
        AnalysisSource::Remote
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}

#[derive(Debug, Serialize)]
struct EmotionRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LabelScore {
    label: String,
    score: f64,
}

/// The inference API nests results per input; some deployments return the flat list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmotionPayload {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl EmotionPayload {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            EmotionPayload::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            EmotionPayload::Flat(scores) => scores,
        }
    }
}

fn to_classification(mut scores: Vec<LabelScore>) -> Result<Classification, ClassifierError> {
    if scores.is_empty() {
        return Err(ClassifierError::MalformedPayload(
            "empty label list".to_string(),
        ));
    }
    if let Some(bad) = scores.iter().find(|s| !s.score.is_finite()) {
        return Err(ClassifierError::MalformedPayload(format!(
            "non-finite score for label {}",
            bad.label
        )));
    }

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    let top = &scores[0];

    Ok(Classification {
        mood: mood_for_emotion(&top.label),
        intensity: clamp_intensity(top.score * 10.0),
        emotions: scores
            .iter()
            .take(MAX_REMOTE_EMOTIONS)
            .map(|s| s.label.to_lowercase())
            .collect(),
    })
}

pub fn mood_for_emotion(label: &str) -> MoodLabel {
    match label.trim().to_lowercase().as_str() {
        "joy" => MoodLabel::Happy,
        "sadness" => MoodLabel::Sad,
        "anger" | "disgust" => MoodLabel::Angry,
        "fear" => MoodLabel::Anxious,
        "surprise" => MoodLabel::Excited,
        _ => MoodLabel::Neutral,
    }
}

pub mod huggingface;
pub mod lexicon;

use async_trait::async_trait;
use moodlog_schema::{AnalysisSource, MoodLabel};
use thiserror::Error;

pub use huggingface::{HuggingFaceClassifier, DEFAULT_EMOTION_ENDPOINT, DEFAULT_TIMEOUT};
pub use lexicon::extract;

/// Mood, intensity and emotion tags produced by a classification strategy.
///
/// Summary and suggestion are always derived from the text by the lexicon,
/// whichever strategy produced the classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub mood: MoodLabel,
    pub intensity: u8,
    pub emotions: Vec<String>,
}

#[async_trait]
pub trait MoodClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError>;
    fn source(&self) -> AnalysisSource;
    fn name(&self) -> &str;
}

/// Coarse classification of a non-success HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 503 while the hosted model is still loading.
    ModelLoading,
    RateLimit,
    AuthError,
    InvalidRequest,
    ServerError,
    Unknown,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            503 => Self::ModelLoading,
            429 => Self::RateLimit,
            401 | 403 => Self::AuthError,
            400 | 422 => Self::InvalidRequest,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ModelLoading | Self::RateLimit | Self::ServerError)
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier request timed out")]
    Timeout,
    #[error("classifier transport error: {0}")]
    Transport(String),
    #[error("classifier api error ({status}, {kind:?}): {body}")]
    Status {
        status: u16,
        kind: ErrorKind,
        body: String,
    },
    #[error("malformed classifier payload: {0}")]
    MalformedPayload(String),
    #[error("remote classifier is not configured")]
    NotConfigured,
}

impl ClassifierError {
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Transport(_) => true,
            Self::Status { kind, .. } => kind.is_transient(),
            Self::MalformedPayload(_) | Self::NotConfigured => false,
        }
    }
}

/// Keyword and punctuation heuristics. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalClassifier;

#[async_trait]
impl MoodClassifier for LexicalClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        Ok(lexicon::classify(text))
    }

    fn source(&self) -> AnalysisSource {
        AnalysisSource::Local
    }

    fn name(&self) -> &str {
        "lexical"
    }
}

use std::sync::Arc;
use std::time::Duration;

use moodlog_classifier::lexicon::{self, MAX_EMOTION_TAGS};
use moodlog_classifier::{Classification, HuggingFaceClassifier, MoodClassifier};
use moodlog_schema::{
    AnalysisResult, MoodHistoryEntry, DEFAULT_EMOTION_TAG, MAX_INTENSITY, MIN_INTENSITY,
};

use crate::config::AnalysisConfig;

/// Mood analysis coordinator.
///
/// Tries the configured remote strategy once and falls back to the lexicon
/// on any failure. `analyze` always returns a complete result.
pub struct MoodAnalyzer {
    remote: Option<Arc<dyn MoodClassifier>>,
    timeout: Duration,
}

impl MoodAnalyzer {
    pub fn new(remote: Option<Arc<dyn MoodClassifier>>, timeout: Duration) -> Self {
        Self { remote, timeout }
    }

    pub fn local_only() -> Self {
        Self::new(None, moodlog_classifier::DEFAULT_TIMEOUT)
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        let remote_config = &config.remote;
        let timeout = remote_config.timeout();

        if !remote_config.is_configured() {
            tracing::debug!("remote classifier not configured, using lexical analysis only");
            return Self::new(None, timeout);
        }

        match HuggingFaceClassifier::try_new(
            remote_config.credential().as_deref(),
            remote_config.endpoint.clone(),
        ) {
            Ok(classifier) => {
                tracing::info!(endpoint = %classifier.endpoint(), "remote classifier enabled");
                Self::new(Some(Arc::new(classifier.with_timeout(timeout))), timeout)
            }
            Err(e) => {
                tracing::warn!(error = %e, "remote classifier unavailable, using lexical analysis only");
                Self::new(None, timeout)
            }
        }
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        let Some(remote) = &self.remote else {
            return lexicon::extract(text);
        };

        match tokio::time::timeout(self.timeout, remote.classify(text)).await {
            Ok(Ok(classification)) => {
                tracing::debug!(classifier = remote.name(), mood = %classification.mood, "remote classification succeeded");
                complete(text, classification, remote.as_ref())
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    classifier = remote.name(),
                    error = %e,
                    transient = e.is_transient(),
                    "remote classification failed, falling back to lexical analysis"
                );
                lexicon::extract(text)
            }
            Err(_) => {
                tracing::warn!(
                    classifier = remote.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "remote classification timed out, falling back to lexical analysis"
                );
                lexicon::extract(text)
            }
        }
    }

    /// Analyze and wrap the result as a new journal record.
    pub async fn analyze_entry(&self, user_id: &str, text: &str) -> MoodHistoryEntry {
        let analysis = self.analyze(text).await;
        MoodHistoryEntry::new(user_id, text, analysis)
    }
}

/// Summary and suggestion always come from the text itself.
fn complete(
    text: &str,
    classification: Classification,
    classifier: &dyn MoodClassifier,
) -> AnalysisResult {
    let Classification {
        mood,
        intensity,
        mut emotions,
    } = classification;

    emotions.retain(|e| !e.trim().is_empty());
    emotions.truncate(MAX_EMOTION_TAGS);
    if emotions.is_empty() {
        emotions.push(DEFAULT_EMOTION_TAG.to_string());
    }

    AnalysisResult {
        mood,
        intensity: intensity.clamp(MIN_INTENSITY, MAX_INTENSITY),
        emotions,
        summary: lexicon::summarize_entry(text),
        suggestion: lexicon::suggestion_for(mood).to_string(),
        source: classifier.source(),
    }
}

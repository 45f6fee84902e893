pub mod analyzer;
pub mod config;
pub mod history;
pub mod insights;
pub mod trends;

pub use analyzer::*;
pub use config::*;
pub use history::*;
pub use insights::{
    summarize, InsightReport, INSIGHT_WINDOW, INSUFFICIENT_HISTORY_PROMPT, TREND_MIN_ENTRIES,
};
pub use trends::*;

pub use moodlog_classifier::{lexicon, MoodClassifier};
pub use moodlog_schema::{AnalysisResult, AnalysisSource, MoodHistoryEntry, MoodLabel};

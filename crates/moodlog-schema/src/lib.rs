use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Tag used when no finer-grained emotion was detected.
pub const DEFAULT_EMOTION_TAG: &str = "reflective";

pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 10;
pub const BASELINE_INTENSITY: u8 = 5;

/// Coarse mood classification of a journal entry.
///
/// Declaration order is the canonical tie-break order: whenever two moods
/// score equally, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Happy,
    Sad,
    Anxious,
    Angry,
    #[default]
    Neutral,
    Excited,
    Stressed,
    Calm,
}

impl MoodLabel {
    pub const ALL: [MoodLabel; 8] = [
        MoodLabel::Happy,
        MoodLabel::Sad,
        MoodLabel::Anxious,
        MoodLabel::Angry,
        MoodLabel::Neutral,
        MoodLabel::Excited,
        MoodLabel::Stressed,
        MoodLabel::Calm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MoodLabel::Happy => "happy",
            MoodLabel::Sad => "sad",
            MoodLabel::Anxious => "anxious",
            MoodLabel::Angry => "angry",
            MoodLabel::Neutral => "neutral",
            MoodLabel::Excited => "excited",
            MoodLabel::Stressed => "stressed",
            MoodLabel::Calm => "calm",
        }
    }

    /// Unknown labels resolve to `Neutral`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "happy" => MoodLabel::Happy,
            "sad" => MoodLabel::Sad,
            "anxious" => MoodLabel::Anxious,
            "angry" => MoodLabel::Angry,
            "excited" => MoodLabel::Excited,
            "stressed" => MoodLabel::Stressed,
            "calm" => MoodLabel::Calm,
            _ => MoodLabel::Neutral,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            MoodLabel::Happy => "😊",
            MoodLabel::Sad => "😢",
            MoodLabel::Anxious => "😰",
            MoodLabel::Angry => "😠",
            MoodLabel::Neutral => "😐",
            MoodLabel::Excited => "🤩",
            MoodLabel::Stressed => "😫",
            MoodLabel::Calm => "😌",
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, MoodLabel::Happy | MoodLabel::Excited | MoodLabel::Calm)
    }

    pub fn is_negative(self) -> bool {
        matches!(
            self,
            MoodLabel::Sad | MoodLabel::Anxious | MoodLabel::Angry | MoodLabel::Stressed
        )
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MoodLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(MoodLabel::parse(&raw))
    }
}

/// Provenance of a classification. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Remote,
    #[default]
    Local,
}

fn default_intensity() -> u8 {
    BASELINE_INTENSITY
}

fn default_emotions() -> Vec<String> {
    vec![DEFAULT_EMOTION_TAG.to_string()]
}

fn default_summary() -> String {
    "Unable to analyze at this time".to_string()
}

fn default_suggestion() -> String {
    "Keep journaling to track your emotions over time".to_string()
}

/// The unit produced per journal entry. Always fully populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub mood: MoodLabel,
    #[serde(default = "default_intensity")]
    pub intensity: u8,
    #[serde(default = "default_emotions")]
    pub emotions: Vec<String>,
    #[serde(default = "default_summary")]
    pub summary: String,
    #[serde(default = "default_suggestion")]
    pub suggestion: String,
    #[serde(default)]
    pub source: AnalysisSource,
}

impl Default for AnalysisResult {
    /// Low-confidence result used when nothing better is available.
    fn default() -> Self {
        Self {
            mood: MoodLabel::Neutral,
            intensity: default_intensity(),
            emotions: default_emotions(),
            summary: default_summary(),
            suggestion: default_suggestion(),
            source: AnalysisSource::Local,
        }
    }
}

/// Clamp any raw score into the closed intensity range.
pub fn clamp_intensity(raw: f64) -> u8 {
    if !raw.is_finite() {
        return BASELINE_INTENSITY;
    }
    raw.round()
        .clamp(f64::from(MIN_INTENSITY), f64::from(MAX_INTENSITY)) as u8
}

/// A persisted journal record: the analysis plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodHistoryEntry {
    pub entry_id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub text: String,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

impl MoodHistoryEntry {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>, analysis: AnalysisResult) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            user_id: user_id.into(),
            created_at: Utc::now(),
            text: text.into(),
            analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_label_parse_unknown_is_neutral() {
        assert_eq!(MoodLabel::parse("melancholy"), MoodLabel::Neutral);
        assert_eq!(MoodLabel::parse(""), MoodLabel::Neutral);
        assert_eq!(MoodLabel::parse(" Calm "), MoodLabel::Calm);
    }

    #[test]
    fn mood_label_roundtrips_every_variant() {
        for mood in MoodLabel::ALL {
            assert_eq!(MoodLabel::parse(mood.as_str()), mood);
        }
    }

    #[test]
    fn mood_label_valence_sets_are_disjoint() {
        for mood in MoodLabel::ALL {
            assert!(!(mood.is_positive() && mood.is_negative()), "{mood}");
        }
        assert!(!MoodLabel::Neutral.is_positive());
        assert!(!MoodLabel::Neutral.is_negative());
    }

    #[test]
    fn mood_label_deserializes_unknown_as_neutral() {
        let mood: MoodLabel = serde_json::from_str("\"ecstatic\"").unwrap();
        assert_eq!(mood, MoodLabel::Neutral);
        let mood: MoodLabel = serde_json::from_str("\"stressed\"").unwrap();
        assert_eq!(mood, MoodLabel::Stressed);
    }

    #[test]
    fn partial_analysis_record_degrades_to_defaults() {
        let parsed: AnalysisResult = serde_json::from_str(r#"{"mood":"sad"}"#).unwrap();
        assert_eq!(parsed.mood, MoodLabel::Sad);
        assert_eq!(parsed.intensity, 5);
        assert_eq!(parsed.emotions, vec!["reflective".to_string()]);
        assert_eq!(parsed.source, AnalysisSource::Local);
        assert!(!parsed.summary.is_empty());
        assert!(!parsed.suggestion.is_empty());
    }

    #[test]
    fn clamp_intensity_bounds() {
        assert_eq!(clamp_intensity(-3.0), 1);
        assert_eq!(clamp_intensity(0.4), 1);
        assert_eq!(clamp_intensity(8.5), 9);
        assert_eq!(clamp_intensity(42.0), 10);
        assert_eq!(clamp_intensity(f64::NAN), 5);
    }

    #[test]
    fn history_entry_flattens_analysis() {
        let entry = MoodHistoryEntry::new("u1", "hello", AnalysisResult::default());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["mood"], "neutral");
        assert_eq!(json["source"], "local");

        let back: MoodHistoryEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}

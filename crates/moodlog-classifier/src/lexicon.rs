//! Lexical feature extraction over raw journal text.
//!
//! Every function here is pure and total: any string, including the empty
//! string, produces a well-formed value.
//!
//! Mood tie-breaks follow the order of [`MOOD_TRIGGERS`], which mirrors the
//! declaration order of [`MoodLabel`].

use std::collections::HashSet;

use moodlog_schema::{
    clamp_intensity, AnalysisResult, AnalysisSource, MoodLabel, BASELINE_INTENSITY,
    DEFAULT_EMOTION_TAG,
};

use crate::Classification;

pub const MAX_EMOTION_TAGS: usize = 3;
pub const SUMMARY_MAX_CHARS: usize = 100;
pub const SUMMARY_TRUNCATED_CHARS: usize = 97;
pub const EMPTY_SUMMARY: &str = "A moment of reflection";
pub const GENERIC_SUGGESTION: &str = "Keep tracking your emotions to understand yourself better.";

const EXCLAMATION_CAP: usize = 3;
const CAPS_WORD_CAP: usize = 2;
const CAPS_WORD_MIN_LEN: usize = 3;
const LONG_ENTRY_CHARS: usize = 500;
const INTENSIFIER_WEIGHT: f64 = 0.5;

const MOOD_TRIGGERS: &[(MoodLabel, &[&str])] = &[
    (
        MoodLabel::Happy,
        &[
            "happy",
            "joy",
            "excited",
            "great",
            "wonderful",
            "amazing",
            "love",
            "blessed",
            "fantastic",
            "good day",
        ],
    ),
    (
        MoodLabel::Sad,
        &[
            "sad",
            "depressed",
            "crying",
            "tears",
            "lonely",
            "down",
            "hurt",
            "disappointed",
            "grief",
            "miss",
        ],
    ),
    (
        MoodLabel::Anxious,
        &[
            "anxious", "worried", "nervous", "stress", "panic", "fear", "scared", "uneasy",
            "concern",
        ],
    ),
    (
        MoodLabel::Angry,
        &[
            "angry",
            "mad",
            "furious",
            "annoyed",
            "frustrated",
            "irritated",
            "rage",
            "upset",
            "hate",
        ],
    ),
    (
        MoodLabel::Excited,
        &["excited", "thrilled", "pumped", "energized", "eager", "enthusiastic"],
    ),
    (
        MoodLabel::Stressed,
        &["stressed", "overwhelmed", "pressure", "busy", "exhausted", "tired"],
    ),
    (
        MoodLabel::Calm,
        &["calm", "peaceful", "relaxed", "serene", "tranquil", "content"],
    ),
];

const EMOTION_TRIGGERS: &[(&str, &[&str])] = &[
    ("grateful", &["grateful", "thankful", "appreciate", "blessed"]),
    ("hopeful", &["hope", "optimistic", "looking forward", "better"]),
    ("proud", &["proud", "accomplished", "achieved", "success"]),
    ("confused", &["confused", "uncertain", "don't know", "unsure"]),
    ("relieved", &["relieved", "relief", "finally", "glad"]),
    ("nostalgic", &["remember", "used to", "miss", "back then"]),
];

const INTENSIFIERS: &[&str] = &["very", "extremely", "really", "so", "completely", "totally"];

const SUGGESTIONS: &[(MoodLabel, &str)] = &[
    (
        MoodLabel::Happy,
        "Keep celebrating these positive moments! Consider writing about what made today special.",
    ),
    (
        MoodLabel::Sad,
        "It's okay to feel sad. Try doing something small that brings you comfort today.",
    ),
    (
        MoodLabel::Anxious,
        "Take deep breaths. Try breaking down your worries into smaller, manageable steps.",
    ),
    (
        MoodLabel::Angry,
        "Your feelings are valid. Consider a short walk or physical activity to release tension.",
    ),
    (
        MoodLabel::Neutral,
        "Reflect on one thing you're looking forward to today.",
    ),
    (
        MoodLabel::Excited,
        "Channel this energy into something creative or share your excitement with someone!",
    ),
    (
        MoodLabel::Stressed,
        "Remember to take breaks. Even 5 minutes of rest can help reset your mind.",
    ),
    (
        MoodLabel::Calm,
        "Enjoy this peaceful moment. Consider meditation or gentle stretching to maintain this feeling.",
    ),
];

/// Full local analysis of one entry.
pub fn extract(text: &str) -> AnalysisResult {
    let Classification {
        mood,
        intensity,
        emotions,
    } = classify(text);

    AnalysisResult {
        mood,
        intensity,
        emotions,
        summary: summarize_entry(text),
        suggestion: suggestion_for(mood).to_string(),
        source: AnalysisSource::Local,
    }
}

pub(crate) fn classify(text: &str) -> Classification {
    Classification {
        mood: detect_mood(text),
        intensity: score_intensity(text),
        emotions: extract_emotions(text),
    }
}

/// Lower-cases and folds typographic apostrophes so "don’t" matches "don't".
fn normalize(text: &str) -> String {
    text.to_lowercase().replace('\u{2019}', "'")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_word_char(c))
        .filter(|word| !word.is_empty())
}

/// Mood with the strictly highest trigger count; `Neutral` when nothing fires.
pub fn detect_mood(text: &str) -> MoodLabel {
    let lower = normalize(text);

    let mut best = MoodLabel::Neutral;
    let mut best_count = 0;
    for (mood, phrases) in MOOD_TRIGGERS {
        let count = phrases
            .iter()
            .filter(|phrase| lower.contains(*phrase))
            .count();
        if count > best_count {
            best = *mood;
            best_count = count;
        }
    }
    best
}

pub fn score_intensity(text: &str) -> u8 {
    let mut score = f64::from(BASELINE_INTENSITY);

    let exclamations = text.matches('!').count().min(EXCLAMATION_CAP);
    score += exclamations as f64;

    let caps_words = words(text)
        .filter(|word| {
            word.chars().count() >= CAPS_WORD_MIN_LEN
                && word.chars().all(|c| c.is_ascii_uppercase())
        })
        .count()
        .min(CAPS_WORD_CAP);
    score += caps_words as f64;

    if text.chars().count() > LONG_ENTRY_CHARS {
        score += 1.0;
    }

    let lower = text.to_lowercase();
    let present: HashSet<&str> = words(&lower).collect();
    let intensifiers = INTENSIFIERS
        .iter()
        .filter(|word| present.contains(*word))
        .count();
    score += intensifiers as f64 * INTENSIFIER_WEIGHT;

    clamp_intensity(score)
}

/// Up to three emotion tags in declaration order, or `["reflective"]`.
pub fn extract_emotions(text: &str) -> Vec<String> {
    let lower = normalize(text);

    let emotions: Vec<String> = EMOTION_TRIGGERS
        .iter()
        .filter(|(_, phrases)| phrases.iter().any(|phrase| lower.contains(phrase)))
        .map(|(tag, _)| tag.to_string())
        .take(MAX_EMOTION_TAGS)
        .collect();

    if emotions.is_empty() {
        vec![DEFAULT_EMOTION_TAG.to_string()]
    } else {
        emotions
    }
}

/// First sentence of the entry, bounded to 100 characters.
pub fn summarize_entry(text: &str) -> String {
    let first = text
        .split(|c: char| matches!(c, '.' | '!' | '?'))
        .next()
        .unwrap_or_default()
        .trim();

    if first.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }

    if first.chars().count() > SUMMARY_MAX_CHARS {
        let mut truncated: String = first.chars().take(SUMMARY_TRUNCATED_CHARS).collect();
        truncated.push_str("...");
        return truncated;
    }

    first.to_string()
}

pub fn suggestion_for(mood: MoodLabel) -> &'static str {
    SUGGESTIONS
        .iter()
        .find(|(label, _)| *label == mood)
        .map(|(_, text)| *text)
        .unwrap_or(GENERIC_SUGGESTION)
}

//! Whole-history mood statistics and the intensity series for charting.

use chrono::NaiveDate;
use moodlog_schema::{MoodHistoryEntry, MoodLabel};
use serde::Serialize;

use crate::insights::{dominant, round1, tally_moods};

pub const CHART_POINTS: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodStats {
    pub total_entries: usize,
    pub dominant_mood: MoodLabel,
    pub average_intensity: f64,
    /// Per-mood counts in first-encountered order.
    pub mood_counts: Vec<(MoodLabel, usize)>,
}

impl MoodStats {
    /// Statistics over every entry given, most-recent-first. `None` when empty.
    pub fn from_entries(entries: &[MoodHistoryEntry]) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }

        let mood_counts = tally_moods(entries.iter().map(|e| &e.analysis.mood));
        let (dominant_mood, _) = dominant(&mood_counts);
        let total: u32 = entries
            .iter()
            .map(|e| u32::from(e.analysis.intensity))
            .sum();

        Some(Self {
            total_entries: entries.len(),
            dominant_mood,
            average_intensity: round1(f64::from(total) / entries.len() as f64),
            mood_counts,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityPoint {
    pub date: NaiveDate,
    pub mood: MoodLabel,
    pub intensity: u8,
}

/// The `points` most recent entries in chronological order.
pub fn intensity_series(entries: &[MoodHistoryEntry], points: usize) -> Vec<IntensityPoint> {
    entries
        .iter()
        .take(points)
        .rev()
        .map(|e| IntensityPoint {
            date: e.created_at.date_naive(),
            mood: e.analysis.mood,
            intensity: e.analysis.intensity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use moodlog_schema::AnalysisResult;

    use super::*;

    fn entry(days_ago: i64, mood: MoodLabel, intensity: u8) -> MoodHistoryEntry {
        let mut entry = MoodHistoryEntry::new(
            "u1",
            "text",
            AnalysisResult {
                mood,
                intensity,
                ..AnalysisResult::default()
            },
        );
        entry.created_at = Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap()
            - Duration::days(days_ago);
        entry
    }

    #[test]
    fn stats_empty_is_none() {
        assert!(MoodStats::from_entries(&[]).is_none());
    }

    #[test]
    fn stats_cover_whole_history() {
        let entries: Vec<_> = (0..12)
            .map(|i| {
                let mood = if i < 5 { MoodLabel::Sad } else { MoodLabel::Calm };
                entry(i, mood, 4)
            })
            .collect();
        let stats = MoodStats::from_entries(&entries).unwrap();
        assert_eq!(stats.total_entries, 12);
        assert_eq!(stats.dominant_mood, MoodLabel::Calm);
        assert_eq!(stats.average_intensity, 4.0);
        assert_eq!(
            stats.mood_counts,
            vec![(MoodLabel::Sad, 5), (MoodLabel::Calm, 7)]
        );
    }

    #[test]
    fn stats_average_is_rounded() {
        let entries = [
            entry(0, MoodLabel::Happy, 7),
            entry(1, MoodLabel::Happy, 8),
            entry(2, MoodLabel::Sad, 8),
        ];
        let stats = MoodStats::from_entries(&entries).unwrap();
        assert_eq!(stats.average_intensity, 7.7);
    }

    #[test]
    fn series_is_chronological_and_bounded() {
        let entries: Vec<_> = (0..9)
            .map(|i| entry(i, MoodLabel::Neutral, (i + 1) as u8))
            .collect();
        let series = intensity_series(&entries, CHART_POINTS);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].intensity, 7);
        assert_eq!(series[6].intensity, 1);
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(
            series[6].date,
            NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
        );
    }

    #[test]
    fn series_of_empty_history_is_empty() {
        assert!(intensity_series(&[], CHART_POINTS).is_empty());
    }
}

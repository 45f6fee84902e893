//! Personalized insight narrative over a window of past analyses.
//!
//! Input is ordered most-recent-first. Only the first [`INSIGHT_WINDOW`]
//! results are considered; fewer than [`MIN_ENTRIES_FOR_INSIGHTS`] yields
//! the fixed [`INSUFFICIENT_HISTORY_PROMPT`].

use std::fmt;

use moodlog_schema::{AnalysisResult, MoodLabel};

pub const INSIGHT_WINDOW: usize = 10;
pub const MIN_ENTRIES_FOR_INSIGHTS: usize = 3;
/// Histories shorter than this get no recent-trend section.
pub const TREND_MIN_ENTRIES: usize = 5;
pub const RECENT_WINDOW: usize = 3;
pub const TREND_THRESHOLD: f64 = 1.5;
pub const STREAK_MIN: usize = 2;

pub const INSUFFICIENT_HISTORY_PROMPT: &str =
    "Keep journaling! You need at least 3 entries to get personalized insights.";

const GENERIC_RECOMMENDATION: &str = "• Keep journaling consistently\n• Notice patterns in your moods\n• Celebrate your self-awareness";

const RECOMMENDATIONS: &[(MoodLabel, &str)] = &[
    (
        MoodLabel::Happy,
        "• Keep capturing these positive moments\n• Share your happiness with loved ones\n• Note what's contributing to this mood",
    ),
    (
        MoodLabel::Sad,
        "• Practice self-compassion\n• Reach out to supportive friends or family\n• Engage in gentle, comforting activities",
    ),
    (
        MoodLabel::Anxious,
        "• Try breathing exercises or meditation\n• Break worries into smaller, actionable steps\n• Consider physical activity to release tension",
    ),
    (
        MoodLabel::Angry,
        "• Take space to cool down before reacting\n• Physical exercise can help release anger\n• Journal about what triggered these feelings",
    ),
    (
        MoodLabel::Stressed,
        "• Prioritize rest and sleep\n• Delegate tasks when possible\n• Schedule short breaks throughout your day",
    ),
    (
        MoodLabel::Excited,
        "• Channel this energy productively\n• Share your enthusiasm with others\n• Balance excitement with grounding activities",
    ),
    (
        MoodLabel::Calm,
        "• Enjoy and protect this peaceful state\n• Note what helps you feel calm\n• Consider meditation or mindfulness",
    ),
    (
        MoodLabel::Neutral,
        "• Explore new experiences to engage emotions\n• Reflect on what brings you joy\n• Small changes can shift your mood positively",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diversity {
    Consistent,
    SomeVariation,
    WideRange,
}

impl Diversity {
    pub fn from_count(distinct: usize) -> Self {
        match distinct {
            0 | 1 => Diversity::Consistent,
            2 | 3 => Diversity::SomeVariation,
            _ => Diversity::WideRange,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityBand {
    VeryHigh,
    ModerateHigh,
    Balanced,
    Low,
}

impl IntensityBand {
    pub fn from_average(average: f64) -> Self {
        if average >= 8.0 {
            IntensityBand::VeryHigh
        } else if average >= 6.0 {
            IntensityBand::ModerateHigh
        } else if average >= 4.0 {
            IntensityBand::Balanced
        } else {
            IntensityBand::Low
        }
    }

    fn comment(self) -> &'static str {
        match self {
            IntensityBand::VeryHigh => "Your emotions are running very high. This intensity can be draining - make sure you're taking time to rest and recharge.",
            IntensityBand::ModerateHigh => "You're experiencing moderate to high emotional intensity. This is healthy engagement with your feelings.",
            IntensityBand::Balanced => "Your emotional intensity is balanced. You seem to be processing feelings in a measured way.",
            IntensityBand::Low => "Your emotional intensity has been low. If this feels concerning, consider activities that energize you.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Intensifying,
    Calming,
    Steady,
}

impl TrendDirection {
    /// Thresholds are strict: a gap of exactly 1.5 is steady.
    pub fn classify(recent_average: f64, overall_average: f64) -> Self {
        if recent_average > overall_average + TREND_THRESHOLD {
            TrendDirection::Intensifying
        } else if recent_average < overall_average - TREND_THRESHOLD {
            TrendDirection::Calming
        } else {
            TrendDirection::Steady
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValenceStreak {
    Positive,
    Negative,
}

impl ValenceStreak {
    pub fn detect(recent: &[AnalysisResult]) -> Option<Self> {
        let positive = recent.iter().filter(|r| r.mood.is_positive()).count();
        let negative = recent.iter().filter(|r| r.mood.is_negative()).count();
        if positive >= STREAK_MIN {
            Some(ValenceStreak::Positive)
        } else if negative >= STREAK_MIN {
            Some(ValenceStreak::Negative)
        } else {
            None
        }
    }
}

/// Mood counts in first-encountered order.
pub(crate) fn tally_moods<'a>(
    moods: impl IntoIterator<Item = &'a MoodLabel>,
) -> Vec<(MoodLabel, usize)> {
    let mut counts: Vec<(MoodLabel, usize)> = Vec::new();
    for mood in moods {
        match counts.iter_mut().find(|(label, _)| label == mood) {
            Some((_, count)) => *count += 1,
            None => counts.push((*mood, 1)),
        }
    }
    counts
}

/// Highest count wins; ties go to the mood encountered first.
pub(crate) fn dominant(counts: &[(MoodLabel, usize)]) -> (MoodLabel, usize) {
    let mut best = (MoodLabel::Neutral, 0);
    for &(mood, count) in counts {
        if count > best.1 {
            best = (mood, count);
        }
    }
    best
}

pub(crate) fn mean_intensity(results: &[AnalysisResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: u32 = results.iter().map(|r| u32::from(r.intensity)).sum();
    f64::from(total) / results.len() as f64
}

/// Rounds to one decimal, the precision every figure is shown with.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsightReport {
    pub entry_count: usize,
    pub dominant_mood: MoodLabel,
    pub dominant_count: usize,
    pub mood_diversity: usize,
    pub average_intensity: f64,
    pub recent_average_intensity: f64,
    /// `None` below [`TREND_MIN_ENTRIES`].
    pub trend: Option<TrendDirection>,
    pub valence: Option<ValenceStreak>,
}

impl InsightReport {
    pub fn from_history(history: &[AnalysisResult]) -> Option<Self> {
        let window = &history[..history.len().min(INSIGHT_WINDOW)];
        if window.len() < MIN_ENTRIES_FOR_INSIGHTS {
            return None;
        }

        let counts = tally_moods(window.iter().map(|r| &r.mood));
        let (dominant_mood, dominant_count) = dominant(&counts);

        let recent = &window[..RECENT_WINDOW];
        let average_intensity = mean_intensity(window);
        let recent_average_intensity = mean_intensity(recent);
        let (trend, valence) = if window.len() >= TREND_MIN_ENTRIES {
            (
                Some(TrendDirection::classify(recent_average_intensity, average_intensity)),
                ValenceStreak::detect(recent),
            )
        } else {
            (None, None)
        };

        Some(Self {
            entry_count: window.len(),
            dominant_mood,
            dominant_count,
            mood_diversity: counts.len(),
            average_intensity,
            recent_average_intensity,
            trend,
            valence,
        })
    }

    pub fn diversity(&self) -> Diversity {
        Diversity::from_count(self.mood_diversity)
    }

    pub fn intensity_band(&self) -> IntensityBand {
        IntensityBand::from_average(round1(self.average_intensity))
    }

    pub fn recommendation(&self) -> &'static str {
        RECOMMENDATIONS
            .iter()
            .find(|(mood, _)| *mood == self.dominant_mood)
            .map(|(_, text)| *text)
            .unwrap_or(GENERIC_RECOMMENDATION)
    }
}

impl fmt::Display for InsightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let average = round1(self.average_intensity);
        let recent = round1(self.recent_average_intensity);

        write!(
            f,
            "📊 **Your Mood Analysis** ({} entries)\n\n",
            self.entry_count
        )?;
        writeln!(
            f,
            "**Most Frequent Mood:** {} ({}x)",
            self.dominant_mood.as_str().to_uppercase(),
            self.dominant_count
        )?;

        match self.diversity() {
            Diversity::Consistent => {
                write!(f, "You've been consistently {}.", self.dominant_mood)?
            }
            Diversity::SomeVariation => write!(
                f,
                "Your moods show some variation across {} states.",
                self.mood_diversity
            )?,
            Diversity::WideRange => write!(
                f,
                "You've experienced a wide range of emotions ({} different moods).",
                self.mood_diversity
            )?,
        }
        f.write_str("\n\n")?;

        writeln!(f, "**Average Intensity:** {average:.1}/10")?;
        write!(f, "💡 {}\n\n", self.intensity_band().comment())?;

        if let Some(trend) = self.trend {
            self.write_trend(f, trend, average, recent)?;
        }

        write!(f, "\n**Personalized Suggestions:**\n{}", self.recommendation())
    }
}

impl InsightReport {
    fn write_trend(
        &self,
        f: &mut fmt::Formatter<'_>,
        trend: TrendDirection,
        average: f64,
        recent: f64,
    ) -> fmt::Result {
        writeln!(f, "**Recent Trend:**")?;
        match trend {
            TrendDirection::Intensifying => write!(
                f,
                "📈 Your emotions have been intensifying lately ({recent:.1}/10 vs {average:.1}/10 average). Take extra care of yourself and consider stress-relief activities.\n\n"
            )?,
            TrendDirection::Calming => write!(
                f,
                "📉 Your emotions have been calming down ({recent:.1}/10 vs {average:.1}/10 average). This stabilization is a positive sign!\n\n"
            )?,
            TrendDirection::Steady => f.write_str(
                "➡️ Your emotional intensity is staying consistent. You're maintaining steady patterns.\n\n",
            )?,
        }

        match self.valence {
            Some(ValenceStreak::Positive) => writeln!(
                f,
                "✨ Your recent entries show mostly positive moods! Keep doing what's working for you."
            )?,
            Some(ValenceStreak::Negative) => writeln!(
                f,
                "🌟 You've had some challenging days recently. Remember: these feelings are temporary and you're doing great by tracking them."
            )?,
            None => {}
        }
        Ok(())
    }
}

/// Narrative for `history` (most-recent-first), or the fixed prompt when
/// there are fewer than three entries.
pub fn summarize(history: &[AnalysisResult]) -> String {
    match InsightReport::from_history(history) {
        Some(report) => report.to_string(),
        None => INSUFFICIENT_HISTORY_PROMPT.to_string(),
    }
}

//! Heuristic detection of subtitle timing drift
//!
//! Looks at the spacing and length of the first captions in a track and
//! suggests a calibration. The result is advisory; callers decide whether to
//! apply it.

use super::config::TimingConfig;
use crate::types::CaptionFragment;
use serde::Serialize;

/// Detection thresholds
pub mod thresholds {
    /// Number of leading captions inspected
    pub const WINDOW: usize = 20;

    /// Mean gap (seconds) above which captions are considered late
    pub const LARGE_GAP_SECS: f64 = 3.0;

    /// Mean gap (seconds) below which spacing counts as tight
    pub const TIGHT_GAP_SECS: f64 = 0.1;

    /// Gap standard deviation (seconds) above which tight spacing is erratic
    pub const ERRATIC_STDDEV_SECS: f64 = 0.5;

    /// Mean duration (seconds) below which captions flash by too quickly
    pub const SHORT_DURATION_SECS: f64 = 1.5;

    pub const LARGE_GAP_PRE_ROLL_MS: f64 = 200.0;
    pub const ERRATIC_POST_ROLL_MS: f64 = 300.0;
    pub const SHORT_DURATION_POST_ROLL_MS: f64 = 500.0;
}

/// Suggested calibration with a confidence score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftAnalysis {
    pub recommendation: TimingConfig,
    /// 0 to 100
    pub confidence: u8,
    pub analysis: String,
    pub detected: bool,
}

impl DriftAnalysis {
    fn none(analysis: impl Into<String>) -> Self {
        Self {
            recommendation: TimingConfig::default(),
            confidence: 0,
            analysis: analysis.into(),
            detected: false,
        }
    }

    fn detected(recommendation: TimingConfig, confidence: u8, analysis: String) -> Self {
        Self {
            recommendation,
            confidence,
            analysis,
            detected: true,
        }
    }
}

/// Mean and population standard deviation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl GapStats {
    /// Non-negative gaps between consecutive captions in the window
    pub fn from_fragments(fragments: &[CaptionFragment]) -> Option<Self> {
        let window = fragments.len().min(thresholds::WINDOW);
        let gaps: Vec<f64> = (1..window)
            .map(|i| fragments[i].start - fragments[i - 1].end)
            .filter(|gap| *gap >= 0.0)
            .collect();
        Self::from_values(&gaps)
    }

    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;

        Some(Self {
            count: values.len(),
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

/// Mean length of the positive-duration captions in the window
fn mean_duration(fragments: &[CaptionFragment]) -> Option<f64> {
    let durations: Vec<f64> = fragments
        .iter()
        .take(thresholds::WINDOW)
        .map(CaptionFragment::duration)
        .filter(|duration| *duration > 0.0)
        .collect();

    if durations.is_empty() {
        None
    } else {
        Some(durations.iter().sum::<f64>() / durations.len() as f64)
    }
}

/// Analyze a caption track for timing problems.
///
/// `current_time` is the playback position when the analysis was requested;
/// the heuristics only look at the track itself.
pub fn detect(fragments: &[CaptionFragment], current_time: f64) -> DriftAnalysis {
    if fragments.len() < 2 {
        return DriftAnalysis::none("Not enough subtitles to analyze");
    }

    let Some(gaps) = GapStats::from_fragments(fragments) else {
        return DriftAnalysis::none("Cannot analyze overlapping subtitles");
    };

    tracing::debug!(
        current_time,
        gaps = gaps.count,
        mean_gap = gaps.mean,
        std_dev = gaps.std_dev,
        "analyzing subtitle timing"
    );

    recommend(&gaps, || mean_duration(fragments))
}

/// Apply the decision rules in priority order.
///
/// The duration statistic is only computed when the gap rules do not fire.
fn recommend(gaps: &GapStats, mean_duration: impl FnOnce() -> Option<f64>) -> DriftAnalysis {
    if gaps.mean > thresholds::LARGE_GAP_SECS {
        return DriftAnalysis::detected(
            TimingConfig::default().with_pre_roll(thresholds::LARGE_GAP_PRE_ROLL_MS),
            70,
            format!(
                "Large gaps detected ({:.2}s avg). Consider pre-roll to show subtitles earlier.",
                gaps.mean
            ),
        );
    }

    // Non-negative gaps bound std_dev by mean * sqrt(count - 1), so this
    // cannot fire on gaps taken from a WINDOW-sized prefix.
    if gaps.mean < thresholds::TIGHT_GAP_SECS && gaps.std_dev > thresholds::ERRATIC_STDDEV_SECS {
        return DriftAnalysis::detected(
            TimingConfig::default().with_post_roll(thresholds::ERRATIC_POST_ROLL_MS),
            60,
            "Inconsistent spacing detected. Consider post-roll for better readability.".to_string(),
        );
    }

    if let Some(duration) = mean_duration() {
        if duration < thresholds::SHORT_DURATION_SECS {
            return DriftAnalysis::detected(
                TimingConfig::default().with_post_roll(thresholds::SHORT_DURATION_POST_ROLL_MS),
                65,
                format!(
                    "Short subtitle durations ({duration:.2}s avg). Consider post-roll for readability."
                ),
            );
        }
    }

    DriftAnalysis::none("Subtitle timing appears normal")
}

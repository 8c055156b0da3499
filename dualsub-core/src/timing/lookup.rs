//! Finding the subtitle on screen at a playback instant
//!
//! When several subtitles are visible at once (overlapping captions, or long
//! post-roll), the one with the lowest index in the track wins.

use super::calibration::{apply_calibration, is_visible};
use super::config::TimingConfig;
use crate::types::CaptionFragment;

/// Index of the first fragment visible at `current_time`
pub fn find_active_index(
    fragments: &[CaptionFragment],
    current_time: f64,
    config: &TimingConfig,
) -> Option<usize> {
    fragments
        .iter()
        .position(|fragment| is_visible(fragment, current_time, config))
}

/// First fragment visible at `current_time`
pub fn find_active<'a>(
    fragments: &'a [CaptionFragment],
    current_time: f64,
    config: &TimingConfig,
) -> Option<&'a CaptionFragment> {
    find_active_index(fragments, current_time, config).map(|index| &fragments[index])
}

/// Text to display at `current_time`; empty when nothing is visible
pub fn find_subtitle_text<'a>(
    fragments: &'a [CaptionFragment],
    current_time: f64,
    config: &TimingConfig,
) -> &'a str {
    find_active(fragments, current_time, config)
        .map(|fragment| fragment.text.as_str())
        .unwrap_or("")
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: f64,
    end: f64,
    index: usize,
}

/// Start-ordered index over the calibrated spans of a caption track.
///
/// Built once per track and config; each query binary-searches the spans that
/// have started and skips the prefix whose running maximum end is already
/// past. Results are identical to [`find_active_index`].
#[derive(Debug, Clone)]
pub struct SubtitleIndex<'a> {
    fragments: &'a [CaptionFragment],
    config: TimingConfig,
    spans: Vec<Span>,
    /// `max_end[i]` is the largest end among `spans[..=i]`
    max_end: Vec<f64>,
}

impl<'a> SubtitleIndex<'a> {
    pub fn new(fragments: &'a [CaptionFragment], config: TimingConfig) -> Self {
        let mut spans: Vec<Span> = fragments
            .iter()
            .enumerate()
            .map(|(index, fragment)| {
                let (start, end) = apply_calibration(fragment.start, fragment.end, &config);
                Span { start, end, index }
            })
            .collect();

        spans.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.index.cmp(&b.index)));

        let mut max_end = Vec::with_capacity(spans.len());
        let mut running = f64::NEG_INFINITY;
        for span in &spans {
            if span.end > running {
                running = span.end;
            }
            max_end.push(running);
        }

        Self {
            fragments,
            config,
            spans,
            max_end,
        }
    }

    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    /// The indexed track, in its original order
    pub fn fragments(&self) -> &'a [CaptionFragment] {
        self.fragments
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Index of the first fragment (in track order) visible at `current_time`
    pub fn active_index(&self, current_time: f64) -> Option<usize> {
        if current_time.is_nan() {
            return None;
        }

        // Spans that have started
        let started = self.spans.partition_point(|span| span.start <= current_time);
        // Every span before `first` has already ended
        let first = self.max_end[..started].partition_point(|&end| end < current_time);

        self.spans[first..started]
            .iter()
            .filter(|span| span.end >= current_time)
            .map(|span| span.index)
            .min()
    }

    pub fn active(&self, current_time: f64) -> Option<&'a CaptionFragment> {
        self.active_index(current_time)
            .map(|index| &self.fragments[index])
    }

    pub fn text_at(&self, current_time: f64) -> &'a str {
        self.active(current_time)
            .map(|fragment| fragment.text.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_lines() -> Vec<CaptionFragment> {
        vec![
            CaptionFragment::new(0.0, 1.0, "Hi"),
            CaptionFragment::new(1.0, 2.0, "there."),
        ]
    }

    #[test]
    fn test_linear_lookup() {
        let captions = two_lines();
        let config = TimingConfig::zero();

        assert_eq!(find_subtitle_text(&captions, 1.5, &config), "there.");
        assert_eq!(find_subtitle_text(&captions, 0.5, &config), "Hi");
        assert_eq!(find_subtitle_text(&captions, 5.0, &config), "");
        assert!(find_active(&captions, 5.0, &config).is_none());
    }

    #[test]
    fn test_shared_boundary_prefers_earlier_entry() {
        let captions = two_lines();
        let config = TimingConfig::zero();
        assert_eq!(find_active_index(&captions, 1.0, &config), Some(0));
        assert_eq!(SubtitleIndex::new(&captions, config).active_index(1.0), Some(0));
    }

    #[test]
    fn test_empty_track() {
        let captions: Vec<CaptionFragment> = Vec::new();
        let config = TimingConfig::default();
        assert_eq!(find_subtitle_text(&captions, 0.0, &config), "");

        let index = SubtitleIndex::new(&captions, config);
        assert!(index.is_empty());
        assert_eq!(index.text_at(3.0), "");
    }

    #[test]
    fn test_index_matches_linear_scan() {
        let captions = two_lines();
        let config = TimingConfig::zero();
        let index = SubtitleIndex::new(&captions, config);

        for t in [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 5.0] {
            assert_eq!(
                index.active_index(t),
                find_active_index(&captions, t, &config),
                "t = {t}"
            );
        }
    }

    #[test]
    fn test_index_with_out_of_order_and_overlapping_entries() {
        let captions = vec![
            CaptionFragment::new(5.0, 6.0, "late"),
            CaptionFragment::new(0.0, 10.0, "long"),
            CaptionFragment::new(2.0, 3.0, "short"),
        ];
        let config = TimingConfig::zero();
        let index = SubtitleIndex::new(&captions, config);

        assert_eq!(index.text_at(5.5), "late");
        assert_eq!(index.text_at(2.5), "long");
        assert_eq!(index.text_at(9.0), "long");
        assert_eq!(find_subtitle_text(&captions, 5.5, &config), "late");
    }

    #[test]
    fn test_post_roll_extends_overlap() {
        let captions = two_lines();
        let config = TimingConfig::new(0.0, 0.0, 800.0);
        assert_eq!(find_subtitle_text(&captions, 1.5, &config), "Hi");
        assert_eq!(SubtitleIndex::new(&captions, config).text_at(1.5), "Hi");
        assert_eq!(SubtitleIndex::new(&captions, config).text_at(2.5), "there.");
    }

    #[test]
    fn test_backwards_seek_needs_no_state() {
        let captions = two_lines();
        let index = SubtitleIndex::new(&captions, TimingConfig::zero());
        assert_eq!(index.text_at(1.5), "there.");
        assert_eq!(index.text_at(0.2), "Hi");
        assert_eq!(index.text_at(f64::NAN), "");
    }
}

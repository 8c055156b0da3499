//! Applying a [`TimingConfig`] to subtitle intervals

use super::config::TimingConfig;
use crate::types::CaptionFragment;

/// Shift and widen `[start, end]` by the calibration, clamped at zero.
///
/// `start + offset - pre_roll` and `end + offset + post_roll`, in seconds.
#[inline]
pub fn apply_calibration(start: f64, end: f64, config: &TimingConfig) -> (f64, f64) {
    let adjusted_start = start + config.offset() - config.pre_roll_secs();
    let adjusted_end = end + config.offset() + config.post_roll_secs();

    (adjusted_start.max(0.0), adjusted_end.max(0.0))
}

/// Whether `fragment` should be on screen at `current_time` (bounds inclusive)
#[inline]
pub fn is_visible(fragment: &CaptionFragment, current_time: f64, config: &TimingConfig) -> bool {
    let (start, end) = apply_calibration(fragment.start, fragment.end, config);
    current_time >= start && current_time <= end
}

//! Subtitle timing: calibration, playback lookup and drift detection

pub mod calibration;
pub mod config;
pub mod drift;
pub mod lookup;

pub use calibration::{apply_calibration, is_visible};
pub use config::{TimingConfig, BASE_OFFSET, OFFSET_STEP};
pub use drift::{detect, DriftAnalysis, GapStats};
pub use lookup::{find_active, find_active_index, find_subtitle_text, SubtitleIndex};

//! Timing calibration configuration
//!
//! Caption timestamps from the caption source run systematically late, so a
//! base correction of [`BASE_OFFSET`] is always part of the stored offset. The
//! user only ever sees and adjusts the *relative* offset on top of it:
//!
//! ```text
//! offset (stored, absolute) = BASE_OFFSET + relative offset (user-facing)
//! ```
//!
//! Stored blobs carry the absolute offset, so a blob written by an earlier
//! session loads back to the same calibration.

use crate::error::{CoreError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Internal calibration applied to every caption track, in seconds
pub const BASE_OFFSET: f64 = -1.5;

/// Granularity of user offset adjustments, in seconds
pub const OFFSET_STEP: f64 = 0.1;

/// Offset, pre-roll and post-roll applied to subtitle visibility windows
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingConfig {
    /// Absolute shift in seconds, may be negative
    offset: f64,
    /// Milliseconds to show a subtitle early, never negative
    pre_roll: f64,
    /// Milliseconds to keep a subtitle longer, never negative
    post_roll: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            offset: BASE_OFFSET,
            pre_roll: 0.0,
            post_roll: 0.0,
        }
    }
}

impl TimingConfig {
    /// Build from an absolute offset; negative rolls are clamped to zero
    pub fn new(offset: f64, pre_roll_ms: f64, post_roll_ms: f64) -> Self {
        Self {
            offset,
            pre_roll: clamp_roll(pre_roll_ms),
            post_roll: clamp_roll(post_roll_ms),
        }
    }

    /// No shift at all, not even the base correction
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Build from the user-facing relative offset
    pub fn from_relative(relative_offset: f64, pre_roll_ms: f64, post_roll_ms: f64) -> Self {
        Self::new(BASE_OFFSET + relative_offset, pre_roll_ms, post_roll_ms)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn pre_roll_ms(&self) -> f64 {
        self.pre_roll
    }

    pub fn post_roll_ms(&self) -> f64 {
        self.post_roll
    }

    pub fn pre_roll_secs(&self) -> f64 {
        self.pre_roll / 1000.0
    }

    pub fn post_roll_secs(&self) -> f64 {
        self.post_roll / 1000.0
    }

    /// Offset as shown to the user, 0 meaning "base correction only"
    pub fn relative_offset(&self) -> f64 {
        self.offset - BASE_OFFSET
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_relative_offset(mut self, relative_offset: f64) -> Self {
        self.offset = BASE_OFFSET + relative_offset;
        self
    }

    /// Move the relative offset by `delta`, snapped to [`OFFSET_STEP`]
    pub fn nudge_offset(self, delta: f64) -> Self {
        let relative = ((self.relative_offset() + delta) / OFFSET_STEP).round() * OFFSET_STEP;
        self.with_relative_offset(relative)
    }

    pub fn with_pre_roll(mut self, pre_roll_ms: f64) -> Self {
        self.pre_roll = clamp_roll(pre_roll_ms);
        self
    }

    pub fn with_post_roll(mut self, post_roll_ms: f64) -> Self {
        self.post_roll = clamp_roll(post_roll_ms);
        self
    }

    /// Check that every field is finite and the rolls are not negative
    pub fn validate(&self) -> Result<()> {
        if !self.offset.is_finite() {
            return Err(CoreError::Configuration(
                "offset must be a finite number".into(),
            ));
        }

        for (name, value) in [("preRoll", self.pre_roll), ("postRoll", self.post_roll)] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Configuration(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        Ok(())
    }

    /// Serialize for the storage collaborator
    pub fn to_blob(&self) -> String {
        serde_json::json!({
            "offset": self.offset,
            "preRoll": self.pre_roll,
            "postRoll": self.post_roll,
        })
        .to_string()
    }

    /// Strict blob parsing.
    ///
    /// Missing fields take their default; a field with the wrong type or an
    /// out-of-range value is an error. Unknown fields are ignored.
    pub fn parse_blob(blob: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(blob).map_err(|e| CoreError::json("parse timing blob", e))?;

        let Value::Object(fields) = value else {
            return Err(CoreError::invalid_input("timing blob is not a JSON object"));
        };

        let defaults = Self::default();
        let config = Self {
            offset: number_field(&fields, "offset")?.unwrap_or(defaults.offset),
            pre_roll: number_field(&fields, "preRoll")?.unwrap_or(defaults.pre_roll),
            post_roll: number_field(&fields, "postRoll")?.unwrap_or(defaults.post_roll),
        };
        config.validate()?;
        Ok(config)
    }

    /// Lenient blob parsing: any problem yields [`TimingConfig::default`]
    pub fn from_blob(blob: &str) -> Self {
        match Self::parse_blob(blob) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring stored timing config");
                Self::default()
            }
        }
    }
}

fn number_field(fields: &Map<String, Value>, name: &str) -> Result<Option<f64>> {
    match fields.get(name) {
        None => Ok(None),
        Some(Value::Number(number)) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| CoreError::invalid_input(format!("{name} is not representable"))),
        Some(other) => Err(CoreError::invalid_input(format!(
            "{name} must be a number, got {other}"
        ))),
    }
}

fn clamp_roll(ms: f64) -> f64 {
    if ms.is_nan() {
        0.0
    } else {
        ms.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_base_offset() {
        let config = TimingConfig::default();
        assert_eq!(config.offset(), BASE_OFFSET);
        assert_eq!(config.relative_offset(), 0.0);
        assert_eq!(config.pre_roll_ms(), 0.0);
        assert_eq!(config.post_roll_ms(), 0.0);
    }

    #[test]
    fn test_relative_offset_round_trip() {
        let config = TimingConfig::from_relative(0.5, 0.0, 0.0);
        assert!((config.offset() - -1.0).abs() < 1e-9);
        assert!((config.relative_offset() - 0.5).abs() < 1e-9);

        let shifted = config.with_relative_offset(-2.0);
        assert!((shifted.offset() - -3.5).abs() < 1e-9);
    }

    #[test]
    fn test_nudge_snaps_to_step() {
        let mut config = TimingConfig::default();
        for _ in 0..3 {
            config = config.nudge_offset(0.1);
        }
        assert!((config.relative_offset() - 0.3).abs() < 1e-9);

        let config = config.nudge_offset(-0.5);
        assert!((config.relative_offset() - -0.2).abs() < 1e-9);
    }

    #[test]
    fn test_negative_rolls_are_clamped() {
        let config = TimingConfig::new(0.0, -100.0, f64::NAN);
        assert_eq!(config.pre_roll_ms(), 0.0);
        assert_eq!(config.post_roll_ms(), 0.0);
        assert_eq!(TimingConfig::zero().with_post_roll(-1.0).post_roll_ms(), 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite_offset() {
        let config = TimingConfig::zero().with_offset(f64::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(CoreError::Configuration(_))
        ));
    }

    #[test]
    fn test_blob_round_trip() {
        let config = TimingConfig::from_relative(0.7, 200.0, 350.0);
        let restored = TimingConfig::from_blob(&config.to_blob());
        assert_eq!(restored, config);
    }

    #[test]
    fn test_blob_uses_stored_field_names() {
        let blob = TimingConfig::default().to_blob();
        assert!(blob.contains("\"offset\""));
        assert!(blob.contains("\"preRoll\""));
        assert!(blob.contains("\"postRoll\""));
    }

    #[test]
    fn test_partial_blob_fills_defaults() {
        let config = TimingConfig::from_blob(r#"{"postRoll": 300}"#);
        assert_eq!(config.offset(), BASE_OFFSET);
        assert_eq!(config.pre_roll_ms(), 0.0);
        assert_eq!(config.post_roll_ms(), 300.0);
    }

    #[test]
    fn test_invalid_blobs_fall_back_to_default() {
        let invalid = [
            "",
            "not json",
            "null",
            "42",
            "[1, 2]",
            r#""offset""#,
            r#"{"offset": "1.5"}"#,
            r#"{"offset": null}"#,
            r#"{"preRoll": -50}"#,
            r#"{"postRoll": true}"#,
        ];
        for blob in invalid {
            assert_eq!(
                TimingConfig::from_blob(blob),
                TimingConfig::default(),
                "blob {blob:?}"
            );
        }
    }

    #[test]
    fn test_strict_parse_reports_reason() {
        match TimingConfig::parse_blob(r#"{"preRoll": -50}"#) {
            Err(CoreError::Configuration(msg)) => assert!(msg.contains("preRoll")),
            other => panic!("Expected configuration error, got {other:?}"),
        }
        assert!(matches!(
            TimingConfig::parse_blob("{"),
            Err(CoreError::Json { .. })
        ));
        assert!(matches!(
            TimingConfig::parse_blob("3"),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config = TimingConfig::from_blob(r#"{"offset": -1.0, "theme": "dark"}"#);
        assert_eq!(config.offset(), -1.0);
    }
}

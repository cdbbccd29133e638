//! Capture pipeline configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{MediaError, Result};

/// Configuration of a [`CaptureResource`](crate::CaptureResource) and its driver
///
/// ```rust
/// use sipx_media_core::CaptureConfig;
/// use std::time::Duration;
///
/// let config = CaptureConfig::default()
///     .with_samples_per_frame(160)
///     .with_samples_per_second(16000)
///     .with_control_send_timeout(Duration::from_millis(5));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.frame_interval_ms(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Samples delivered per tick
    pub samples_per_frame: u32,

    /// Output sample rate of the flowgraph
    pub samples_per_second: u32,

    /// Upper bound on resync steps in one direction per tick
    pub max_resync_steps: u32,

    /// Capacity of the control message queue
    pub control_queue_depth: usize,

    /// How long an async control send waits for queue space
    pub control_send_timeout: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            samples_per_frame: 80,
            samples_per_second: 8000,
            max_resync_steps: 64,
            control_queue_depth: 32,
            control_send_timeout: Duration::from_millis(20),
        }
    }
}

impl CaptureConfig {
    pub fn with_samples_per_frame(mut self, samples_per_frame: u32) -> Self {
        self.samples_per_frame = samples_per_frame;
        self
    }

    pub fn with_samples_per_second(mut self, samples_per_second: u32) -> Self {
        self.samples_per_second = samples_per_second;
        self
    }

    pub fn with_max_resync_steps(mut self, max_resync_steps: u32) -> Self {
        self.max_resync_steps = max_resync_steps;
        self
    }

    pub fn with_control_queue_depth(mut self, depth: usize) -> Self {
        self.control_queue_depth = depth;
        self
    }

    pub fn with_control_send_timeout(mut self, timeout: Duration) -> Self {
        self.control_send_timeout = timeout;
        self
    }

    /// Frame interval in whole milliseconds (truncated)
    pub fn frame_interval_ms(&self) -> u64 {
        frame_interval_ms(self.samples_per_frame, self.samples_per_second)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_frame_shape(self.samples_per_frame, self.samples_per_second)?;

        if self.max_resync_steps == 0 {
            return Err(MediaError::invalid_config("max_resync_steps must be greater than 0"));
        }

        if self.control_queue_depth == 0 {
            return Err(MediaError::invalid_config("control_queue_depth must be greater than 0"));
        }

        if self.control_send_timeout.is_zero() {
            return Err(MediaError::invalid_config(
                "control_send_timeout must be greater than 0",
            ));
        }

        Ok(())
    }
}

/// `samples_per_frame * 1000 / samples_per_second`, truncated
///
/// Returns 0 when `samples_per_second` is 0.
pub fn frame_interval_ms(samples_per_frame: u32, samples_per_second: u32) -> u64 {
    if samples_per_second == 0 {
        return 0;
    }
    u64::from(samples_per_frame) * 1000 / u64::from(samples_per_second)
}

/// Check the per-tick frame parameters
pub(crate) fn validate_frame_shape(samples_per_frame: u32, samples_per_second: u32) -> Result<()> {
    if samples_per_frame == 0 {
        return Err(MediaError::invalid_config("samples_per_frame must be greater than 0"));
    }

    if samples_per_second == 0 {
        return Err(MediaError::invalid_config("samples_per_second must be greater than 0"));
    }

    if frame_interval_ms(samples_per_frame, samples_per_second) == 0 {
        return Err(MediaError::invalid_config(format!(
            "{} samples at {}Hz is shorter than one millisecond",
            samples_per_frame, samples_per_second
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CaptureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_interval_ms(), 10);
    }

    #[test]
    fn test_frame_interval_truncates() {
        // 80 samples at 11025Hz is 7.256ms
        assert_eq!(frame_interval_ms(80, 11025), 7);
        assert_eq!(frame_interval_ms(441, 44100), 10);
        assert_eq!(frame_interval_ms(80, 0), 0);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(CaptureConfig::default().with_samples_per_frame(0).validate().is_err());
        assert!(CaptureConfig::default().with_samples_per_second(0).validate().is_err());
        assert!(CaptureConfig::default()
            .with_samples_per_frame(4)
            .with_samples_per_second(48000)
            .validate()
            .is_err());
        assert!(CaptureConfig::default().with_max_resync_steps(0).validate().is_err());
        assert!(CaptureConfig::default().with_control_queue_depth(0).validate().is_err());
        assert!(CaptureConfig::default()
            .with_control_send_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = CaptureConfig::default()
            .with_samples_per_frame(160)
            .with_samples_per_second(16000);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: CaptureConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let partial: CaptureConfig = serde_json::from_str(r#"{"max_resync_steps": 8}"#).unwrap();
        assert_eq!(partial.max_resync_steps, 8);
        assert_eq!(partial.samples_per_frame, 80);
    }
}

//! Error handling for the capture pipeline
//!
//! Errors are classified the way the processing thread reacts to them:
//! transient errors drop one frame or one control message, fatal errors
//! latch the resource into a failed state.

use std::time::Duration;
use thiserror::Error;

use crate::types::{DeviceId, FrameTime};

/// Result type alias for media operations
pub type Result<T> = std::result::Result<T, MediaError>;

/// Error type for media operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// No frame could be fetched this tick, even after resynchronizing
    #[error(
        "Frame unavailable on device {device_id} at {frame_time}ms \
         (not yet played: {frames_not_yet_played}, buffered ahead: {frames_buffered_ahead})"
    )]
    FrameUnavailable {
        device_id: DeviceId,
        frame_time: FrameTime,
        frames_not_yet_played: u32,
        frames_buffered_ahead: u32,
    },

    /// Device sample rate could not be queried
    #[error("Couldn't get sample rate of device \"{device_name}\" (id {device_id})")]
    DeviceRateUnavailable { device_id: DeviceId, device_name: String },

    /// A required collaborator was never attached
    #[error("Capture resource is not wired: missing {component}")]
    NotWired { component: String },

    /// Sample rate conversion failed
    #[error("Resampling {input_rate}Hz -> {output_rate}Hz failed: {reason}")]
    Resample {
        input_rate: u32,
        output_rate: u32,
        reason: String,
    },

    /// Device is not registered with the device buffer
    #[error("Unknown input device: {device_id}")]
    UnknownDevice { device_id: DeviceId },

    /// Control queue stayed full for the whole send timeout
    #[error("Control queue send timed out after {timeout:?}")]
    ControlQueueTimeout { timeout: Duration },

    /// Control queue is full (non-blocking send)
    #[error("Control queue is full")]
    ControlQueueFull,

    /// Resource owning the control queue is gone
    #[error("Control queue is closed")]
    ControlQueueClosed,

    /// Invalid configuration or tick parameters
    #[error("Invalid capture configuration: {details}")]
    InvalidConfig { details: String },

    /// Driver task ended abnormally
    #[error("Capture driver stopped: {details}")]
    DriverStopped { details: String },
}

impl MediaError {
    /// Create a new invalid configuration error
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            details: details.into(),
        }
    }

    /// Create a new device rate error
    pub fn device_rate_unavailable(device_id: DeviceId, device_name: impl Into<String>) -> Self {
        Self::DeviceRateUnavailable {
            device_id,
            device_name: device_name.into(),
        }
    }

    /// Create a new wiring error
    pub fn not_wired(component: impl Into<String>) -> Self {
        Self::NotWired {
            component: component.into(),
        }
    }

    /// Create a new resampling error
    pub fn resample(input_rate: u32, output_rate: u32, reason: impl Into<String>) -> Self {
        Self::Resample {
            input_rate,
            output_rate,
            reason: reason.into(),
        }
    }

    /// Whether the resource must stop processing after this error
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DeviceRateUnavailable { .. } | Self::NotWired { .. }
        )
    }

    /// Whether retrying later is expected to succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::FrameUnavailable { .. }
            | Self::ControlQueueTimeout { .. }
            | Self::ControlQueueFull => true,

            Self::DeviceRateUnavailable { .. }
            | Self::NotWired { .. }
            | Self::Resample { .. }
            | Self::UnknownDevice { .. }
            | Self::ControlQueueClosed
            | Self::InvalidConfig { .. }
            | Self::DriverStopped { .. } => false,
        }
    }
}

//! Input device buffer interface
//!
//! Capture resources do not talk to audio hardware. A device buffer sits in
//! between: device drivers push frames into it, keyed by device clock time,
//! and every capture resource reading a device asks it for the frame at a
//! given time.

pub mod ring;

pub use ring::RingDeviceBuffer;

use crate::types::{AudioBuffer, DeviceId, FrameTime};

/// Result of a single frame request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Frame found at the requested time
    Success(AudioBuffer),
    /// No frame stored at the requested time
    NotFound,
    /// Device unknown or broken
    Error,
}

/// Frame request answer, with the buffer fill state around the requested time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFetch {
    pub status: FetchStatus,
    /// Buffered frames newer than the requested time
    pub frames_not_yet_played: u32,
    /// Buffered frames older than the requested time
    pub frames_buffered_ahead: u32,
}

impl FrameFetch {
    pub fn found(buffer: AudioBuffer) -> Self {
        Self {
            status: FetchStatus::Success(buffer),
            frames_not_yet_played: 0,
            frames_buffered_ahead: 0,
        }
    }

    pub fn not_found(frames_not_yet_played: u32, frames_buffered_ahead: u32) -> Self {
        Self {
            status: FetchStatus::NotFound,
            frames_not_yet_played,
            frames_buffered_ahead,
        }
    }

    pub fn error() -> Self {
        Self {
            status: FetchStatus::Error,
            frames_not_yet_played: 0,
            frames_buffered_ahead: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, FetchStatus::Success(_))
    }

    /// Missed, and the requested time is behind the buffered frames
    pub fn is_behind(&self) -> bool {
        self.status == FetchStatus::NotFound
            && self.frames_buffered_ahead == 0
            && self.frames_not_yet_played > 0
    }

    /// Missed, and the requested time is past the buffered frames
    pub fn is_ahead(&self) -> bool {
        self.status == FetchStatus::NotFound
            && self.frames_buffered_ahead > 0
            && self.frames_not_yet_played == 0
    }
}

/// Frame store shared between device drivers and capture resources
///
/// Implementations are accessed from several processing threads at once and
/// must give read-consistent answers per call.
pub trait InputDeviceBuffer: Send + Sync {
    /// Device clock time of the most recent frame
    fn current_frame_time(&self, device_id: DeviceId) -> FrameTime;

    /// Fetch the frame stored at `frame_time`
    fn get_frame(&self, device_id: DeviceId, frame_time: FrameTime) -> FrameFetch;

    /// Current sample rate of the device, `None` if it cannot be determined
    fn device_sample_rate(&self, device_id: DeviceId) -> Option<u32>;

    /// Human readable device name, for diagnostics
    fn device_name(&self, device_id: DeviceId) -> Option<String>;
}

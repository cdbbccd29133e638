//! # Media-Core: Audio Capture Pipeline
//!
//! This library implements the input side of the media flowgraph: a capture
//! resource that pulls one frame per tick from a device buffer, keeps its
//! frame clock aligned with the device despite jitter, converts the frame to
//! the flowgraph sample rate and applies gain.
//!
//! ## Features
//!
//! - **Frame clock resync**: walks forward or backward one frame interval at
//!   a time when the device buffer has no frame at the expected time, without
//!   drifting the steady-state cadence
//! - **Zero-copy passthrough**: frames at the flowgraph rate and unity gain
//!   reach the consumer without being copied
//! - **Fixed-point gain**: Q1.14 gain with a persistent scratch accumulator
//! - **Async control**: gain and enable/disable messages over a bounded queue
//! - **Periodic driver**: a tokio task ticking the resource every frame interval
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use sipx_media_core::{AudioBuffer, CaptureResource, DeviceId, Gain, RingDeviceBuffer, TickOutcome};
//!
//! let mic = DeviceId(1);
//! let device = Arc::new(RingDeviceBuffer::default());
//! device.add_device(mic, "Built-in microphone", Some(8000));
//! device.push_frame(mic, 1000, AudioBuffer::new(vec![1000; 80]))?;
//!
//! let (mut capture, handle) = CaptureResource::builder("mic-in", mic)
//!     .device(device)
//!     .build()?;
//! handle.try_set_gain(Gain::from_f32(0.5))?;
//!
//! match capture.process_tick(true, 80, 8000)? {
//!     TickOutcome::Produced(frame) => assert_eq!(frame.samples()[0], 500),
//!     TickOutcome::Disabled => unreachable!(),
//! }
//! # Ok::<(), sipx_media_core::MediaError>(())
//! ```

pub mod capture;
pub mod config;
pub mod device;
pub mod error;
pub mod processing;
pub mod types;

pub use capture::{
    CaptureControl, CaptureDriver, CaptureHandle, CaptureResource, CaptureResourceBuilder,
    CaptureStats, FrameClock, SyncedFetch, TickOutcome,
};
pub use config::{frame_interval_ms, CaptureConfig};
pub use device::{FetchStatus, FrameFetch, InputDeviceBuffer, RingDeviceBuffer};
pub use error::{MediaError, Result};
pub use processing::{apply_gain, Gain, GainStage, Resampler, GAIN_FRAC_LENGTH};
pub use types::{AudioBuffer, DeviceId, FrameTime};

/// Version information for the media library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Audio capture resource
//!
//! Pulls one frame per tick from an input device buffer and hands it to the
//! flowgraph at the flowgraph's sample rate, with gain applied.

use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::control::{control_channel, CaptureControl, CaptureHandle};
use super::frame_clock::FrameClock;
use super::stats::CaptureStats;
use crate::config::{validate_frame_shape, CaptureConfig};
use crate::device::{FetchStatus, InputDeviceBuffer};
use crate::error::{MediaError, Result};
use crate::processing::{Gain, GainStage, Resampler};
use crate::types::{AudioBuffer, DeviceId};

/// Result of a successful tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Resource disabled, nothing produced
    Disabled,
    /// One frame at the flowgraph rate
    Produced(AudioBuffer),
}

/// Builder for [`CaptureResource`]
pub struct CaptureResourceBuilder {
    name: String,
    device_id: DeviceId,
    device: Option<Arc<dyn InputDeviceBuffer>>,
    config: CaptureConfig,
}

impl CaptureResourceBuilder {
    /// Attach the device buffer to read frames from
    pub fn device(mut self, device: Arc<dyn InputDeviceBuffer>) -> Self {
        self.device = Some(device);
        self
    }

    pub fn config(mut self, config: CaptureConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the resource and the handle used to control it
    ///
    /// A resource built without a device buffer fails its first tick.
    pub fn build(self) -> Result<(CaptureResource, CaptureHandle)> {
        self.config.validate()?;

        let (handle, control) =
            control_channel(self.config.control_queue_depth, self.config.control_send_timeout);
        let clock = FrameClock::new(
            self.config.samples_per_frame,
            self.config.samples_per_second,
            self.config.max_resync_steps,
        );
        let output_rate = self.config.samples_per_second;

        let resource = CaptureResource {
            name: self.name,
            device_id: self.device_id,
            device: self.device,
            config: self.config,
            clock,
            resampler: Resampler::new(output_rate, output_rate),
            gain: GainStage::new(),
            enabled: true,
            control,
            failure: None,
            stats: CaptureStats::default(),
        };

        info!(
            resource = %resource.name,
            device_id = %resource.device_id,
            "Created capture resource"
        );
        Ok((resource, handle))
    }
}

/// Capture resource reading one input device
pub struct CaptureResource {
    name: String,
    device_id: DeviceId,
    device: Option<Arc<dyn InputDeviceBuffer>>,
    config: CaptureConfig,
    clock: FrameClock,
    resampler: Resampler,
    gain: GainStage,
    enabled: bool,
    control: mpsc::Receiver<CaptureControl>,
    failure: Option<MediaError>,
    stats: CaptureStats,
}

impl CaptureResource {
    /// Start building a resource named `name` reading `device_id`
    pub fn builder(name: impl Into<String>, device_id: DeviceId) -> CaptureResourceBuilder {
        CaptureResourceBuilder {
            name: name.into(),
            device_id,
            device: None,
            config: CaptureConfig::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn stats(&self) -> CaptureStats {
        self.stats
    }

    pub fn frame_clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn resampler(&self) -> &Resampler {
        &self.resampler
    }

    pub fn gain(&self) -> Gain {
        self.gain.gain()
    }

    /// Whether the gain scratch accumulator has been allocated
    pub fn has_gain_scratch(&self) -> bool {
        self.gain.has_scratch()
    }

    /// Enabled through control messages
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Error that stopped this resource, if any
    pub fn failure(&self) -> Option<&MediaError> {
        self.failure.as_ref()
    }

    /// Run one tick with the configured frame parameters
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let (samples_per_frame, samples_per_second) =
            (self.config.samples_per_frame, self.config.samples_per_second);
        self.process_tick(true, samples_per_frame, samples_per_second)
    }

    /// Produce one frame
    ///
    /// A latched failure is returned before anything else runs. Control
    /// messages are applied next. A disabled tick succeeds without output. A missing frame drops this tick only; an unreadable device
    /// rate or a missing device buffer fails this and every later tick.
    pub fn process_tick(
        &mut self,
        enabled: bool,
        samples_per_frame: u32,
        samples_per_second: u32,
    ) -> Result<TickOutcome> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        self.drain_control();
        self.stats.ticks += 1;

        if !enabled || !self.enabled {
            return Ok(TickOutcome::Disabled);
        }

        validate_frame_shape(samples_per_frame, samples_per_second)?;

        let Some(device) = self.device.clone() else {
            return Err(self.latch(MediaError::not_wired("input device buffer")));
        };

        self.clock.set_frame_shape(samples_per_frame, samples_per_second);
        let synced = self.clock.fetch(device.as_ref(), self.device_id);
        self.stats.forward_resync_steps += u64::from(synced.forward_steps);
        self.stats.backward_resync_steps += u64::from(synced.backward_steps);

        let buffer = match synced.fetch.status {
            FetchStatus::Success(buffer) => buffer,
            ref status => {
                self.stats.frames_dropped += 1;
                error!(
                    resource = %self.name,
                    device_id = %self.device_id,
                    frame_time = synced.frame_time,
                    frames_not_yet_played = synced.fetch.frames_not_yet_played,
                    frames_buffered_ahead = synced.fetch.frames_buffered_ahead,
                    ?status,
                    "Failed to fetch frame from input device"
                );
                return Err(MediaError::FrameUnavailable {
                    device_id: self.device_id,
                    frame_time: synced.frame_time,
                    frames_not_yet_played: synced.fetch.frames_not_yet_played,
                    frames_buffered_ahead: synced.fetch.frames_buffered_ahead,
                });
            }
        };

        let Some(device_rate) = device.device_sample_rate(self.device_id) else {
            let device_name = device
                .device_name(self.device_id)
                .unwrap_or_else(|| "Unknown device".to_string());
            error!(
                resource = %self.name,
                device_id = %self.device_id,
                device = %device_name,
                "Couldn't get device sample rate"
            );
            self.stats.frames_dropped += 1;
            return Err(self.latch(MediaError::device_rate_unavailable(self.device_id, device_name)));
        };

        if self.resampler.configure(device_rate, samples_per_second) {
            self.stats.resampler_reconfigurations += 1;
            debug!(
                resource = %self.name,
                input_rate = device_rate,
                output_rate = samples_per_second,
                "Resampler reconfigured"
            );
        }

        let mut buffer = match self.resampler.resample(buffer) {
            Ok(buffer) => buffer,
            Err(err) => {
                self.stats.frames_dropped += 1;
                warn!(resource = %self.name, error = %err, "Resampling failed");
                return Err(err);
            }
        };

        self.gain.apply(&mut buffer, samples_per_frame as usize);

        self.stats.frames_delivered += 1;
        Ok(TickOutcome::Produced(buffer))
    }

    fn drain_control(&mut self) {
        while let Ok(message) = self.control.try_recv() {
            match message {
                CaptureControl::SetGain(gain) => self.gain.set_gain(gain),
                CaptureControl::Enable => {
                    if !self.enabled {
                        debug!(resource = %self.name, "Enabled");
                    }
                    self.enabled = true;
                }
                CaptureControl::Disable => {
                    if self.enabled {
                        debug!(resource = %self.name, "Disabled");
                    }
                    self.enabled = false;
                }
            }
        }
    }

    fn latch(&mut self, failure: MediaError) -> MediaError {
        error!(resource = %self.name, error = %failure, "Capture resource failed");
        self.failure = Some(failure.clone());
        failure
    }
}

impl fmt::Debug for CaptureResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureResource")
            .field("name", &self.name)
            .field("device_id", &self.device_id)
            .field("enabled", &self.enabled)
            .field("gain", &self.gain.gain())
            .field("clock", &self.clock)
            .field("failure", &self.failure)
            .finish()
    }
}

//! Device frame clock
//!
//! Tracks which device clock time a capture resource asks for next. The
//! clock starts at the device's current time, then advances by exactly one
//! frame interval per tick, whether or not the tick found a frame. When the device buffer has no frame at the
//! requested time, the clock walks forward (the request is behind the
//! buffered frames) or backward (the request is past them) one interval at a
//! time until a frame is found or the fill state stops pointing that way.

use tracing::debug;

use crate::config::frame_interval_ms;
use crate::device::{FrameFetch, InputDeviceBuffer};
use crate::types::{DeviceId, FrameTime};

/// Outcome of one synchronized fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedFetch {
    /// Time of the last request made
    pub frame_time: FrameTime,
    /// Answer to that request
    pub fetch: FrameFetch,
    /// Intervals walked forward
    pub forward_steps: u32,
    /// Intervals walked backward
    pub backward_steps: u32,
}

/// Logical frame clock of one capture resource
#[derive(Debug, Clone)]
pub struct FrameClock {
    previous_frame_time: Option<FrameTime>,
    frame_interval: u64,
    max_resync_steps: u32,
}

impl FrameClock {
    /// Create an uninitialized clock
    pub fn new(samples_per_frame: u32, samples_per_second: u32, max_resync_steps: u32) -> Self {
        Self {
            previous_frame_time: None,
            frame_interval: frame_interval_ms(samples_per_frame, samples_per_second),
            max_resync_steps,
        }
    }

    /// Recompute the frame interval for new frame parameters
    pub fn set_frame_shape(&mut self, samples_per_frame: u32, samples_per_second: u32) {
        self.frame_interval = frame_interval_ms(samples_per_frame, samples_per_second);
    }

    /// Frame interval in milliseconds
    pub fn frame_interval(&self) -> u64 {
        self.frame_interval
    }

    pub fn is_initialized(&self) -> bool {
        self.previous_frame_time.is_some()
    }

    /// Baseline the next tick advances from
    pub fn previous_frame_time(&self) -> Option<FrameTime> {
        self.previous_frame_time
    }

    /// Forget the cadence; the next fetch starts from the device's current time
    pub fn reset(&mut self) {
        self.previous_frame_time = None;
    }

    /// Time to request on this tick
    pub fn next_fetch_time<D>(&self, device: &D, device_id: DeviceId) -> FrameTime
    where
        D: InputDeviceBuffer + ?Sized,
    {
        match self.previous_frame_time {
            Some(previous) => previous + self.frame_interval,
            None => device.current_frame_time(device_id),
        }
    }

    /// Resolve the answer to the request for `requested_time`
    ///
    /// Walks in at most one direction, each walk bounded by the configured
    /// step limit. The last time asked for becomes the new baseline, found
    /// or not. A clock whose first fetch fails stays uninitialized.
    pub fn on_fetch_result<D>(
        &mut self,
        device: &D,
        device_id: DeviceId,
        requested_time: FrameTime,
        fetch: FrameFetch,
    ) -> SyncedFetch
    where
        D: InputDeviceBuffer + ?Sized,
    {
        let mut synced = SyncedFetch {
            frame_time: requested_time,
            fetch,
            forward_steps: 0,
            backward_steps: 0,
        };

        if synced.fetch.is_behind() {
            while synced.fetch.is_behind() && synced.forward_steps < self.max_resync_steps {
                synced.frame_time += self.frame_interval;
                synced.forward_steps += 1;
                debug!(
                    %device_id,
                    frame_time = synced.frame_time,
                    frames_not_yet_played = synced.fetch.frames_not_yet_played,
                    "Resync forward"
                );
                synced.fetch = device.get_frame(device_id, synced.frame_time);
            }
        } else if synced.fetch.is_ahead() {
            while synced.fetch.is_ahead() && synced.backward_steps < self.max_resync_steps {
                let Some(earlier) = synced.frame_time.checked_sub(self.frame_interval) else {
                    break;
                };
                synced.frame_time = earlier;
                synced.backward_steps += 1;
                debug!(
                    %device_id,
                    frame_time = synced.frame_time,
                    frames_buffered_ahead = synced.fetch.frames_buffered_ahead,
                    "Resync backward"
                );
                synced.fetch = device.get_frame(device_id, synced.frame_time);
            }
        }

        if synced.fetch.is_success() || self.previous_frame_time.is_some() {
            self.previous_frame_time = Some(synced.frame_time);
        }

        synced
    }

    /// Request the next frame and resynchronize if it is missing
    pub fn fetch<D>(&mut self, device: &D, device_id: DeviceId) -> SyncedFetch
    where
        D: InputDeviceBuffer + ?Sized,
    {
        let requested_time = self.next_fetch_time(device, device_id);
        let fetch = device.get_frame(device_id, requested_time);
        self.on_fetch_result(device, device_id, requested_time, fetch)
    }
}

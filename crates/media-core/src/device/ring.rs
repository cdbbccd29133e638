//! In-memory device buffer
//!
//! Keeps the most recent frames of each registered device in time order.
//! Used by soft devices (file or network sources, tests) and as the reference
//! implementation of [`InputDeviceBuffer`].

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, trace};

use super::{FrameFetch, InputDeviceBuffer};
use crate::error::{MediaError, Result};
use crate::types::{AudioBuffer, DeviceId, FrameTime};

/// Default number of frames retained per device
pub const DEFAULT_HISTORY_FRAMES: usize = 20;

struct DeviceRing {
    name: String,
    sample_rate: Option<u32>,
    /// Ascending by frame time, no duplicate times
    frames: VecDeque<(FrameTime, AudioBuffer)>,
}

impl DeviceRing {
    fn lookup(&self, frame_time: FrameTime) -> FrameFetch {
        let newer_start = self.frames.partition_point(|(time, _)| *time <= frame_time);

        if newer_start > 0 {
            let (time, buffer) = &self.frames[newer_start - 1];
            if *time == frame_time {
                return FrameFetch::found(buffer.clone());
            }
        }

        let older = newer_start;
        let newer = self.frames.len() - newer_start;
        FrameFetch::not_found(count(newer), count(older))
    }
}

fn count(frames: usize) -> u32 {
    u32::try_from(frames).unwrap_or(u32::MAX)
}

/// Thread-safe frame store for any number of devices
pub struct RingDeviceBuffer {
    devices: Mutex<HashMap<DeviceId, DeviceRing>>,
    history: usize,
}

impl RingDeviceBuffer {
    /// Create a buffer retaining `history` frames per device
    pub fn new(history: usize) -> Self {
        Self {
            devices: Mutex::new(HashMap::new()),
            history: history.max(1),
        }
    }

    /// Register a device; an existing device with the same id is replaced
    pub fn add_device(&self, device_id: DeviceId, name: impl Into<String>, sample_rate: Option<u32>) {
        let name = name.into();
        debug!(%device_id, %name, ?sample_rate, "Registering input device");
        self.devices.lock().insert(
            device_id,
            DeviceRing {
                name,
                sample_rate,
                frames: VecDeque::with_capacity(self.history),
            },
        );
    }

    /// Unregister a device, dropping its frames
    pub fn remove_device(&self, device_id: DeviceId) -> bool {
        self.devices.lock().remove(&device_id).is_some()
    }

    /// Change the reported sample rate of a device (`None` = unknown)
    pub fn set_sample_rate(&self, device_id: DeviceId, sample_rate: Option<u32>) -> Result<()> {
        let mut devices = self.devices.lock();
        let device = devices
            .get_mut(&device_id)
            .ok_or(MediaError::UnknownDevice { device_id })?;
        device.sample_rate = sample_rate;
        Ok(())
    }

    /// Store a frame captured at `frame_time`
    ///
    /// A frame already stored at the same time is replaced. The oldest frames
    /// are discarded once the history is full.
    pub fn push_frame(&self, device_id: DeviceId, frame_time: FrameTime, buffer: AudioBuffer) -> Result<()> {
        let mut devices = self.devices.lock();
        let device = devices
            .get_mut(&device_id)
            .ok_or(MediaError::UnknownDevice { device_id })?;

        let position = device.frames.partition_point(|(time, _)| *time < frame_time);
        match device.frames.get_mut(position) {
            Some(slot) if slot.0 == frame_time => slot.1 = buffer,
            _ => device.frames.insert(position, (frame_time, buffer)),
        }

        while device.frames.len() > self.history {
            device.frames.pop_front();
        }

        trace!(%device_id, frame_time, buffered = device.frames.len(), "Frame pushed");
        Ok(())
    }

    /// Number of frames currently held for a device
    pub fn frame_count(&self, device_id: DeviceId) -> usize {
        self.devices
            .lock()
            .get(&device_id)
            .map_or(0, |device| device.frames.len())
    }

    pub fn device_count(&self) -> usize {
        self.devices.lock().len()
    }

    /// Drop every buffered frame of a device
    pub fn clear_frames(&self, device_id: DeviceId) {
        if let Some(device) = self.devices.lock().get_mut(&device_id) {
            device.frames.clear();
        }
    }
}

impl Default for RingDeviceBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_FRAMES)
    }
}

impl InputDeviceBuffer for RingDeviceBuffer {
    fn current_frame_time(&self, device_id: DeviceId) -> FrameTime {
        self.devices
            .lock()
            .get(&device_id)
            .and_then(|device| device.frames.back().map(|(time, _)| *time))
            .unwrap_or(0)
    }

    fn get_frame(&self, device_id: DeviceId, frame_time: FrameTime) -> FrameFetch {
        match self.devices.lock().get(&device_id) {
            Some(device) => device.lookup(frame_time),
            None => FrameFetch::error(),
        }
    }

    fn device_sample_rate(&self, device_id: DeviceId) -> Option<u32> {
        self.devices.lock().get(&device_id).and_then(|device| device.sample_rate)
    }

    fn device_name(&self, device_id: DeviceId) -> Option<String> {
        self.devices.lock().get(&device_id).map(|device| device.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::FetchStatus;

    const MIC: DeviceId = DeviceId(1);

    fn ring_with_frames(times: &[FrameTime]) -> RingDeviceBuffer {
        let ring = RingDeviceBuffer::new(8);
        ring.add_device(MIC, "test mic", Some(8000));
        for &time in times {
            ring.push_frame(MIC, time, AudioBuffer::new(vec![time as i16; 4])).unwrap();
        }
        ring
    }

    #[test]
    fn test_exact_hit() {
        let ring = ring_with_frames(&[1000, 1010, 1020]);
        let fetch = ring.get_frame(MIC, 1010);
        assert_eq!(fetch.status, FetchStatus::Success(AudioBuffer::new(vec![1010; 4])));
        assert_eq!(ring.current_frame_time(MIC), 1020);
    }

    #[test]
    fn test_miss_counts() {
        let ring = ring_with_frames(&[1000, 1010, 1020]);

        // Older than everything buffered
        assert_eq!(ring.get_frame(MIC, 990), FrameFetch::not_found(3, 0));
        // Newer than everything buffered
        assert_eq!(ring.get_frame(MIC, 1030), FrameFetch::not_found(0, 3));
        // Between two frames
        assert_eq!(ring.get_frame(MIC, 1005), FrameFetch::not_found(2, 1));
    }

    #[test]
    fn test_history_is_bounded() {
        let ring = ring_with_frames(&(0..12).map(|i| i * 10).collect::<Vec<_>>());
        assert_eq!(ring.frame_count(MIC), 8);
        assert!(!ring.get_frame(MIC, 30).is_success());
        assert!(ring.get_frame(MIC, 40).is_success());
    }

    #[test]
    fn test_out_of_order_push_keeps_time_order() {
        let ring = ring_with_frames(&[1020, 1000, 1010, 1010]);
        assert_eq!(ring.frame_count(MIC), 3);
        assert_eq!(ring.current_frame_time(MIC), 1020);
        assert!(ring.get_frame(MIC, 1000).is_success());
    }

    #[test]
    fn test_unknown_device() {
        let ring = RingDeviceBuffer::default();
        assert_eq!(ring.get_frame(DeviceId(9), 0).status, FetchStatus::Error);
        assert_eq!(ring.device_sample_rate(DeviceId(9)), None);
        assert_eq!(
            ring.push_frame(DeviceId(9), 0, AudioBuffer::silence(1)),
            Err(MediaError::UnknownDevice { device_id: DeviceId(9) })
        );
    }

    #[test]
    fn test_sample_rate_changes() {
        let ring = ring_with_frames(&[]);
        ring.set_sample_rate(MIC, Some(16000)).unwrap();
        assert_eq!(ring.device_sample_rate(MIC), Some(16000));
        ring.set_sample_rate(MIC, None).unwrap();
        assert_eq!(ring.device_sample_rate(MIC), None);
        assert_eq!(ring.device_name(MIC).as_deref(), Some("test mic"));
    }
}

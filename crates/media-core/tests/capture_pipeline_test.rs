//! Capture pipeline integration tests
//!
//! Drives capture resources against scripted and ring device buffers and
//! checks frame clock cadence, resync direction, zero-copy passthrough and
//! gain handling across many ticks.

use parking_lot::Mutex;
use std::sync::Arc;

use sipx_media_core::{
    AudioBuffer, CaptureConfig, CaptureResource, DeviceId, FrameClock, FrameFetch, FrameTime,
    Gain, InputDeviceBuffer, MediaError, RingDeviceBuffer, TickOutcome,
};

const MIC: DeviceId = DeviceId(1);

/// Device buffer answering every request through a closure and recording
/// the requested times
struct ScriptedDevice<F> {
    current: FrameTime,
    sample_rate: Option<u32>,
    respond: F,
    requests: Mutex<Vec<FrameTime>>,
}

impl<F> ScriptedDevice<F>
where
    F: Fn(FrameTime) -> FrameFetch + Send + Sync,
{
    fn new(current: FrameTime, respond: F) -> Self {
        Self {
            current,
            sample_rate: Some(8000),
            respond,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<FrameTime> {
        self.requests.lock().clone()
    }
}

impl<F> InputDeviceBuffer for ScriptedDevice<F>
where
    F: Fn(FrameTime) -> FrameFetch + Send + Sync,
{
    fn current_frame_time(&self, _device_id: DeviceId) -> FrameTime {
        self.current
    }

    fn get_frame(&self, _device_id: DeviceId, frame_time: FrameTime) -> FrameFetch {
        self.requests.lock().push(frame_time);
        (self.respond)(frame_time)
    }

    fn device_sample_rate(&self, _device_id: DeviceId) -> Option<u32> {
        self.sample_rate
    }

    fn device_name(&self, _device_id: DeviceId) -> Option<String> {
        Some("scripted".to_string())
    }
}

fn ring_device(rate: u32) -> Arc<RingDeviceBuffer> {
    let device = Arc::new(RingDeviceBuffer::new(512));
    device.add_device(MIC, "ring mic", Some(rate));
    device
}

fn produced(outcome: Result<TickOutcome, MediaError>) -> AudioBuffer {
    match outcome {
        Ok(TickOutcome::Produced(buffer)) => buffer,
        other => panic!("expected a produced frame, got {:?}", other),
    }
}

#[cfg(test)]
mod frame_clock_tests {
    use super::*;

    #[test]
    fn test_first_fetch_then_one_interval() {
        let device = ScriptedDevice::new(1000, |_| FrameFetch::found(AudioBuffer::silence(80)));
        let mut clock = FrameClock::new(80, 8000, 64);

        assert_eq!(clock.frame_interval(), 10);
        assert_eq!(clock.next_fetch_time(&device, MIC), 1000);
        assert!(clock.fetch(&device, MIC).fetch.is_success());
        assert_eq!(clock.next_fetch_time(&device, MIC), 1010);
    }

    #[test]
    fn test_forward_only_when_behind() {
        let device = ScriptedDevice::new(1000, |_| FrameFetch::not_found(5, 0));
        let mut clock = FrameClock::new(80, 8000, 16);

        let synced = clock.fetch(&device, MIC);
        assert!(!synced.fetch.is_success());
        assert_eq!(synced.forward_steps, 16);
        assert_eq!(synced.backward_steps, 0);

        let requests = device.requests();
        assert_eq!(requests.len(), 17);
        assert!(requests.windows(2).all(|pair| pair[1] == pair[0] + 10));
    }

    #[test]
    fn test_backward_only_when_ahead() {
        let device = ScriptedDevice::new(1000, |_| FrameFetch::not_found(0, 5));
        let mut clock = FrameClock::new(80, 8000, 16);

        let synced = clock.fetch(&device, MIC);
        assert_eq!(synced.forward_steps, 0);
        assert_eq!(synced.backward_steps, 16);

        let requests = device.requests();
        assert!(requests.windows(2).all(|pair| pair[1] + 10 == pair[0]));
    }

    #[test]
    fn test_backward_walk_stops_at_time_zero() {
        let device = ScriptedDevice::new(20, |_| FrameFetch::not_found(0, 5));
        let mut clock = FrameClock::new(80, 8000, 64);

        let synced = clock.fetch(&device, MIC);
        assert_eq!(device.requests(), vec![20, 10, 0]);
        assert_eq!(synced.backward_steps, 2);
    }

    #[test]
    fn test_no_resync_without_direction() {
        for (not_yet_played, buffered_ahead) in [(0, 0), (3, 4)] {
            let device = ScriptedDevice::new(1000, move |_| {
                FrameFetch::not_found(not_yet_played, buffered_ahead)
            });
            let mut clock = FrameClock::new(80, 8000, 64);

            let synced = clock.fetch(&device, MIC);
            assert!(!synced.fetch.is_success());
            assert_eq!(device.requests(), vec![1000]);
            assert!(!clock.is_initialized());
        }
    }

    #[test]
    fn test_walk_stops_when_direction_flips() {
        // Behind until 1030, then past the buffered frames: the forward walk
        // stops and no backward walk follows
        let device = ScriptedDevice::new(1000, |time| {
            if time < 1030 {
                FrameFetch::not_found(2, 0)
            } else {
                FrameFetch::not_found(0, 2)
            }
        });
        let mut clock = FrameClock::new(80, 8000, 64);

        let synced = clock.fetch(&device, MIC);
        assert_eq!(device.requests(), vec![1000, 1010, 1020, 1030]);
        assert_eq!((synced.forward_steps, synced.backward_steps), (3, 0));
    }
}

#[cfg(test)]
mod capture_resource_tests {
    use super::*;

    #[test]
    fn test_no_drift_over_many_ticks() {
        let device = ring_device(8000);
        for index in 0..=200u64 {
            device
                .push_frame(MIC, 1000 + index * 10, AudioBuffer::silence(80))
                .unwrap();
        }
        // Start the clock at the oldest frame
        let start = ScriptedDevice::new(1000, |_| FrameFetch::found(AudioBuffer::silence(80)));
        let mut clock = FrameClock::new(80, 8000, 64);
        clock.fetch(&start, MIC);

        for _ in 0..200 {
            assert!(clock.fetch(device.as_ref(), MIC).fetch.is_success());
        }
        assert_eq!(clock.previous_frame_time(), Some(1000 + 200 * 10));
    }

    #[test]
    fn test_resync_moves_baseline_by_one_interval_per_tick() {
        let device = ring_device(8000);
        device.push_frame(MIC, 1000, AudioBuffer::silence(80)).unwrap();

        let (mut resource, _handle) = CaptureResource::builder("mic-in", MIC)
            .device(device.clone())
            .build()
            .unwrap();
        produced(resource.process_tick(true, 80, 8000));
        assert_eq!(resource.frame_clock().previous_frame_time(), Some(1000));

        // The device dropped its backlog and skipped ahead by 40ms
        device.clear_frames(MIC);
        for time in [1050, 1060, 1070] {
            device.push_frame(MIC, time, AudioBuffer::silence(80)).unwrap();
        }
        produced(resource.process_tick(true, 80, 8000));
        assert_eq!(resource.frame_clock().previous_frame_time(), Some(1050));
        assert_eq!(resource.stats().forward_resync_steps, 4);

        produced(resource.process_tick(true, 80, 8000));
        assert_eq!(resource.frame_clock().previous_frame_time(), Some(1060));
        assert_eq!(resource.stats().forward_resync_steps, 4);
    }

    #[test]
    fn test_passthrough_frame_is_not_copied() {
        let device = ring_device(8000);
        let frame = AudioBuffer::new((0..80).collect());
        device.push_frame(MIC, 1000, frame.clone()).unwrap();

        let (mut resource, _handle) = CaptureResource::builder("mic-in", MIC)
            .device(device)
            .build()
            .unwrap();

        let output = produced(resource.process_tick(true, 80, 8000));
        assert!(output.ptr_eq(&frame));
    }

    #[test]
    fn test_unity_gain_never_allocates_scratch() {
        let device = ring_device(8000);
        let (mut resource, _handle) = CaptureResource::builder("mic-in", MIC)
            .device(device.clone())
            .build()
            .unwrap();

        for index in 0..500u64 {
            device
                .push_frame(MIC, index * 10, AudioBuffer::new(vec![1234; 80]))
                .unwrap();
            let output = produced(resource.process_tick(true, 80, 8000));
            assert_eq!(output.samples()[0], 1234);
        }

        assert!(!resource.has_gain_scratch());
        assert_eq!(resource.stats().frames_delivered, 500);
    }

    #[test]
    fn test_gain_with_resampling() {
        let device = ring_device(16000);
        device
            .push_frame(MIC, 1000, AudioBuffer::new(vec![2000; 160]))
            .unwrap();

        let config = CaptureConfig::default();
        let (mut resource, handle) = CaptureResource::builder("mic-in", MIC)
            .device(device)
            .config(config)
            .build()
            .unwrap();
        handle.try_set_gain(Gain::from_f32(0.25)).unwrap();

        let output = produced(resource.tick());
        assert_eq!(output.len(), 80);
        assert!(output.samples().iter().all(|&sample| sample == 500));
        assert!(resource.has_gain_scratch());
    }

    #[test]
    fn test_scripted_error_drops_frame() {
        let device = Arc::new(ScriptedDevice::new(1000, |_| FrameFetch::error()));
        let (mut resource, _handle) = CaptureResource::builder("mic-in", MIC)
            .device(device.clone())
            .build()
            .unwrap();

        let err = resource.process_tick(true, 80, 8000).unwrap_err();
        assert_eq!(
            err,
            MediaError::FrameUnavailable {
                device_id: MIC,
                frame_time: 1000,
                frames_not_yet_played: 0,
                frames_buffered_ahead: 0,
            }
        );
        assert!(err.is_transient());
        assert_eq!(device.requests(), vec![1000]);
    }

    #[test]
    fn test_invalid_config_is_rejected_at_build() {
        let config = CaptureConfig::default().with_control_queue_depth(0);
        let result = CaptureResource::builder("mic-in", MIC).config(config).build();
        assert!(matches!(result, Err(MediaError::InvalidConfig { .. })));
    }
}

#[cfg(test)]
mod recovery_tests {
    use super::*;

    fn live_device(history: usize) -> Arc<RingDeviceBuffer> {
        let device = Arc::new(RingDeviceBuffer::new(history));
        device.add_device(MIC, "live mic", Some(8000));
        device
    }

    fn capture(device: &Arc<RingDeviceBuffer>) -> CaptureResource {
        let (resource, _handle) = CaptureResource::builder("mic-in", MIC)
            .device(device.clone())
            .build()
            .unwrap();
        resource
    }

    #[test]
    fn test_lost_frame_drops_a_single_tick() {
        let device = live_device(20);
        let mut resource = capture(&device);

        // One frame arrives per tick; the device never delivers 1020
        for index in 0..60u64 {
            let time = 1000 + index * 10;
            if time != 1020 {
                device
                    .push_frame(MIC, time, AudioBuffer::new(vec![index as i16; 80]))
                    .unwrap();
            }
            let _ = resource.process_tick(true, 80, 8000);
        }

        assert_eq!(resource.stats().frames_dropped, 1);
        assert_eq!(resource.stats().frames_delivered, 59);
        assert_eq!(resource.stats().backward_resync_steps, 1);
        // One interval behind the newest device frame, not a whole history
        assert_eq!(resource.frame_clock().previous_frame_time(), Some(1580));
    }

    #[test]
    fn test_cadence_continues_past_a_hole() {
        let device = live_device(20);
        for time in [1000, 1010, 1030, 1040] {
            device.push_frame(MIC, time, AudioBuffer::silence(80)).unwrap();
        }

        let start = ScriptedDevice::new(1000, |_| FrameFetch::found(AudioBuffer::silence(80)));
        let mut clock = FrameClock::new(80, 8000, 64);
        clock.fetch(&start, MIC);

        assert!(clock.fetch(device.as_ref(), MIC).fetch.is_success());
        let missing = clock.fetch(device.as_ref(), MIC);
        assert!(!missing.fetch.is_success());
        assert_eq!(missing.frame_time, 1020);
        assert_eq!(clock.previous_frame_time(), Some(1020));

        let next = clock.fetch(device.as_ref(), MIC);
        assert!(next.fetch.is_success());
        assert_eq!(next.frame_time, 1030);
    }

    #[test]
    fn test_device_clock_jumps_are_absorbed() {
        let device = live_device(20);
        let mut resource = capture(&device);

        for time in (1000..1100).step_by(10) {
            device.push_frame(MIC, time, AudioBuffer::silence(80)).unwrap();
            produced(resource.process_tick(true, 80, 8000));
        }
        assert_eq!(resource.frame_clock().previous_frame_time(), Some(1090));

        // Device restarts 400ms ahead
        device.clear_frames(MIC);
        for time in (1500..1600).step_by(10) {
            device.push_frame(MIC, time, AudioBuffer::silence(80)).unwrap();
            produced(resource.process_tick(true, 80, 8000));
        }
        assert_eq!(resource.stats().forward_resync_steps, 40);
        assert_eq!(resource.frame_clock().previous_frame_time(), Some(1590));

        // Device restarts 300ms behind
        device.clear_frames(MIC);
        for time in (1300..1400).step_by(10) {
            device.push_frame(MIC, time, AudioBuffer::silence(80)).unwrap();
            produced(resource.process_tick(true, 80, 8000));
        }
        assert_eq!(resource.stats().backward_resync_steps, 30);
        assert_eq!(resource.frame_clock().previous_frame_time(), Some(1390));

        assert_eq!(resource.stats().frames_dropped, 0);
        assert_eq!(resource.stats().frames_delivered, 30);
    }
}

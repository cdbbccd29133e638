//! Capture driver integration tests
//!
//! Runs capture resources on the tokio driver against a ring device buffer
//! fed by a simulated device task.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};

use sipx_media_core::{
    AudioBuffer, CaptureDriver, CaptureResource, DeviceId, Gain, RingDeviceBuffer,
};

const MIC: DeviceId = DeviceId(2);

/// Push a frame every 5ms, twice as fast as the 10ms frame clock
fn spawn_device(device: Arc<RingDeviceBuffer>, level: i16) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut frame_time = 0;
        loop {
            if device
                .push_frame(MIC, frame_time, AudioBuffer::new(vec![level; 80]))
                .is_err()
            {
                break;
            }
            frame_time += 10;
            sleep(Duration::from_millis(5)).await;
        }
    })
}

#[tokio::test]
async fn test_driver_delivers_frames_and_applies_gain() {
    let device = Arc::new(RingDeviceBuffer::new(4096));
    device.add_device(MIC, "live mic", Some(8000));
    let producer = spawn_device(device.clone(), 1000);
    sleep(Duration::from_millis(20)).await;

    let (resource, handle) = CaptureResource::builder("mic-in", MIC)
        .device(device.clone())
        .build()
        .unwrap();
    let (frames_tx, mut frames_rx) = mpsc::channel(64);
    let driver = CaptureDriver::spawn(resource, frames_tx);

    let first = timeout(Duration::from_secs(2), frames_rx.recv())
        .await
        .expect("no frame within 2s")
        .expect("driver closed the frame channel");
    assert_eq!(first.len(), 80);
    assert_eq!(first.samples()[0], 1000);

    handle.set_gain(Gain::MUTE).await.unwrap();

    let muted = timeout(Duration::from_secs(2), async {
        loop {
            let frame = frames_rx.recv().await.expect("frame channel closed");
            if frame.samples()[0] == 0 {
                break frame;
            }
        }
    })
    .await
    .expect("gain change never reached the frames");
    assert!(muted.samples().iter().all(|&sample| sample == 0));

    let resource = driver.stop().await.unwrap();
    producer.abort();

    assert_eq!(resource.gain(), Gain::MUTE);
    assert!(resource.has_gain_scratch());
    assert!(resource.stats().frames_delivered >= 2);
    assert!(resource.failure().is_none());
}

#[tokio::test]
async fn test_driver_stops_on_fatal_failure() {
    let device = Arc::new(RingDeviceBuffer::new(16));
    device.add_device(MIC, "broken mic", None);
    device.push_frame(MIC, 0, AudioBuffer::silence(80)).unwrap();

    let (resource, handle) = CaptureResource::builder("mic-in", MIC)
        .device(device)
        .build()
        .unwrap();
    let (frames_tx, mut frames_rx) = mpsc::channel(8);
    let driver = CaptureDriver::spawn(resource, frames_tx);

    timeout(Duration::from_secs(2), async {
        while !driver.is_finished() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("driver kept running after a fatal error");

    let resource = driver.stop().await.unwrap();
    assert!(resource.failure().map_or(false, |err| err.is_fatal()));
    assert!(frames_rx.try_recv().is_err());

    drop(resource);
    assert!(handle.is_closed());
}

#[tokio::test]
async fn test_driver_stops_when_consumer_goes_away() {
    let device = Arc::new(RingDeviceBuffer::new(16));
    device.add_device(MIC, "mic", Some(8000));
    device.push_frame(MIC, 0, AudioBuffer::silence(80)).unwrap();

    let (resource, _handle) = CaptureResource::builder("mic-in", MIC)
        .device(device)
        .build()
        .unwrap();
    let (frames_tx, frames_rx) = mpsc::channel(8);
    drop(frames_rx);
    let driver = CaptureDriver::spawn(resource, frames_tx);

    timeout(Duration::from_secs(2), async {
        while !driver.is_finished() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("driver kept running without a consumer");

    let resource = driver.stop().await.unwrap();
    assert_eq!(resource.stats().frames_delivered, 1);
}

#[tokio::test]
async fn test_stop_running_driver() {
    let device = Arc::new(RingDeviceBuffer::new(16));
    device.add_device(MIC, "idle mic", Some(8000));

    let (resource, handle) = CaptureResource::builder("mic-in", MIC)
        .device(device)
        .build()
        .unwrap();
    let (frames_tx, _frames_rx) = mpsc::channel(8);
    let driver = CaptureDriver::spawn(resource, frames_tx);

    handle.disable().await.unwrap();
    sleep(Duration::from_millis(30)).await;
    assert!(!driver.is_finished());

    let resource = driver.stop().await.unwrap();
    assert!(!resource.is_enabled());
    assert!(resource.stats().ticks > 0);
}

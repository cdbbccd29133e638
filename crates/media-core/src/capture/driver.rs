//! Periodic capture driver
//!
//! Runs a [`CaptureResource`] on a tokio task, one tick per frame interval,
//! and forwards produced frames to a consumer channel.

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::resource::{CaptureResource, TickOutcome};
use crate::error::{MediaError, Result};
use crate::types::AudioBuffer;

/// Handle to a running capture task
pub struct CaptureDriver {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<CaptureResource>,
}

impl CaptureDriver {
    /// Start ticking `resource`, sending frames to `output`
    ///
    /// The task ends when [`stop`](Self::stop) is called, when `output` is
    /// closed, or when the resource fails fatally. A full `output` drops the
    /// frame rather than delaying the next tick.
    pub fn spawn(resource: CaptureResource, output: mpsc::Sender<AudioBuffer>) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(resource, output, shutdown_rx));
        Self { shutdown, task }
    }

    /// Whether the task has ended
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the task and get the resource back
    pub async fn stop(self) -> Result<CaptureResource> {
        // The task may already be gone; the join below reports how it ended
        let _ = self.shutdown.send(true);
        self.task.await.map_err(|err| MediaError::DriverStopped {
            details: err.to_string(),
        })
    }
}

async fn run(
    mut resource: CaptureResource,
    output: mpsc::Sender<AudioBuffer>,
    mut shutdown: watch::Receiver<bool>,
) -> CaptureResource {
    let period = Duration::from_millis(resource.config().frame_interval_ms().max(1));
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(resource = %resource.name(), ?period, "Capture driver started");

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                match resource.tick() {
                    Ok(TickOutcome::Produced(buffer)) => match output.try_send(buffer) {
                        Ok(()) => {}
                        Err(mpsc::error::TrySendError::Full(_)) => {
                            warn!(resource = %resource.name(), "Consumer is not keeping up, frame dropped");
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => {
                            debug!(resource = %resource.name(), "Consumer gone");
                            break;
                        }
                    },
                    Ok(TickOutcome::Disabled) => {}
                    Err(err) if err.is_fatal() => {
                        error!(resource = %resource.name(), error = %err, "Stopping capture driver");
                        break;
                    }
                    Err(err) => {
                        debug!(resource = %resource.name(), error = %err, "Tick failed");
                    }
                }
            }
        }
    }

    info!(
        resource = %resource.name(),
        stats = ?resource.stats(),
        "Capture driver stopped"
    );
    resource
}

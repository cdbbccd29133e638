//! Control messages for a capture resource
//!
//! Messages are posted from any task or thread and applied by the processing
//! thread itself at the start of its next tick, so the resource state they
//! touch is never shared.

use std::time::Duration;
use tokio::sync::mpsc::{self, error::SendTimeoutError, error::TrySendError};
use tracing::trace;

use crate::error::{MediaError, Result};
use crate::processing::Gain;

/// Closed set of control messages understood by a capture resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureControl {
    /// Replace the gain applied to every produced frame
    SetGain(Gain),
    /// Resume producing frames
    Enable,
    /// Stop producing frames; ticks succeed without output
    Disable,
}

/// Cloneable sender side of a capture resource's control queue
#[derive(Debug, Clone)]
pub struct CaptureHandle {
    sender: mpsc::Sender<CaptureControl>,
    send_timeout: Duration,
}

impl CaptureHandle {
    pub(crate) fn new(sender: mpsc::Sender<CaptureControl>, send_timeout: Duration) -> Self {
        Self {
            sender,
            send_timeout,
        }
    }

    /// Post a message, waiting up to the send timeout for queue space
    pub async fn send(&self, message: CaptureControl) -> Result<()> {
        trace!(?message, "Posting capture control message");
        self.sender
            .send_timeout(message, self.send_timeout)
            .await
            .map_err(|err| match err {
                SendTimeoutError::Timeout(_) => MediaError::ControlQueueTimeout {
                    timeout: self.send_timeout,
                },
                SendTimeoutError::Closed(_) => MediaError::ControlQueueClosed,
            })
    }

    /// Post a message without waiting
    pub fn try_send(&self, message: CaptureControl) -> Result<()> {
        self.sender.try_send(message).map_err(|err| match err {
            TrySendError::Full(_) => MediaError::ControlQueueFull,
            TrySendError::Closed(_) => MediaError::ControlQueueClosed,
        })
    }

    /// Change the gain from the next tick on
    pub async fn set_gain(&self, gain: Gain) -> Result<()> {
        self.send(CaptureControl::SetGain(gain)).await
    }

    /// Non-blocking [`set_gain`](Self::set_gain) for synchronous callers
    pub fn try_set_gain(&self, gain: Gain) -> Result<()> {
        self.try_send(CaptureControl::SetGain(gain))
    }

    pub async fn enable(&self) -> Result<()> {
        self.send(CaptureControl::Enable).await
    }

    pub async fn disable(&self) -> Result<()> {
        self.send(CaptureControl::Disable).await
    }

    /// Whether the resource has been dropped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Create a control queue of the given depth
pub(crate) fn control_channel(
    depth: usize,
    send_timeout: Duration,
) -> (CaptureHandle, mpsc::Receiver<CaptureControl>) {
    let (sender, receiver) = mpsc::channel(depth.max(1));
    (CaptureHandle::new(sender, send_timeout), receiver)
}

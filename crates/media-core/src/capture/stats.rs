//! Capture counters

use serde::{Deserialize, Serialize};

/// Running counters of a capture resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureStats {
    /// Ticks processed, disabled ones included
    pub ticks: u64,
    /// Frames handed to the flowgraph
    pub frames_delivered: u64,
    /// Enabled ticks that produced no frame
    pub frames_dropped: u64,
    /// Frame intervals walked forward while resynchronizing
    pub forward_resync_steps: u64,
    /// Frame intervals walked backward while resynchronizing
    pub backward_resync_steps: u64,
    /// Times the resampler rates changed
    pub resampler_reconfigurations: u64,
}

//! Audio capture from input devices
//!
//! - [`frame_clock`]: which device time to fetch each tick, with resync
//! - [`resource`]: the per-tick fetch, resample and gain pipeline
//! - [`control`]: control messages posted to a running resource
//! - [`driver`]: periodic tokio runner for a resource

pub mod control;
pub mod driver;
pub mod frame_clock;
pub mod resource;
pub mod stats;

pub use control::{CaptureControl, CaptureHandle};
pub use driver::CaptureDriver;
pub use frame_clock::{FrameClock, SyncedFetch};
pub use resource::{CaptureResource, CaptureResourceBuilder, TickOutcome};
pub use stats::CaptureStats;

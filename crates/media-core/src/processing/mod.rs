//! Per-frame sample processing
//!
//! - [`resampler`]: sample rate conversion between device and flowgraph rates
//! - [`gain`]: fixed-point gain with a persistent scratch accumulator

pub mod gain;
pub mod resampler;

pub use gain::{apply_gain, Gain, GainStage, GAIN_FRAC_LENGTH};
pub use resampler::Resampler;

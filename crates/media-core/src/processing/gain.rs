//! Fixed-point gain
//!
//! Gains are Q1.14 values: `1 << 14` is unity. Samples are multiplied into a
//! 32-bit accumulator and shifted back with saturation.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::types::AudioBuffer;

/// Fractional bits of a [`Gain`]
pub const GAIN_FRAC_LENGTH: u32 = 14;

/// Linear gain factor in Q1.14 fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Gain(i16);

impl Gain {
    /// 1.0, leaves samples untouched
    pub const UNITY: Gain = Gain(1 << GAIN_FRAC_LENGTH);
    /// Same as [`UNITY`](Self::UNITY): gain processing is skipped
    pub const PASSTHROUGH: Gain = Self::UNITY;
    /// 0.0, silences the signal
    pub const MUTE: Gain = Gain(0);

    /// Gain from a raw Q1.14 value; negative values are clamped to mute
    pub fn from_raw(raw: i16) -> Self {
        Gain(raw.max(0))
    }

    /// Gain from a linear factor, clamped to the representable range `[0, ~2)`
    pub fn from_f32(factor: f32) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return Self::MUTE;
        }
        let scaled = (factor * f32::from(Self::UNITY.0)).round();
        Gain(scaled.min(f32::from(i16::MAX)) as i16)
    }

    pub fn raw(&self) -> i16 {
        self.0
    }

    pub fn as_f32(&self) -> f32 {
        f32::from(self.0) / f32::from(Self::UNITY.0)
    }

    pub fn is_passthrough(&self) -> bool {
        *self == Self::PASSTHROUGH
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::UNITY
    }
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.as_f32())
    }
}

/// Multiply `samples` by `gain` in place using `scratch` as the accumulator
///
/// Only the first `scratch.len()` samples are scaled.
pub fn apply_gain(samples: &mut [i16], gain: Gain, scratch: &mut [i32]) {
    let factor = i32::from(gain.raw());
    for (accumulator, sample) in scratch.iter_mut().zip(samples.iter()) {
        *accumulator = i32::from(*sample) * factor;
    }

    for (sample, accumulator) in samples.iter_mut().zip(scratch.iter()) {
        let shifted = *accumulator >> GAIN_FRAC_LENGTH;
        *sample = shifted.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
    }
}

/// Gain state of one capture resource
///
/// The scratch accumulator is allocated on the first frame processed with a
/// non-unity gain, sized to the frame, and kept for the lifetime of the stage.
/// It is only replaced when a larger samples-per-frame is configured.
#[derive(Debug, Default)]
pub struct GainStage {
    gain: Gain,
    scratch: Option<Vec<i32>>,
}

impl GainStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gain(&self) -> Gain {
        self.gain
    }

    pub fn set_gain(&mut self, gain: Gain) {
        if gain != self.gain {
            debug!(old = %self.gain, new = %gain, "Gain changed");
        }
        self.gain = gain;
    }

    /// Whether the scratch accumulator has been allocated
    pub fn has_scratch(&self) -> bool {
        self.scratch.is_some()
    }

    /// Apply the current gain to `buffer`
    ///
    /// Unity gain leaves the buffer (and its sharing) untouched. Otherwise the
    /// buffer is made exclusive first, copying it if it is shared, and its
    /// first `samples_per_frame` samples are scaled.
    pub fn apply(&mut self, buffer: &mut AudioBuffer, samples_per_frame: usize) {
        if self.gain.is_passthrough() {
            return;
        }

        let scratch = self.scratch.get_or_insert_with(Vec::new);
        if scratch.len() < samples_per_frame {
            debug!(samples_per_frame, "Allocating gain scratch buffer");
            *scratch = vec![0; samples_per_frame];
        }

        let samples = buffer.make_mut();
        let count = samples.len().min(samples_per_frame);
        apply_gain(&mut samples[..count], self.gain, &mut scratch[..count]);
    }
}

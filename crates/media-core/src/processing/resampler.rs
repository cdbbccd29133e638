//! Sample rate conversion
//!
//! Linear interpolation between neighbouring input samples. Each call
//! converts one self-contained buffer; no history is carried between calls.

use tracing::trace;

use crate::error::{MediaError, Result};
use crate::types::AudioBuffer;

/// Converts buffers from the device rate to the flowgraph rate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resampler {
    input_rate: u32,
    output_rate: u32,
}

impl Resampler {
    /// Create a new resampler
    pub fn new(input_rate: u32, output_rate: u32) -> Self {
        Self {
            input_rate,
            output_rate,
        }
    }

    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    pub fn set_input_rate(&mut self, rate: u32) {
        self.input_rate = rate;
    }

    pub fn set_output_rate(&mut self, rate: u32) {
        self.output_rate = rate;
    }

    /// Update both rates, returning whether either changed
    pub fn configure(&mut self, input_rate: u32, output_rate: u32) -> bool {
        let mut changed = false;
        if self.input_rate != input_rate {
            self.set_input_rate(input_rate);
            changed = true;
        }
        if self.output_rate != output_rate {
            self.set_output_rate(output_rate);
            changed = true;
        }
        changed
    }

    /// Whether buffers pass through untouched
    pub fn is_passthrough(&self) -> bool {
        self.input_rate == self.output_rate
    }

    /// Convert a buffer from the input rate to the output rate
    ///
    /// With equal rates the same buffer is returned without copying.
    pub fn resample(&self, buffer: AudioBuffer) -> Result<AudioBuffer> {
        if self.input_rate == 0 || self.output_rate == 0 {
            return Err(MediaError::resample(
                self.input_rate,
                self.output_rate,
                "sample rate must be greater than 0",
            ));
        }

        if self.is_passthrough() {
            return Ok(buffer);
        }

        let samples = buffer.samples();
        let output_len = (samples.len() as u64 * u64::from(self.output_rate)
            / u64::from(self.input_rate)) as usize;
        let step = f64::from(self.input_rate) / f64::from(self.output_rate);

        let mut output = Vec::with_capacity(output_len);
        for index in 0..output_len {
            let position = index as f64 * step;
            let base = position.floor() as usize;
            let fraction = position - position.floor();

            let first = f64::from(samples[base.min(samples.len() - 1)]);
            let second = f64::from(samples.get(base + 1).copied().unwrap_or(samples[samples.len() - 1]));

            let interpolated = first + (second - first) * fraction;
            output.push(interpolated.round().clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16);
        }

        trace!(
            input_rate = self.input_rate,
            output_rate = self.output_rate,
            input_len = samples.len(),
            output_len,
            "Resampled buffer"
        );
        Ok(AudioBuffer::new(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_returns_same_buffer() {
        let resampler = Resampler::new(8000, 8000);
        let input = AudioBuffer::new(vec![1, 2, 3, 4]);
        let output = resampler.resample(input.clone()).unwrap();
        assert!(output.ptr_eq(&input));
    }

    #[test]
    fn test_upsampling_interpolates() {
        let resampler = Resampler::new(8000, 16000);
        let output = resampler.resample(AudioBuffer::new(vec![0, 100, 200, 300])).unwrap();
        assert_eq!(output.samples(), &[0, 50, 100, 150, 200, 250, 300, 300]);
    }

    #[test]
    fn test_downsampling_length() {
        let resampler = Resampler::new(16000, 8000);
        let input: Vec<i16> = (0..160).map(|i| i * 10).collect();
        let output = resampler.resample(AudioBuffer::new(input)).unwrap();
        assert_eq!(output.len(), 80);
        assert_eq!(output.samples()[1], 20);
    }

    #[test]
    fn test_empty_buffer() {
        let resampler = Resampler::new(44100, 8000);
        let output = resampler.resample(AudioBuffer::default()).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_zero_rate_fails() {
        let resampler = Resampler::new(0, 8000);
        assert!(matches!(
            resampler.resample(AudioBuffer::silence(80)),
            Err(MediaError::Resample { input_rate: 0, .. })
        ));
    }

    #[test]
    fn test_configure_reports_changes() {
        let mut resampler = Resampler::new(8000, 8000);
        assert!(!resampler.configure(8000, 8000));
        assert!(resampler.configure(48000, 8000));
        assert_eq!(resampler.input_rate(), 48000);
        assert!(!resampler.is_passthrough());
    }
}

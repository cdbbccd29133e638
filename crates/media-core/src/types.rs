//! Core media types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Device clock timestamp in milliseconds
pub type FrameTime = u64;

/// Identifier of an input device within a device buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared buffer of mono 16-bit PCM samples
///
/// Cloning shares the samples. Writers go through [`make_mut`](Self::make_mut),
/// which copies only when the samples are shared with another handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioBuffer {
    samples: Arc<Vec<i16>>,
}

impl AudioBuffer {
    /// Create a new buffer owning `samples`
    pub fn new(samples: Vec<i16>) -> Self {
        Self {
            samples: Arc::new(samples),
        }
    }

    /// Buffer of `len` zero samples
    pub fn silence(len: usize) -> Self {
        Self::new(vec![0; len])
    }

    /// Get samples as a slice
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Exclusive access to the samples, copying them first if shared
    pub fn make_mut(&mut self) -> &mut [i16] {
        Arc::make_mut(&mut self.samples).as_mut_slice()
    }

    /// Whether both handles refer to the same sample storage
    pub fn ptr_eq(&self, other: &AudioBuffer) -> bool {
        Arc::ptr_eq(&self.samples, &other.samples)
    }

    /// Get reference count for debugging
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.samples)
    }

    /// Clone the samples into a Vec (when a copy is explicitly needed)
    pub fn to_vec(&self) -> Vec<i16> {
        self.samples.to_vec()
    }
}

impl From<Vec<i16>> for AudioBuffer {
    fn from(samples: Vec<i16>) -> Self {
        Self::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_samples() {
        let buffer = AudioBuffer::new(vec![1, 2, 3]);
        let shared = buffer.clone();
        assert!(buffer.ptr_eq(&shared));
        assert_eq!(buffer.ref_count(), 2);
    }

    #[test]
    fn test_make_mut_copies_shared_samples() {
        let original = AudioBuffer::new(vec![10, 20]);
        let mut writer = original.clone();

        writer.make_mut()[0] = 99;

        assert!(!writer.ptr_eq(&original));
        assert_eq!(original.samples(), &[10, 20]);
        assert_eq!(writer.samples(), &[99, 20]);
    }

    #[test]
    fn test_make_mut_in_place_when_unique() {
        let mut buffer = AudioBuffer::new(vec![5; 4]);
        let before = buffer.samples().as_ptr();
        buffer.make_mut()[3] = 6;
        assert_eq!(buffer.samples().as_ptr(), before);
    }
}

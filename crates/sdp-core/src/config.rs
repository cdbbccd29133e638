//! Registry configuration
//!
//! ```rust
//! use sipx_sdp_core::{CodecRegistry, CpuCost, RegistryConfig};
//!
//! let config = RegistryConfig::default()
//!     .with_codecs("pcmu pcma g729 telephone-event")
//!     .with_cpu_limit(CpuCost::Normal);
//! assert!(config.validate().is_ok());
//!
//! let registry = CodecRegistry::from_config(&config).unwrap();
//! // G.729 is too expensive for a Normal CPU limit
//! assert_eq!(registry.codec_count(), 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::codec::catalog;
use crate::error::{Result, SdpError};
use crate::codec::types::CpuCost;

/// Codec list offered when nothing else is configured
pub const DEFAULT_CODEC_LIST: &str = "pcmu pcma telephone-event";

/// Configuration for building a [`CodecRegistry`](crate::CodecRegistry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Highest CPU cost a codec may have and still be offered
    pub cpu_limit: CpuCost,

    /// Codec names or aliases in preference order, separated by commas or
    /// whitespace
    pub codecs: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            cpu_limit: CpuCost::High,
            codecs: DEFAULT_CODEC_LIST.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Set the CPU limit
    pub fn with_cpu_limit(mut self, cpu_limit: CpuCost) -> Self {
        self.cpu_limit = cpu_limit;
        self
    }

    /// Set the codec list
    pub fn with_codecs(mut self, codecs: impl Into<String>) -> Self {
        self.codecs = codecs.into();
        self
    }

    /// Codec names in the list, empty entries removed
    pub fn codec_names(&self) -> impl Iterator<Item = &str> {
        catalog::split_codec_list(&self.codecs)
    }

    /// Validate the configuration
    ///
    /// The list must name at least one codec and every name must resolve.
    pub fn validate(&self) -> Result<()> {
        let mut count = 0;
        for name in self.codec_names() {
            let codec_type = catalog::codec_type_for_name(name);
            if codec_type.is_unknown() {
                return Err(SdpError::invalid_config(format!("unknown codec name '{}'", name)));
            }
            count += 1;
        }

        if count == 0 {
            return Err(SdpError::invalid_config("codec list is empty"));
        }

        Ok(())
    }
}

//! Error handling for SDP codec negotiation
//!
//! Lookups on the registry and the catalog report "not found" through
//! `Option` or [`CodecType::Unknown`](crate::CodecType::Unknown); the errors
//! here cover configuration and construction problems only.

use thiserror::Error;

/// Result type alias for SDP codec operations
pub type Result<T> = std::result::Result<T, SdpError>;

/// Error type for SDP codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdpError {
    /// Invalid registry configuration
    #[error("Invalid codec registry configuration: {details}")]
    InvalidConfig { details: String },

    /// Codec type has no canonical definition in the catalog
    #[error("Unsupported codec type: {codec_type}")]
    UnsupportedCodec { codec_type: String },

    /// Payload type outside the RTP range
    #[error("Invalid payload type: {payload_type} (valid range 0-127, or -1 for unassigned)")]
    InvalidPayloadType { payload_type: i32 },

    /// Dynamic payload range exhausted during binding
    #[error("Dynamic payload types exhausted: {needed} more codec(s) could not be bound")]
    PayloadTypesExhausted { needed: usize },
}

impl SdpError {
    /// Create a new invalid configuration error
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            details: details.into(),
        }
    }

    /// Create a new unsupported codec error
    pub fn unsupported_codec(codec_type: impl std::fmt::Debug) -> Self {
        Self::UnsupportedCodec {
            codec_type: format!("{:?}", codec_type),
        }
    }
}

//! # SDP-Core: Codec Catalog and Negotiation Registry
//!
//! This library describes the codecs a SIP endpoint can offer in SDP and
//! keeps the negotiated codec list of a session.
//!
//! ## Features
//!
//! - **Codec catalog**: canonical definitions for G.711, G.722, G.723, G.726,
//!   G.729, GSM, iLBC, Speex, AMR, iSAC and several raw video formats
//! - **Name aliases**: `G729`/`G729A`, `PCMA`/`G711A` and friends resolve to the
//!   same codec
//! - **MIME mapping**: subtype, clock rate, channels and fmtp identify a codec
//!   from a remote SDP body
//! - **CPU filtering**: codecs over the configured CPU cost are hidden from
//!   every query without being removed
//! - **Dynamic payload binding**: variants of one codec share a dynamic RTP
//!   payload type starting at 96
//!
//! ## Usage
//!
//! ```rust
//! use sipx_sdp_core::{CodecRegistry, CodecType};
//!
//! let registry = CodecRegistry::new();
//! registry.build_from_list("pcmu speex speex_15 ilbc");
//! registry.bind_payload_types()?;
//!
//! let speex = registry.get_by_identity(CodecType::Speex15).unwrap();
//! assert_eq!(speex.payload_type(), 96);
//! assert_eq!(registry.get_by_payload_type(97).unwrap().codec_type(), CodecType::Ilbc);
//! # Ok::<(), sipx_sdp_core::SdpError>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;

pub use codec::{
    catalog, BandwidthClass, CodecDescriptor, CodecRegistry, CodecType, CpuCost, MediaKind,
    MimeInfo, VideoFormat, FIRST_DYNAMIC_PAYLOAD_TYPE, MAX_DYNAMIC_PAYLOAD_TYPE,
    UNASSIGNED_PAYLOAD_TYPE,
};
pub use config::RegistryConfig;
pub use error::{Result, SdpError};

/// Version information for the SDP codec library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

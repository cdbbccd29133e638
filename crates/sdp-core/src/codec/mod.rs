//! Codec definitions and negotiation
//!
//! - [`types`]: codec identity, media kind and cost classes
//! - [`descriptor`]: the per-codec SDP description
//! - [`catalog`]: canonical codec definitions, names and MIME mappings
//! - [`registry`]: the negotiated, CPU-filtered codec list

pub mod catalog;
pub mod descriptor;
pub mod registry;
pub mod types;

pub use catalog::MimeInfo;
pub use descriptor::CodecDescriptor;
pub use registry::CodecRegistry;
pub use types::{
    is_dynamic_payload_type, is_static_payload_type, BandwidthClass, CodecType, CpuCost,
    MediaKind, VideoFormat, FIRST_DYNAMIC_PAYLOAD_TYPE, MAX_DYNAMIC_PAYLOAD_TYPE,
    MAX_STATIC_PAYLOAD_TYPE, UNASSIGNED_PAYLOAD_TYPE,
};

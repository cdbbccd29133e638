//! Negotiable codec description
//!
//! A [`CodecDescriptor`] is what one `m=` line payload entry of an SDP body
//! says about a codec: its MIME type and subtype, clock rate, channel count and
//! fmtp parameters, together with local knowledge (CPU cost, bandwidth class)
//! used to decide whether it is advertised at all.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::{
    is_static_payload_type, BandwidthClass, CodecType, CpuCost, MediaKind, VideoFormat,
    UNASSIGNED_PAYLOAD_TYPE,
};

/// One codec as seen by SDP offer/answer
///
/// Everything except the payload type is fixed at construction. Equality is
/// identity equality: two descriptors are equal when their internal
/// [`CodecType`] matches, whatever their payload types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecDescriptor {
    codec_type: CodecType,
    payload_type: i32,
    media: MediaKind,
    encoding_name: String,
    sample_rate: u32,
    packet_length_us: u32,
    channels: u8,
    fmtp: String,
    cpu_cost: CpuCost,
    bandwidth: BandwidthClass,
    video_format: Option<VideoFormat>,
}

impl CodecDescriptor {
    /// Create a new codec descriptor
    pub fn new(
        codec_type: CodecType,
        payload_type: i32,
        media: MediaKind,
        encoding_name: impl Into<String>,
        sample_rate: u32,
        packet_length_us: u32,
        channels: u8,
        fmtp: impl Into<String>,
        cpu_cost: CpuCost,
        bandwidth: BandwidthClass,
    ) -> Self {
        Self {
            codec_type,
            payload_type,
            media,
            encoding_name: encoding_name.into(),
            sample_rate,
            packet_length_us,
            channels,
            fmtp: fmtp.into(),
            cpu_cost,
            bandwidth,
            video_format: None,
        }
    }

    /// Attach the picture size of a video codec
    pub fn with_video_format(mut self, format: VideoFormat) -> Self {
        self.video_format = Some(format);
        self
    }

    /// Replace the payload type (used when constructing remote descriptors)
    pub fn with_payload_type(mut self, payload_type: i32) -> Self {
        self.payload_type = payload_type;
        self
    }

    pub fn codec_type(&self) -> CodecType {
        self.codec_type
    }

    /// RTP payload type, or `-1` while unassigned
    pub fn payload_type(&self) -> i32 {
        self.payload_type
    }

    /// Set the RTP payload type during negotiation
    pub fn set_payload_type(&mut self, payload_type: i32) {
        self.payload_type = payload_type;
    }

    pub fn is_payload_assigned(&self) -> bool {
        self.payload_type != UNASSIGNED_PAYLOAD_TYPE
    }

    pub fn has_static_payload_type(&self) -> bool {
        is_static_payload_type(self.payload_type)
    }

    pub fn media(&self) -> MediaKind {
        self.media
    }

    /// MIME top-level type (`audio` or `video`)
    pub fn media_type(&self) -> &'static str {
        self.media.as_mime()
    }

    /// MIME subtype, compared case-insensitively everywhere
    pub fn encoding_name(&self) -> &str {
        &self.encoding_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Packetization interval in microseconds
    pub fn packet_length_us(&self) -> u32 {
        self.packet_length_us
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn fmtp(&self) -> &str {
        &self.fmtp
    }

    pub fn cpu_cost(&self) -> CpuCost {
        self.cpu_cost
    }

    pub fn bandwidth(&self) -> BandwidthClass {
        self.bandwidth
    }

    pub fn video_format(&self) -> Option<VideoFormat> {
        self.video_format
    }

    /// Case-insensitive MIME type/subtype match
    pub fn matches_mime(&self, mime_type: &str, mime_subtype: &str) -> bool {
        self.media_type().eq_ignore_ascii_case(mime_type)
            && self.encoding_name.eq_ignore_ascii_case(mime_subtype)
    }

    /// Whether `other` describes the same wire format
    ///
    /// Compares MIME type and subtype, clock rate, channel count and fmtp.
    /// Payload type and internal identity are ignored, so a descriptor built
    /// from a remote offer matches the local entry it corresponds to.
    pub fn is_same_definition(&self, other: &CodecDescriptor) -> bool {
        self.media == other.media
            && self.encoding_name.eq_ignore_ascii_case(&other.encoding_name)
            && self.sample_rate == other.sample_rate
            && self.channels == other.channels
            && self.fmtp.eq_ignore_ascii_case(&other.fmtp)
    }
}

impl PartialEq for CodecDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.codec_type == other.codec_type
    }
}

impl Eq for CodecDescriptor {}

impl fmt::Display for CodecDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SdpCodec: {}", self.codec_type)?;
        writeln!(f, "  payload type: {}", self.payload_type)?;
        writeln!(f, "  mime: {}/{}", self.media_type(), self.encoding_name)?;
        writeln!(f, "  sample rate: {}", self.sample_rate)?;
        writeln!(f, "  packet length: {}us", self.packet_length_us)?;
        writeln!(f, "  channels: {}", self.channels)?;
        writeln!(f, "  fmtp: \"{}\"", self.fmtp)?;
        write!(f, "  cpu cost: {:?}, bandwidth: {:?}", self.cpu_cost, self.bandwidth)?;
        if let Some(format) = self.video_format {
            write!(f, ", video format: {:?}", format)?;
        }
        Ok(())
    }
}

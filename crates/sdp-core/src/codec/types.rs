//! Codec identity and classification types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest RTP payload type with a static (RFC 3551) assignment
pub const MAX_STATIC_PAYLOAD_TYPE: i32 = 95;

/// First RTP payload type handed out during dynamic binding
pub const FIRST_DYNAMIC_PAYLOAD_TYPE: i32 = MAX_STATIC_PAYLOAD_TYPE + 1;

/// Highest RTP payload type representable in the 7-bit header field
pub const MAX_DYNAMIC_PAYLOAD_TYPE: i32 = 127;

/// Payload type of a codec that has not been bound yet
pub const UNASSIGNED_PAYLOAD_TYPE: i32 = -1;

/// Check if a payload type falls in the static range
pub fn is_static_payload_type(payload_type: i32) -> bool {
    (0..=MAX_STATIC_PAYLOAD_TYPE).contains(&payload_type)
}

/// Check if a payload type falls in the dynamic range
pub fn is_dynamic_payload_type(payload_type: i32) -> bool {
    (FIRST_DYNAMIC_PAYLOAD_TYPE..=MAX_DYNAMIC_PAYLOAD_TYPE).contains(&payload_type)
}

/// Internal codec identity
///
/// Two descriptors are the same codec exactly when their `CodecType`s are
/// equal; the MIME subtype alone is not enough (several Speex variants share
/// the subtype `speex`).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodecType {
    /// Sentinel for names and MIME descriptions that match nothing
    Unknown,
    /// RFC 4733 telephone events (DTMF)
    Tones,
    /// G.711 mu-law
    Pcmu,
    /// G.711 A-law
    Pcma,
    /// Enhanced G.711 mu-law (GIPS)
    GipsIpcmu,
    /// Enhanced G.711 A-law (GIPS)
    GipsIpcma,
    /// GIPS wideband iPCM
    GipsIpcmwb,
    /// GIPS iSAC
    GipsIsac,
    /// GIPS iSAC low complexity
    GipsIsacLc,
    /// 16-bit linear PCM at 8kHz
    L16_8k,
    /// GSM full rate
    Gsm,
    /// G.723.1
    G723,
    /// G.726 at 16 kbit/s
    G726_16,
    /// G.726 at 24 kbit/s
    G726_24,
    /// G.726 at 32 kbit/s
    G726_32,
    /// G.726 at 40 kbit/s
    G726_40,
    /// G.729 Annex A
    G729A,
    /// G.729 Annex A with Annex B silence suppression
    G729Ab,
    /// G.729A under the subtype expected by Cisco 7960 phones
    G729ACisco7960,
    /// G.722 wideband
    G722,
    /// iLBC
    Ilbc,
    /// Speex narrowband, default mode
    Speex,
    /// Speex narrowband, 5.95 kbit/s
    Speex5,
    /// Speex narrowband, 15 kbit/s
    Speex15,
    /// Speex narrowband, 24.6 kbit/s
    Speex24,
    /// Speex wideband, default mode
    SpeexWb,
    /// Speex wideband, mode 1
    SpeexWb5,
    /// Speex wideband, mode 6
    SpeexWb21,
    /// Speex wideband, mode 10
    SpeexWb42,
    /// Speex ultra-wideband, default mode
    SpeexUwb,
    /// Speex ultra-wideband, mode 1
    SpeexUwb8,
    /// Speex ultra-wideband, mode 6
    SpeexUwb22,
    /// Speex ultra-wideband, mode 10
    SpeexUwb44,
    /// AMR narrowband, bandwidth-efficient
    Amr,
    /// AMR narrowband, octet-aligned
    AmrAligned,
    /// AMR wideband, bandwidth-efficient
    AmrWb,
    /// AMR wideband, octet-aligned
    AmrWbAligned,
    Vp71Cif,
    Vp71Qcif,
    Vp71Sqcif,
    Vp71Qvga,
    Vp71Vga,
    IyuvCif,
    IyuvQcif,
    IyuvSqcif,
    IyuvQvga,
    I420Cif,
    I420Qcif,
    I420Sqcif,
    I420Qvga,
    H263Cif,
    H263Qcif,
    H263Sqcif,
    H263Qvga,
    Rgb24Cif,
    Rgb24Qcif,
    Rgb24Sqcif,
    Rgb24Qvga,
}

impl CodecType {
    /// Whether this is the "no match" sentinel
    pub fn is_unknown(&self) -> bool {
        matches!(self, CodecType::Unknown)
    }
}

impl Default for CodecType {
    fn default() -> Self {
        CodecType::Unknown
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Top-level SDP media type of a codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// The MIME top-level type as it appears in SDP (`audio`, `video`)
    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    /// Case-insensitive parse of a MIME top-level type
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        if mime_type.eq_ignore_ascii_case("audio") {
            Some(MediaKind::Audio)
        } else if mime_type.eq_ignore_ascii_case("video") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// CPU cost class of a codec, ordered `Low < Normal < High`
///
/// The registry hides every codec whose cost exceeds its current limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuCost {
    Low = 0,
    Normal = 1,
    High = 2,
}

impl CpuCost {
    /// Convert from the raw level, clamping out-of-range values to `High`
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => CpuCost::Low,
            1 => CpuCost::Normal,
            _ => CpuCost::High,
        }
    }

    /// Raw ordered level
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

impl Default for CpuCost {
    fn default() -> Self {
        CpuCost::High
    }
}

/// Network bandwidth class of a codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandwidthClass {
    Variable,
    Low,
    Normal,
    High,
}

/// Picture size advertised by a video codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoFormat {
    /// 128x96
    Sqcif,
    /// 176x144
    Qcif,
    /// 352x288
    Cif,
    /// 320x240
    Qvga,
    /// 640x480
    Vga,
}

impl VideoFormat {
    /// Frame dimensions in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            VideoFormat::Sqcif => (128, 96),
            VideoFormat::Qcif => (176, 144),
            VideoFormat::Cif => (352, 288),
            VideoFormat::Qvga => (320, 240),
            VideoFormat::Vga => (640, 480),
        }
    }
}

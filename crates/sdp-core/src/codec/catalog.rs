//! Static codec catalog
//!
//! Compiled-in tables mapping each internal [`CodecType`] to its canonical
//! SDP definition, the names a codec may be configured by, and the MIME
//! descriptions a remote offer may use for it. The rows mirror the RTP/MIME
//! assignments of RFC 3551 and the per-codec payload format RFCs.
//!
//! Name and MIME tables are scanned first-match: several names resolve to the
//! same type (`G729`/`G729A`, `PCMA`/`G711A`) and a type may have several MIME
//! rows (iLBC with and without `mode=30`); the first row for a type is its
//! canonical one.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::descriptor::CodecDescriptor;
use super::types::{
    BandwidthClass, CodecType, CpuCost, MediaKind, VideoFormat, UNASSIGNED_PAYLOAD_TYPE,
};
use super::types::{BandwidthClass as Bw, CodecType as C, CpuCost as Cpu, VideoFormat as Vf};

/// Canonical definition row
struct CatalogEntry {
    codec_type: CodecType,
    payload_type: i32,
    media: MediaKind,
    encoding_name: &'static str,
    sample_rate: u32,
    packet_length_us: u32,
    channels: u8,
    fmtp: &'static str,
    cpu_cost: CpuCost,
    bandwidth: BandwidthClass,
    video_format: Option<VideoFormat>,
}

const fn audio(
    codec_type: CodecType,
    payload_type: i32,
    encoding_name: &'static str,
    sample_rate: u32,
    packet_length_us: u32,
    fmtp: &'static str,
    cpu_cost: CpuCost,
    bandwidth: BandwidthClass,
) -> CatalogEntry {
    CatalogEntry {
        codec_type,
        payload_type,
        media: MediaKind::Audio,
        encoding_name,
        sample_rate,
        packet_length_us,
        channels: 1,
        fmtp,
        cpu_cost,
        bandwidth,
        video_format: None,
    }
}

const fn video(
    codec_type: CodecType,
    payload_type: i32,
    encoding_name: &'static str,
    fmtp: &'static str,
    bandwidth: BandwidthClass,
    format: VideoFormat,
) -> CatalogEntry {
    CatalogEntry {
        codec_type,
        payload_type,
        media: MediaKind::Video,
        encoding_name,
        sample_rate: 90000,
        packet_length_us: 20000,
        channels: 1,
        fmtp,
        cpu_cost: CpuCost::Low,
        bandwidth,
        video_format: Some(format),
    }
}

const NONE: i32 = UNASSIGNED_PAYLOAD_TYPE;
const CIF_SIZES: &str = "size=CIF/QCIF/SQCIF";

static CATALOG: &[CatalogEntry] = &[
    audio(C::Tones, NONE, "telephone-event", 8000, 20000, "", Cpu::Low, Bw::Low),
    audio(C::Pcmu, 0, "PCMU", 8000, 20000, "", Cpu::Low, Bw::Normal),
    audio(C::Pcma, 8, "PCMA", 8000, 20000, "", Cpu::Low, Bw::Normal),
    audio(C::GipsIpcmu, NONE, "EG711U", 8000, 20000, "", Cpu::Low, Bw::Normal),
    audio(C::GipsIpcma, NONE, "EG711A", 8000, 20000, "", Cpu::Low, Bw::Normal),
    audio(C::GipsIpcmwb, NONE, "IPCMWB", 16000, 20000, "", Cpu::Low, Bw::High),
    audio(C::GipsIsac, NONE, "ISAC", 16000, 20000, "", Cpu::High, Bw::Variable),
    audio(C::GipsIsacLc, NONE, "ISAC", 16000, 20000, "", Cpu::Low, Bw::Variable),
    audio(C::L16_8k, NONE, "L16", 8000, 20000, "", Cpu::Low, Bw::Normal),
    audio(C::Gsm, 3, "GSM", 8000, 20000, "", Cpu::High, Bw::Low),
    audio(C::G723, 4, "G723", 8000, 20000, "", Cpu::High, Bw::Low),
    audio(C::G726_16, NONE, "G726-16", 8000, 20000, "", Cpu::Low, Bw::Normal),
    audio(C::G726_24, NONE, "G726-24", 8000, 20000, "", Cpu::Low, Bw::Normal),
    audio(C::G726_32, NONE, "G726-32", 8000, 20000, "", Cpu::Low, Bw::Normal),
    audio(C::G726_40, NONE, "G726-40", 8000, 20000, "", Cpu::Low, Bw::Normal),
    audio(C::G729A, 18, "G729", 8000, 10000, "annexb=no", Cpu::High, Bw::Low),
    audio(C::G729Ab, 18, "G729", 8000, 10000, "", Cpu::High, Bw::Low),
    audio(C::G729ACisco7960, 18, "G729a", 8000, 10000, "", Cpu::High, Bw::Low),
    audio(C::G722, 9, "G722", 16000, 20000, "", Cpu::Low, Bw::Normal),
    audio(C::Ilbc, NONE, "iLBC", 8000, 30000, "", Cpu::High, Bw::Low),
    audio(C::Speex, NONE, "speex", 8000, 20000, "", Cpu::Low, Bw::Low),
    audio(C::Speex5, NONE, "speex", 8000, 20000, "mode=2", Cpu::Low, Bw::Low),
    audio(C::Speex15, NONE, "speex", 8000, 20000, "mode=5", Cpu::Low, Bw::Normal),
    audio(C::Speex24, NONE, "speex", 8000, 20000, "mode=7", Cpu::Low, Bw::Normal),
    audio(C::SpeexWb, NONE, "speex", 16000, 20000, "", Cpu::Low, Bw::Low),
    audio(C::SpeexWb5, NONE, "speex", 16000, 20000, "mode=1", Cpu::Low, Bw::Low),
    audio(C::SpeexWb21, NONE, "speex", 16000, 20000, "mode=6", Cpu::Low, Bw::Normal),
    audio(C::SpeexWb42, NONE, "speex", 16000, 20000, "mode=10", Cpu::Low, Bw::Normal),
    audio(C::SpeexUwb, NONE, "speex", 32000, 20000, "", Cpu::Low, Bw::Low),
    audio(C::SpeexUwb8, NONE, "speex", 32000, 20000, "mode=1", Cpu::Low, Bw::Low),
    audio(C::SpeexUwb22, NONE, "speex", 32000, 20000, "mode=6", Cpu::Low, Bw::Normal),
    audio(C::SpeexUwb44, NONE, "speex", 32000, 20000, "mode=10", Cpu::Low, Bw::Normal),
    audio(C::Amr, NONE, "AMR", 8000, 20000, "", Cpu::High, Bw::Low),
    audio(C::AmrAligned, NONE, "AMR", 8000, 20000, "octet-align=1", Cpu::High, Bw::Low),
    audio(C::AmrWb, NONE, "AMR-WB", 16000, 20000, "", Cpu::High, Bw::Low),
    audio(C::AmrWbAligned, NONE, "AMR-WB", 16000, 20000, "octet-align=1", Cpu::High, Bw::Low),
    video(C::Vp71Cif, NONE, "VP71", CIF_SIZES, Bw::Normal, Vf::Cif),
    video(C::Vp71Qcif, NONE, "VP71", "", Bw::Normal, Vf::Qcif),
    video(C::Vp71Sqcif, NONE, "VP71", "", Bw::Normal, Vf::Sqcif),
    video(C::Vp71Qvga, NONE, "VP71", "", Bw::Normal, Vf::Qvga),
    video(C::Vp71Vga, NONE, "VP71", "", Bw::Normal, Vf::Vga),
    video(C::IyuvCif, NONE, "IYUV", CIF_SIZES, Bw::High, Vf::Cif),
    video(C::IyuvQcif, NONE, "IYUV", "", Bw::High, Vf::Qcif),
    video(C::IyuvSqcif, NONE, "IYUV", "", Bw::High, Vf::Sqcif),
    video(C::IyuvQvga, NONE, "IYUV", "", Bw::High, Vf::Qvga),
    video(C::I420Cif, NONE, "I420", CIF_SIZES, Bw::High, Vf::Cif),
    video(C::I420Qcif, NONE, "I420", "", Bw::High, Vf::Qcif),
    video(C::I420Sqcif, NONE, "I420", "", Bw::High, Vf::Sqcif),
    video(C::I420Qvga, NONE, "I420", "", Bw::High, Vf::Qvga),
    video(C::H263Cif, 34, "H263", "", Bw::Normal, Vf::Cif),
    video(C::H263Qcif, 34, "H263", "", Bw::Normal, Vf::Qcif),
    video(C::H263Sqcif, 34, "H263", "", Bw::Normal, Vf::Sqcif),
    video(C::H263Qvga, 34, "H263", "", Bw::High, Vf::Qvga),
    video(C::Rgb24Cif, NONE, "RGB24", CIF_SIZES, Bw::High, Vf::Cif),
    video(C::Rgb24Qcif, NONE, "RGB24", "", Bw::High, Vf::Qcif),
    video(C::Rgb24Sqcif, NONE, "RGB24", "", Bw::High, Vf::Sqcif),
    video(C::Rgb24Qvga, NONE, "RGB24", "", Bw::High, Vf::Qvga),
];

/// Configuration names, upper case, first row per type is canonical
static CODEC_NAMES: &[(CodecType, &str)] = &[
    (C::Tones, "TELEPHONE-EVENT"),
    (C::Tones, "AUDIO/TELEPHONE-EVENT"),
    (C::Tones, "AVT-TONES"),
    (C::Tones, "AVT"),
    (C::Pcmu, "PCMU"),
    (C::Pcmu, "G711U"),
    (C::Pcma, "PCMA"),
    (C::Pcma, "G711A"),
    (C::G729A, "G729"),
    (C::G729A, "G729A"),
    (C::G729Ab, "G729B"),
    (C::G729Ab, "G729AB"),
    (C::G723, "G723"),
    (C::G729ACisco7960, "G729A-FOR-CISCO-7960"),
    (C::G726_16, "G726-16"),
    (C::G726_24, "G726-24"),
    (C::G726_32, "G726-32"),
    (C::G726_40, "G726-40"),
    (C::G722, "G722"),
    (C::Ilbc, "ILBC"),
    (C::Gsm, "GSM"),
    (C::L16_8k, "L16"),
    (C::Speex, "SPEEX"),
    (C::Speex5, "SPEEX_5"),
    (C::Speex15, "SPEEX_15"),
    (C::Speex24, "SPEEX_24"),
    (C::SpeexWb, "SPEEX_WB"),
    (C::SpeexWb5, "SPEEX_WB_5"),
    (C::SpeexWb21, "SPEEX_WB_21"),
    (C::SpeexWb42, "SPEEX_WB_42"),
    (C::SpeexUwb, "SPEEX_UWB"),
    (C::SpeexUwb8, "SPEEX_UWB_8"),
    (C::SpeexUwb22, "SPEEX_UWB_22"),
    (C::SpeexUwb44, "SPEEX_UWB_44"),
    (C::Amr, "AMR"),
    (C::AmrAligned, "AMR_ALIGNED"),
    (C::AmrWb, "AMRWB"),
    (C::AmrWbAligned, "AMRWB_ALIGNED"),
    (C::GipsIpcmu, "EG711U"),
    (C::GipsIpcma, "EG711A"),
    (C::GipsIpcmwb, "IPCMWB"),
    (C::GipsIsac, "ISAC"),
    (C::GipsIsacLc, "ISACLC"),
    (C::Vp71Cif, "VP71-CIF"),
    (C::Vp71Qcif, "VP71-QCIF"),
    (C::Vp71Sqcif, "VP71-SQCIF"),
    (C::Vp71Qvga, "VP71-QVGA"),
    (C::Vp71Vga, "VP71-VGA"),
    (C::IyuvCif, "IYUV-CIF"),
    (C::IyuvQcif, "IYUV-QCIF"),
    (C::IyuvSqcif, "IYUV-SQCIF"),
    (C::IyuvQvga, "IYUV-QVGA"),
    (C::I420Cif, "I420-CIF"),
    (C::I420Qcif, "I420-QCIF"),
    (C::I420Sqcif, "I420-SQCIF"),
    (C::I420Qvga, "I420-QVGA"),
    (C::H263Cif, "H263-CIF"),
    (C::H263Qcif, "H263-QCIF"),
    (C::H263Sqcif, "H263-SQCIF"),
    (C::H263Qvga, "H263-QVGA"),
    (C::Rgb24Cif, "RGB24-CIF"),
    (C::Rgb24Qcif, "RGB24-QCIF"),
    (C::Rgb24Sqcif, "RGB24-SQCIF"),
    (C::Rgb24Qvga, "RGB24-QVGA"),
];

/// MIME description row; `None` fmtp matches an absent or empty fmtp
struct MimeRow {
    codec_type: CodecType,
    subtype: &'static str,
    sample_rate: u32,
    channels: u8,
    fmtp: Option<&'static str>,
}

const fn mime(
    codec_type: CodecType,
    subtype: &'static str,
    sample_rate: u32,
    fmtp: Option<&'static str>,
) -> MimeRow {
    MimeRow {
        codec_type,
        subtype,
        sample_rate,
        channels: 1,
        fmtp,
    }
}

static MIME_ROWS: &[MimeRow] = &[
    mime(C::Pcma, "pcma", 8000, None),
    mime(C::Pcmu, "pcmu", 8000, None),
    mime(C::Gsm, "gsm", 8000, None),
    mime(C::Speex, "speex", 8000, Some("")),
    mime(C::Speex5, "speex", 8000, Some("mode=2")),
    mime(C::Speex15, "speex", 8000, Some("mode=5")),
    mime(C::Speex24, "speex", 8000, Some("mode=7")),
    mime(C::SpeexWb, "speex", 16000, Some("")),
    mime(C::SpeexWb5, "speex", 16000, Some("mode=1")),
    mime(C::SpeexWb21, "speex", 16000, Some("mode=6")),
    mime(C::SpeexWb42, "speex", 16000, Some("mode=10")),
    mime(C::SpeexUwb, "speex", 32000, Some("")),
    mime(C::SpeexUwb8, "speex", 32000, Some("mode=1")),
    mime(C::SpeexUwb22, "speex", 32000, Some("mode=6")),
    mime(C::SpeexUwb44, "speex", 32000, Some("mode=10")),
    mime(C::Ilbc, "ilbc", 8000, Some("mode=30")),
    mime(C::Ilbc, "ilbc", 8000, Some("")),
    mime(C::AmrAligned, "amr", 8000, Some("octet-align=1")),
    mime(C::Amr, "amr", 8000, Some("octet-align=0")),
    mime(C::Amr, "amr", 8000, Some("")),
    mime(C::AmrWbAligned, "amr-wb", 16000, Some("octet-align=1")),
    mime(C::AmrWb, "amr-wb", 16000, Some("octet-align=0")),
    mime(C::AmrWb, "amr-wb", 16000, Some("")),
    mime(C::G726_16, "g726-16", 8000, None),
    mime(C::G726_24, "g726-24", 8000, None),
    mime(C::G726_32, "g726-32", 8000, None),
    mime(C::G726_40, "g726-40", 8000, None),
    mime(C::G729A, "g729a", 8000, Some("annexb=no")),
    mime(C::G729A, "g729", 8000, Some("annexb=no")),
    mime(C::G722, "g722", 16000, None),
    mime(C::Tones, "telephone-event", 8000, None),
];

/// Upper-cased name index; `or_insert` keeps the first row for a name
static NAME_INDEX: Lazy<HashMap<&'static str, CodecType>> = Lazy::new(|| {
    let mut index = HashMap::with_capacity(CODEC_NAMES.len());
    for (codec_type, name) in CODEC_NAMES {
        index.entry(*name).or_insert(*codec_type);
    }
    index
});

/// MIME subtype and fmtp of a codec type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MimeInfo {
    /// Lower-case MIME subtype
    pub subtype: &'static str,
    /// fmtp parameters, empty when the codec has none
    pub fmtp: &'static str,
}

fn entry(codec_type: CodecType) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.codec_type == codec_type)
}

/// Canonical descriptor for a codec type
///
/// Codecs with a static RTP assignment come back with that payload type;
/// all others are unassigned (`-1`) until the registry binds them.
pub fn default_codec(codec_type: CodecType) -> Option<CodecDescriptor> {
    let entry = entry(codec_type)?;
    let descriptor = CodecDescriptor::new(
        entry.codec_type,
        entry.payload_type,
        entry.media,
        entry.encoding_name,
        entry.sample_rate,
        entry.packet_length_us,
        entry.channels,
        entry.fmtp,
        entry.cpu_cost,
        entry.bandwidth,
    );
    Some(match entry.video_format {
        Some(format) => descriptor.with_video_format(format),
        None => descriptor,
    })
}

/// Whether the catalog holds a definition for `codec_type`
pub fn is_supported(codec_type: CodecType) -> bool {
    entry(codec_type).is_some()
}

/// All codec types with a catalog definition, in catalog order
pub fn supported_codec_types() -> impl Iterator<Item = CodecType> {
    CATALOG.iter().map(|entry| entry.codec_type)
}

/// Resolve a configuration name or alias, case-insensitively
///
/// Returns [`CodecType::Unknown`] for names that match nothing.
pub fn codec_type_for_name(name: &str) -> CodecType {
    let key = name.trim().to_ascii_uppercase();
    NAME_INDEX
        .get(key.as_str())
        .copied()
        .unwrap_or(CodecType::Unknown)
}

/// Separators accepted between names in a codec list string
pub const CODEC_LIST_SEPARATORS: &[char] = &[',', ' ', '\n', '\r', '\t'];

/// Names in a codec list string, empty entries removed
pub fn split_codec_list(codec_list: &str) -> impl Iterator<Item = &str> {
    codec_list
        .split(CODEC_LIST_SEPARATORS)
        .filter(|name| !name.is_empty())
}

/// Canonical configuration name of a codec type
pub fn codec_name_for_type(codec_type: CodecType) -> Option<&'static str> {
    CODEC_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == codec_type)
        .map(|(_, name)| *name)
}

/// Reverse lookup of the MIME subtype and fmtp of a codec type
pub fn mime_info(codec_type: CodecType) -> Option<MimeInfo> {
    MIME_ROWS
        .iter()
        .find(|row| row.codec_type == codec_type)
        .map(|row| MimeInfo {
            subtype: row.subtype,
            fmtp: row.fmtp.unwrap_or(""),
        })
}

/// Identify a codec from the parameters of a remote `a=rtpmap`/`a=fmtp` pair
///
/// Subtype and fmtp compare case-insensitively; sample rate and channel count
/// must match exactly.
pub fn codec_type_for_mime(
    subtype: &str,
    sample_rate: u32,
    channels: u8,
    fmtp: &str,
) -> Option<CodecType> {
    MIME_ROWS
        .iter()
        .find(|row| {
            row.subtype.eq_ignore_ascii_case(subtype)
                && row.sample_rate == sample_rate
                && row.channels == channels
                && row.fmtp.unwrap_or("").eq_ignore_ascii_case(fmtp)
        })
        .map(|row| row.codec_type)
}

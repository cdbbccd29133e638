//! Negotiated codec registry
//!
//! The registry is the codec list a signaling session offers and answers
//! with. It keeps descriptors in insertion order (order is preference order
//! in an SDP offer), hides codecs that are too expensive for the configured
//! CPU limit, and assigns dynamic RTP payload types to codecs that do not have
//! a static one.
//!
//! Registries are explicitly constructed and owned: a session that needs a
//! different CPU budget builds its own instead of reconfiguring a shared one.

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::{debug, trace, warn};

use super::catalog::{self, MimeInfo};
use super::descriptor::CodecDescriptor;
use super::types::{
    CodecType, CpuCost, FIRST_DYNAMIC_PAYLOAD_TYPE, MAX_DYNAMIC_PAYLOAD_TYPE,
    UNASSIGNED_PAYLOAD_TYPE,
};
use crate::config::RegistryConfig;
use crate::error::{Result, SdpError};

/// Thread-safe, insertion-ordered collection of negotiable codecs
///
/// Queries take a shared read lock and may run concurrently; mutations take
/// the write lock. The CPU limit is a separate scalar, so lowering or raising
/// it never waits for readers and never changes the stored entries.
pub struct CodecRegistry {
    codecs: RwLock<Vec<CodecDescriptor>>,
    cpu_limit: AtomicU8,
}

impl CodecRegistry {
    /// Create an empty registry with no CPU filtering
    pub fn new() -> Self {
        Self {
            codecs: RwLock::new(Vec::new()),
            cpu_limit: AtomicU8::new(CpuCost::High.level()),
        }
    }

    /// Create a registry holding `codecs` in the given order
    pub fn with_codecs(codecs: impl IntoIterator<Item = CodecDescriptor>) -> Result<Self> {
        let registry = Self::new();
        registry.add_codecs(codecs)?;
        Ok(registry)
    }

    /// Build a registry from configuration
    ///
    /// Unknown names in the codec list are skipped, as with
    /// [`build_from_list`](Self::build_from_list).
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        config.validate()?;

        let registry = Self::new();
        let rejected = registry.build_from_list(&config.codecs);
        if rejected > 0 {
            warn!("{} configured codec(s) rejected", rejected);
        }
        registry.set_cpu_limit(config.cpu_limit);

        debug!(
            "Built codec registry with {} codecs, cpu limit {:?}",
            registry.total_entries(),
            config.cpu_limit
        );
        Ok(registry)
    }

    // ---- mutation -------------------------------------------------------

    /// Append a codec; duplicates are kept
    pub fn add_codec(&self, codec: CodecDescriptor) -> Result<()> {
        Self::check_resolvable(&codec)?;
        trace!("Adding codec {:?} pt={}", codec.codec_type(), codec.payload_type());
        self.codecs.write().push(codec);
        Ok(())
    }

    /// Append several codecs under one write lock
    ///
    /// Nothing is added if any codec lacks a catalog definition.
    pub fn add_codecs(&self, codecs: impl IntoIterator<Item = CodecDescriptor>) -> Result<()> {
        let codecs: Vec<CodecDescriptor> = codecs.into_iter().collect();
        for codec in &codecs {
            Self::check_resolvable(codec)?;
        }
        self.codecs.write().extend(codecs);
        Ok(())
    }

    /// Remove every codec
    pub fn clear_codecs(&self) {
        self.codecs.write().clear();
    }

    /// Add the canonical definition of each codec type
    ///
    /// Returns how many types were rejected because the catalog has no
    /// definition for them.
    pub fn build_from_types(&self, codec_types: &[CodecType]) -> usize {
        let mut rejected = 0;
        let mut accepted = Vec::with_capacity(codec_types.len());

        for codec_type in codec_types {
            match catalog::default_codec(*codec_type) {
                Some(codec) => accepted.push(codec),
                None => {
                    warn!("Unsupported codec: {:?}", codec_type);
                    rejected += 1;
                }
            }
        }

        self.codecs.write().extend(accepted);
        rejected
    }

    /// Add codecs named in a list such as `"pcmu, pcma g729\tspeex_15"`
    ///
    /// Names that do not resolve are skipped without counting; the return
    /// value counts resolved types the catalog cannot build.
    pub fn build_from_list(&self, codec_list: &str) -> usize {
        let codec_types: Vec<CodecType> = catalog::split_codec_list(codec_list)
            .filter_map(|name| {
                let codec_type = catalog::codec_type_for_name(name);
                if codec_type.is_unknown() {
                    warn!("Ignoring unknown codec name '{}'", name);
                    None
                } else {
                    Some(codec_type)
                }
            })
            .collect();

        self.build_from_types(&codec_types)
    }

    /// Assign dynamic payload types to every unassigned codec
    ///
    /// Entries are visited in insertion order. Allocation starts at the first
    /// dynamic payload type and advances only when the encoding name differs
    /// (case-insensitively) from the previously bound entry, so consecutive
    /// variants of one codec (e.g. several `speex` modes) share one payload
    /// type. Entries are assumed to be grouped by encoding name; a name that
    /// reappears after another name gets a fresh payload type. Payload types
    /// already held by other entries are skipped when a new group starts.
    ///
    /// Hidden (over the CPU limit) entries are bound too. Returns the number
    /// of entries bound.
    pub fn bind_payload_types(&self) -> Result<usize> {
        let mut codecs = self.codecs.write();

        let mut candidate = FIRST_DYNAMIC_PAYLOAD_TYPE;
        let mut previous_name: Option<String> = None;
        let mut bound = 0;

        for index in 0..codecs.len() {
            if codecs[index].is_payload_assigned() {
                continue;
            }

            let name = codecs[index].encoding_name().to_string();
            let same_group = previous_name
                .as_deref()
                .map_or(false, |previous| previous.eq_ignore_ascii_case(&name));

            if !same_group {
                if previous_name.is_some() {
                    candidate += 1;
                }
                while codecs.iter().any(|codec| codec.payload_type() == candidate) {
                    candidate += 1;
                }
                previous_name = Some(name);
            }

            if candidate > MAX_DYNAMIC_PAYLOAD_TYPE {
                let needed = codecs[index..]
                    .iter()
                    .filter(|codec| !codec.is_payload_assigned())
                    .count();
                warn!("Dynamic payload types exhausted, {} codec(s) left unbound", needed);
                return Err(SdpError::PayloadTypesExhausted { needed });
            }

            debug!(
                "Binding {:?} ({}) to payload type {}",
                codecs[index].codec_type(),
                codecs[index].encoding_name(),
                candidate
            );
            codecs[index].set_payload_type(candidate);
            bound += 1;
        }

        Ok(bound)
    }

    /// Adopt the payload type of a remote codec
    ///
    /// Every local entry with the same wire definition takes the payload type
    /// of `remote`.
    pub fn copy_payload_type(&self, remote: &CodecDescriptor) {
        let mut codecs = self.codecs.write();
        for codec in codecs.iter_mut() {
            if codec.is_same_definition(remote) {
                codec.set_payload_type(remote.payload_type());
            }
        }
    }

    /// [`copy_payload_type`](Self::copy_payload_type) for each remote codec
    pub fn copy_payload_types(&self, remote: &[CodecDescriptor]) {
        for codec in remote {
            self.copy_payload_type(codec);
        }
    }

    // ---- CPU limit ------------------------------------------------------

    /// Hide codecs whose CPU cost exceeds `limit`
    pub fn set_cpu_limit(&self, limit: CpuCost) {
        self.cpu_limit.store(limit.level(), Ordering::Release);
    }

    pub fn cpu_limit(&self) -> CpuCost {
        CpuCost::from_level(self.cpu_limit.load(Ordering::Acquire))
    }

    // ---- queries --------------------------------------------------------

    /// First entry with the given identity, unless it is over the CPU limit
    pub fn get_by_identity(&self, codec_type: CodecType) -> Option<CodecDescriptor> {
        let limit = self.cpu_limit();
        let codecs = self.codecs.read();
        codecs
            .iter()
            .find(|codec| codec.codec_type() == codec_type)
            .filter(|codec| codec.cpu_cost() <= limit)
            .cloned()
    }

    /// First visible entry bound to `payload_type`
    pub fn get_by_payload_type(&self, payload_type: i32) -> Option<CodecDescriptor> {
        let limit = self.cpu_limit();
        let codecs = self.codecs.read();
        codecs
            .iter()
            .find(|codec| codec.payload_type() == payload_type && codec.cpu_cost() <= limit)
            .cloned()
    }

    /// First visible entry with the given MIME type and subtype
    pub fn get_by_mime(&self, mime_type: &str, mime_subtype: &str) -> Option<CodecDescriptor> {
        let limit = self.cpu_limit();
        let codecs = self.codecs.read();
        codecs
            .iter()
            .find(|codec| codec.matches_mime(mime_type, mime_subtype) && codec.cpu_cost() <= limit)
            .cloned()
    }

    /// Snapshot of all visible entries, in insertion order
    pub fn codecs(&self) -> Vec<CodecDescriptor> {
        self.collect_visible(|_| true)
    }

    /// Snapshot of visible entries of one media type (`audio`, `video`)
    pub fn codecs_for_media(&self, mime_type: &str) -> Vec<CodecDescriptor> {
        self.collect_visible(|codec| codec.media_type().eq_ignore_ascii_case(mime_type))
    }

    /// Snapshot of visible entries with the given MIME type and subtype
    pub fn codecs_for_mime(&self, mime_type: &str, mime_subtype: &str) -> Vec<CodecDescriptor> {
        self.collect_visible(|codec| codec.matches_mime(mime_type, mime_subtype))
    }

    /// Number of visible entries
    pub fn codec_count(&self) -> usize {
        self.count_visible(|_| true)
    }

    /// Number of visible entries of one media type
    pub fn codec_count_for_media(&self, mime_type: &str) -> usize {
        self.count_visible(|codec| codec.media_type().eq_ignore_ascii_case(mime_type))
    }

    /// Number of stored entries, hidden ones included
    pub fn total_entries(&self) -> usize {
        self.codecs.read().len()
    }

    /// Resolve a codec name or alias; see [`catalog::codec_type_for_name`]
    pub fn codec_type(name: &str) -> CodecType {
        catalog::codec_type_for_name(name)
    }

    /// MIME subtype and fmtp of a codec type; see [`catalog::mime_info`]
    pub fn mime_info(codec_type: CodecType) -> Option<MimeInfo> {
        catalog::mime_info(codec_type)
    }

    fn collect_visible(&self, predicate: impl Fn(&CodecDescriptor) -> bool) -> Vec<CodecDescriptor> {
        let limit = self.cpu_limit();
        let codecs = self.codecs.read();
        codecs
            .iter()
            .filter(|codec| codec.cpu_cost() <= limit && predicate(codec))
            .cloned()
            .collect()
    }

    fn count_visible(&self, predicate: impl Fn(&CodecDescriptor) -> bool) -> usize {
        let limit = self.cpu_limit();
        let codecs = self.codecs.read();
        codecs
            .iter()
            .filter(|codec| codec.cpu_cost() <= limit && predicate(codec))
            .count()
    }

    fn check_resolvable(codec: &CodecDescriptor) -> Result<()> {
        if !catalog::is_supported(codec.codec_type()) {
            return Err(SdpError::unsupported_codec(codec.codec_type()));
        }

        let payload_type = codec.payload_type();
        if payload_type != UNASSIGNED_PAYLOAD_TYPE
            && !(0..=MAX_DYNAMIC_PAYLOAD_TYPE).contains(&payload_type)
        {
            return Err(SdpError::InvalidPayloadType { payload_type });
        }
        Ok(())
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CodecRegistry {
    fn clone(&self) -> Self {
        let codecs = self.codecs.read().clone();
        Self {
            codecs: RwLock::new(codecs),
            cpu_limit: AtomicU8::new(self.cpu_limit.load(Ordering::Acquire)),
        }
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("entries", &self.total_entries())
            .field("cpu_limit", &self.cpu_limit())
            .finish()
    }
}

impl fmt::Display for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codecs = self.codecs.read();
        for (index, codec) in codecs.iter().enumerate() {
            writeln!(f, "Codec[{}] cost={}", index, codec.cpu_cost().level())?;
            writeln!(f, "{}", codec)?;
        }
        Ok(())
    }
}

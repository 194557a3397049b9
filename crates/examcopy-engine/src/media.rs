//! Position-keyed media slots.
//!
//! Media blocks are parsed long before their images exist: generation runs
//! out-of-band (image model calls, sandboxed plotting) and completes in any
//! order. The registry joins a completion back to its originating block by
//! position, so the assembled document is deterministic regardless of the
//! interleaving. A slot that never fills renders as an omitted image, never
//! an error.

use std::collections::HashMap;
use std::sync::Mutex;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::model::ContentBlock;

/// Which block sequence a slot belongs to. The exam body and the solution
/// body are separate keyspaces; their ordinals never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyspace {
    Exam,
    Solution,
}

/// Stable address of one media block: its keyspace plus its ordinal index in
/// the *segment* sequence. Prose segments may expand into any number of
/// content blocks without shifting these ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SlotKey {
    pub space: Keyspace,
    pub index: usize,
}

impl SlotKey {
    pub fn new(space: Keyspace, index: usize) -> Self {
        Self { space, index }
    }
}

/// How a media block's image is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Plotting code executed in a sandbox.
    Geometry,
    /// Natural-language prompt sent to an image model.
    AiImage,
}

/// A generated image, either raw bytes or a (data-)URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaPayload {
    Bytes(Vec<u8>),
    Uri(String),
}

impl MediaPayload {
    /// Raw image bytes, decoding the base64 tail of a data URI if needed.
    /// `None` when the URI doesn't carry decodable content; callers omit
    /// the image in that case.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        match self {
            MediaPayload::Bytes(b) => Some(b.clone()),
            MediaPayload::Uri(u) => {
                let b64 = u.rsplit_once(',').map_or(u.as_str(), |(_, tail)| tail);
                STANDARD.decode(b64).ok()
            }
        }
    }

    /// A URI suitable for an `img src` attribute; bytes are wrapped into a
    /// PNG data URI.
    pub fn to_uri(&self) -> String {
        match self {
            MediaPayload::Uri(u) => u.clone(),
            MediaPayload::Bytes(b) => format!("data:image/png;base64,{}", STANDARD.encode(b)),
        }
    }
}

/// Append-mostly store of generated media, keyed by slot.
///
/// Insertions may come from any thread as generations complete; the last
/// write for a key wins, which is also the regeneration story: a fresh
/// completion simply overwrites the slot.
#[derive(Debug, Default)]
pub struct MediaRegistry {
    slots: Mutex<HashMap<SlotKey, MediaPayload>>,
}

impl MediaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: SlotKey, payload: MediaPayload) {
        self.lock().insert(key, payload);
    }

    pub fn get(&self, key: SlotKey) -> Option<MediaPayload> {
        self.lock().get(&key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SlotKey, MediaPayload>> {
        // A writer that panicked mid-insert left at worst a stale slot;
        // the map itself stays usable.
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Why one media block failed to resolve. Failures are per-slot and never
/// abort sibling blocks.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media generation failed: {0}")]
    Generation(String),
    #[error("media generation quota exhausted")]
    QuotaExhausted,
}

/// External capability that turns a media block's source text into an image
/// payload. Implementations wrap the image-model client or the sandboxed
/// plotting runtime; the engine never constructs payloads itself.
pub trait MediaResolver {
    fn resolve(&self, source: &str, kind: MediaKind) -> Result<MediaPayload, MediaError>;
}

/// Resolves every media block in `blocks` through `resolver`, inserting
/// successes into `registry`. Failures are collected per slot and returned;
/// the walk always visits every block.
pub fn populate_registry(
    blocks: &[ContentBlock],
    registry: &MediaRegistry,
    resolver: &dyn MediaResolver,
) -> Vec<(SlotKey, MediaError)> {
    let mut failures = Vec::new();
    for block in blocks {
        if let ContentBlock::Media { key, kind, source } = block {
            match resolver.resolve(source, *kind) {
                Ok(payload) => registry.insert(*key, payload),
                Err(e) => {
                    warn!(index = key.index, %e, "media slot failed to resolve");
                    failures.push((*key, e));
                }
            }
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(index: usize) -> SlotKey {
        SlotKey::new(Keyspace::Exam, index)
    }

    #[test]
    fn missing_slot_is_none_not_an_error() {
        let reg = MediaRegistry::new();
        assert_eq!(reg.get(key(3)), None);
    }

    #[test]
    fn last_write_wins_on_regeneration() {
        let reg = MediaRegistry::new();
        reg.insert(key(1), MediaPayload::Uri("first".into()));
        reg.insert(key(1), MediaPayload::Uri("second".into()));
        assert_eq!(reg.get(key(1)), Some(MediaPayload::Uri("second".into())));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn exam_and_solution_keyspaces_do_not_collide() {
        let reg = MediaRegistry::new();
        reg.insert(key(0), MediaPayload::Uri("exam".into()));
        reg.insert(
            SlotKey::new(Keyspace::Solution, 0),
            MediaPayload::Uri("solution".into()),
        );
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn data_uri_decodes_to_bytes() {
        let p = MediaPayload::Uri("data:image/png;base64,AQID".into());
        assert_eq!(p.to_bytes(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn bare_base64_uri_decodes_too() {
        let p = MediaPayload::Uri("AQID".into());
        assert_eq!(p.to_bytes(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn undecodable_uri_yields_no_bytes() {
        let p = MediaPayload::Uri("https://example.com/img.png".into());
        assert_eq!(p.to_bytes(), None);
    }

    #[test]
    fn bytes_round_trip_through_data_uri() {
        let p = MediaPayload::Bytes(vec![1, 2, 3]);
        assert_eq!(p.to_uri(), "data:image/png;base64,AQID");
    }

    /// Plotting succeeds, image-model calls fail: the failure is reported
    /// per slot and the sibling still lands in the registry.
    struct GeometryOnly;

    impl MediaResolver for GeometryOnly {
        fn resolve(&self, source: &str, kind: MediaKind) -> Result<MediaPayload, MediaError> {
            match kind {
                MediaKind::Geometry => Ok(MediaPayload::Uri(format!("rendered:{source}"))),
                MediaKind::AiImage => Err(MediaError::QuotaExhausted),
            }
        }
    }

    #[test]
    fn one_failing_slot_does_not_block_its_siblings() {
        let blocks = vec![
            ContentBlock::Media {
                key: key(0),
                kind: MediaKind::AiImage,
                source: "a cube".into(),
            },
            ContentBlock::Media {
                key: key(1),
                kind: MediaKind::Geometry,
                source: "plt.plot()".into(),
            },
        ];
        let registry = MediaRegistry::new();
        let failures = populate_registry(&blocks, &registry, &GeometryOnly);

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, key(0));
        assert!(matches!(failures[0].1, MediaError::QuotaExhausted));
        assert_eq!(
            registry.get(key(1)),
            Some(MediaPayload::Uri("rendered:plt.plot()".into()))
        );
    }
}

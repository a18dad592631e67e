//! # Resource Map: Ref-Counted Resource Storage
//!
//! Every loadable artifact in the engine (text, XML documents, textures,
//! sounds) lives in one keyed store, the [`ResourceMap`]. Loading is
//! asynchronous and reference counted:
//!
//! ```text
//! load("a.png")                 load("a.png") again        unload("a.png")
//!   │                             │                          │
//!   ├─ placeholder entry,         ├─ entry exists:           ├─ ref 2 → 1: kept
//!   │  ref count 1                │  ref count 1 → 2,        │
//!   ├─ worker thread:             │  no second fetch         └─ ref 1 → 0:
//!   │  fetch → decode → parse     │                             entry removed
//!   │                             │
//!   └─ wait_on_all_pending()  ◄── join-all barrier, stores results
//! ```
//!
//! ## The decode/parse split
//!
//! One generic pipeline serves every resource kind. A [`Codec`] supplies the
//! two transform steps: `decode` turns raw bytes into an intermediate form
//! (UTF-8 text, a decoded RGBA image, a decoded sound) and `parse` turns the
//! intermediate into the stored [`Artifact`] (an owned XML tree, an uploaded
//! GPU texture). The texture codec carries cloned wgpu handles so the GPU
//! upload happens right on the worker thread; wgpu devices and queues are
//! internally reference counted and freely cloneable.
//!
//! ## The barrier
//!
//! Workers run on `std::thread` and report their result through the join
//! handle. Nothing reads a payload before [`wait_on_all_pending`]
//! (ResourceMap::wait_on_all_pending) has joined every outstanding worker:
//! the game loop calls it between a scene's `load()` and `init()`, so
//! `init()` may assume every requested resource is fully populated. The
//! first fetch/decode/parse failure aborts the barrier; a scene either
//! starts with all of its resources or not at all.
//!
//! ## Why reference counting
//!
//! Two scenes (or many renderables) can share one decoded asset without a
//! duplicate fetch, and the last `unload` deterministically evicts it. An
//! unload of an absent or still-referenced key returns `false` rather than
//! panicking; scene teardown order is the caller's business.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::error::EngineError;

pub mod font;
pub mod text;
pub mod texture;
pub mod xml;

pub use texture::{Texture, TextureUploader};
pub use xml::XmlElement;

/// The raw-bytes fetch primitive. Defaults to `std::fs::read`; injectable
/// so tests run without a filesystem.
pub type Fetcher = Arc<dyn Fn(&str) -> Result<Vec<u8>, EngineError> + Send + Sync>;

// ── Artifacts and codecs ─────────────────────────────────────────────────

/// A fully decoded, parsed resource payload.
pub enum Artifact {
    /// Plain UTF-8 text (shader sources and the like).
    Text(String),
    /// An owned XML document tree.
    Xml(XmlElement),
    /// A GPU-resident texture with its dimensions.
    Texture(Texture),
    /// Decoded audio data.
    #[cfg(feature = "audio")]
    Sound(crate::audio::SoundData),
}

impl Artifact {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Artifact::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_xml(&self) -> Option<&XmlElement> {
        match self {
            Artifact::Xml(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_texture(&self) -> Option<&Texture> {
        match self {
            Artifact::Texture(t) => Some(t),
            _ => None,
        }
    }

    #[cfg(feature = "audio")]
    pub fn as_sound(&self) -> Option<&crate::audio::SoundData> {
        match self {
            Artifact::Sound(s) => Some(s),
            _ => None,
        }
    }
}

/// Intermediate result of [`Codec::decode`], handed to [`Codec::parse`].
pub(crate) enum Intermediate {
    Text(String),
    Image(image::RgbaImage),
    #[cfg(feature = "audio")]
    Sound(crate::audio::SoundData),
}

/// The closed set of resource pipelines, one per artifact kind.
///
/// `decode` turns fetched bytes into an intermediate form; `parse` turns
/// the intermediate into the stored [`Artifact`]. Both run on the worker.
pub enum Codec {
    Text,
    Xml,
    Texture(TextureUploader),
    #[cfg(feature = "audio")]
    Sound,
}

impl Codec {
    pub(crate) fn decode(&self, key: &str, raw: Vec<u8>) -> Result<Intermediate, EngineError> {
        match self {
            Codec::Text | Codec::Xml => {
                let text = String::from_utf8(raw).map_err(|e| EngineError::Parse {
                    key: key.to_string(),
                    reason: format!("not valid UTF-8: {e}"),
                })?;
                Ok(Intermediate::Text(text))
            }
            Codec::Texture(_) => {
                let img = image::load_from_memory(&raw)
                    .map_err(|e| EngineError::Parse {
                        key: key.to_string(),
                        reason: format!("image decode failed: {e}"),
                    })?
                    .to_rgba8();
                Ok(Intermediate::Image(img))
            }
            #[cfg(feature = "audio")]
            Codec::Sound => {
                let sound = crate::audio::SoundData::from_bytes(raw)
                    .map_err(|e| EngineError::Parse {
                        key: key.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(Intermediate::Sound(sound))
            }
        }
    }

    pub(crate) fn parse(&self, key: &str, data: Intermediate) -> Result<Artifact, EngineError> {
        match (self, data) {
            (Codec::Text, Intermediate::Text(text)) => Ok(Artifact::Text(text)),
            (Codec::Xml, Intermediate::Text(text)) => {
                let doc = xml::parse(key, &text)?;
                Ok(Artifact::Xml(doc))
            }
            (Codec::Texture(uploader), Intermediate::Image(img)) => {
                Ok(Artifact::Texture(uploader.upload(key, &img)))
            }
            #[cfg(feature = "audio")]
            (Codec::Sound, Intermediate::Sound(sound)) => Ok(Artifact::Sound(sound)),
            #[allow(unreachable_patterns)]
            _ => Err(EngineError::Parse {
                key: key.to_string(),
                reason: "codec and intermediate mismatch".to_string(),
            }),
        }
    }
}

// ── The map ──────────────────────────────────────────────────────────────

struct MapEntry {
    /// `None` while the load pipeline is still in flight.
    data: Option<Artifact>,
    ref_count: u32,
}

struct PendingLoad {
    key: String,
    worker: JoinHandle<Result<Artifact, EngineError>>,
}

/// Handle to one in-flight load, returned by [`ResourceMap::load`] when a
/// new pipeline was actually started.
#[derive(Debug)]
pub struct LoadTicket {
    key: String,
}

impl LoadTicket {
    /// The key the pending load will populate.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Keyed store of loaded artifacts with reference counting and an
/// asynchronous fetch-decode-parse pipeline. See the module docs.
pub struct ResourceMap {
    entries: HashMap<String, MapEntry>,
    pending: Vec<PendingLoad>,
    fetcher: Fetcher,
}

impl ResourceMap {
    /// A map whose fetch primitive reads from the filesystem.
    pub fn new() -> Self {
        Self::with_fetcher(Arc::new(|path: &str| {
            std::fs::read(path).map_err(|e| EngineError::Fetch {
                key: path.to_string(),
                reason: e.to_string(),
            })
        }))
    }

    /// A map with an injected fetch primitive.
    pub fn with_fetcher(fetcher: Fetcher) -> Self {
        Self {
            entries: HashMap::new(),
            pending: Vec::new(),
            fetcher,
        }
    }

    /// `true` iff an entry exists for `key`, loaded or still pending.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Request a resource.
    ///
    /// If `key` is absent, a placeholder entry is created with a reference
    /// count of 1 and a worker is started on the fetch-decode-parse
    /// pipeline; returns a [`LoadTicket`] for the new pipeline. If `key`
    /// is already present (loaded *or* still in flight), only the
    /// reference count is bumped and no second fetch is issued.
    pub fn load(&mut self, key: &str, codec: Codec) -> Option<LoadTicket> {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.ref_count += 1;
            return None;
        }

        self.entries.insert(
            key.to_string(),
            MapEntry {
                data: None,
                ref_count: 1,
            },
        );

        let fetcher = Arc::clone(&self.fetcher);
        let worker_key = key.to_string();
        let worker = std::thread::spawn(move || {
            let raw = fetcher(&worker_key)?;
            let intermediate = codec.decode(&worker_key, raw)?;
            codec.parse(&worker_key, intermediate)
        });

        log::debug!("load requested: '{key}'");
        self.pending.push(PendingLoad {
            key: key.to_string(),
            worker,
        });
        Some(LoadTicket {
            key: key.to_string(),
        })
    }

    /// Fetch the stored artifact for `key`.
    ///
    /// Fails with [`EngineError::NotLoaded`] when the key is absent or its
    /// pipeline has not been waited on yet; callers must respect the
    /// load/init ordering enforced by the loop's barrier.
    pub fn get(&self, key: &str) -> Result<&Artifact, EngineError> {
        self.entries
            .get(key)
            .and_then(|entry| entry.data.as_ref())
            .ok_or_else(|| EngineError::NotLoaded(key.to_string()))
    }

    /// Store the payload for an existing entry. Completion step of the
    /// load pipeline; a key evicted while its load was in flight is
    /// silently skipped.
    pub(crate) fn set(&mut self, key: &str, artifact: Artifact) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.data = Some(artifact);
        }
    }

    /// Release one reference to `key`.
    ///
    /// Returns `true` exactly when this call removed the entry (the count
    /// reached zero). An absent key or a still-referenced entry returns
    /// `false`; unloading more than was loaded is a no-op.
    pub fn unload(&mut self, key: &str) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.ref_count -= 1;
                if entry.ref_count == 0 {
                    self.entries.remove(key);
                    log::debug!("evicted: '{key}'");
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    /// Join every outstanding load pipeline and store the results.
    ///
    /// The pending set is cleared regardless of outcome. The first failure
    /// aborts the wait and is returned; there is no partial-success or
    /// retry policy.
    pub fn wait_on_all_pending(&mut self) -> Result<(), EngineError> {
        let pending = std::mem::take(&mut self.pending);
        for load in pending {
            let result = load.worker.join().unwrap_or_else(|_| {
                Err(EngineError::Fetch {
                    key: load.key.clone(),
                    reason: "load worker panicked".to_string(),
                })
            });
            let artifact = result?;
            self.set(&load.key, artifact);
        }
        Ok(())
    }

    /// Number of loads still outstanding.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for ResourceMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn canned(content: &'static str) -> Fetcher {
        Arc::new(move |_path: &str| Ok(content.as_bytes().to_vec()))
    }

    #[test]
    fn load_wait_get_unload_round_trip() {
        let mut map = ResourceMap::with_fetcher(canned("hello"));

        let ticket = map.load("a.txt", Codec::Text);
        assert!(ticket.is_some());
        assert_eq!(ticket.unwrap().key(), "a.txt");
        assert!(map.has("a.txt"));

        map.wait_on_all_pending().unwrap();
        assert_eq!(map.get("a.txt").unwrap().as_text(), Some("hello"));

        assert!(map.unload("a.txt"));
        assert!(!map.has("a.txt"));
    }

    #[test]
    fn entry_exists_iff_loads_exceed_unloads() {
        let mut map = ResourceMap::with_fetcher(canned("x"));

        for _ in 0..3 {
            map.load("k", Codec::Text);
        }
        map.wait_on_all_pending().unwrap();

        assert!(!map.unload("k")); // 3 → 2
        assert!(map.has("k"));
        assert!(!map.unload("k")); // 2 → 1
        assert!(map.has("k"));
        assert!(map.unload("k")); // 1 → 0, evicted
        assert!(!map.has("k"));
    }

    #[test]
    fn redundant_load_issues_one_fetch() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fetches);
        let fetcher: Fetcher = Arc::new(move |_path: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(b"data".to_vec())
        });
        let mut map = ResourceMap::with_fetcher(fetcher);

        // Second load lands before the first resolves: no second fetch,
        // no second ticket.
        assert!(map.load("shared.png", Codec::Text).is_some());
        assert!(map.load("shared.png", Codec::Text).is_none());
        assert_eq!(map.pending_count(), 1);

        map.wait_on_all_pending().unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        assert!(!map.unload("shared.png"));
        assert!(map.unload("shared.png"));
    }

    #[test]
    fn get_absent_key_is_not_loaded() {
        let map = ResourceMap::with_fetcher(canned(""));
        match map.get("missing") {
            Err(EngineError::NotLoaded(key)) => assert_eq!(key, "missing"),
            other => panic!("expected NotLoaded, got {:?}", other.err()),
        }
    }

    #[test]
    fn get_before_barrier_is_not_loaded() {
        let mut map = ResourceMap::with_fetcher(canned("late"));
        map.load("slow.txt", Codec::Text);
        assert!(map.has("slow.txt"));
        assert!(map.get("slow.txt").is_err());

        map.wait_on_all_pending().unwrap();
        assert!(map.get("slow.txt").is_ok());
    }

    #[test]
    fn unload_absent_key_is_noop() {
        let mut map = ResourceMap::with_fetcher(canned(""));
        assert!(!map.unload("never-loaded"));
        // Double-unload after eviction is tolerated the same way.
        map.load("k", Codec::Text);
        map.wait_on_all_pending().unwrap();
        assert!(map.unload("k"));
        assert!(!map.unload("k"));
    }

    #[test]
    fn fetch_failure_aborts_barrier() {
        let fetcher: Fetcher = Arc::new(|path: &str| {
            Err(EngineError::Fetch {
                key: path.to_string(),
                reason: "no such host".to_string(),
            })
        });
        let mut map = ResourceMap::with_fetcher(fetcher);
        map.load("gone.txt", Codec::Text);

        let err = map.wait_on_all_pending().unwrap_err();
        assert!(matches!(err, EngineError::Fetch { .. }));
        assert_eq!(map.pending_count(), 0);
        // The placeholder stays unstocked; get still fails.
        assert!(map.get("gone.txt").is_err());
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let fetcher: Fetcher = Arc::new(|_| Ok(vec![0xff, 0xfe, 0x00]));
        let mut map = ResourceMap::with_fetcher(fetcher);
        map.load("bad.txt", Codec::Text);
        assert!(matches!(
            map.wait_on_all_pending(),
            Err(EngineError::Parse { .. })
        ));
    }

    #[test]
    fn eviction_while_pending_discards_result() {
        let mut map = ResourceMap::with_fetcher(canned("orphan"));
        map.load("k", Codec::Text);
        assert!(map.unload("k")); // evict the placeholder before the barrier
        map.wait_on_all_pending().unwrap();
        assert!(!map.has("k"));
    }
}

//! Canned point-cloud artifacts.
//!
//! The two maps are generated by the build script and embedded into the
//! library image. They are wrapped once, process-wide, into an
//! [`ArtifactStore`] before any service instance exists and are never mutated
//! afterwards.

use bytes::Bytes;
use core::fmt;
use std::sync::LazyLock;

static SMALL_PCD: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/small.pcd"));
static LARGE_PCD: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/large.pcd"));

static STORE: LazyLock<ArtifactStore> =
    LazyLock::new(|| ArtifactStore::from_static(SMALL_PCD, LARGE_PCD));

/// Size class identifying one of the two canned artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactSize {
    Small,
    Large,
}

impl ArtifactSize {
    /// Maps the `big` configuration flag onto a size class.
    pub const fn from_big(big: bool) -> Self {
        if big { Self::Large } else { Self::Small }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for ArtifactSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable byte blob together with its size class.
///
/// Cloning is cheap: the bytes are reference counted (or static) and never
/// copied.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    size: ArtifactSize,
    bytes: Bytes,
}

impl Artifact {
    pub const fn new(size: ArtifactSize, bytes: Bytes) -> Self {
        Self { size, bytes }
    }

    pub const fn size(&self) -> ArtifactSize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns a cheap handle to the artifact bytes.
    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("size", &self.size)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Holds the small and large artifacts and resolves a configuration flag to
/// one of them.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    small: Artifact,
    large: Artifact,
}

impl ArtifactStore {
    /// Returns the process-wide store backed by the embedded maps.
    pub fn global() -> &'static Self {
        &STORE
    }

    /// Builds a store from two static blobs without copying them.
    pub fn from_static(small: &'static [u8], large: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(small), Bytes::from_static(large))
    }

    pub fn new(small: Bytes, large: Bytes) -> Self {
        Self {
            small: Artifact::new(ArtifactSize::Small, small),
            large: Artifact::new(ArtifactSize::Large, large),
        }
    }

    /// Resolves the `big` flag to exactly one artifact. Never fails.
    pub fn select(&self, big: bool) -> Artifact {
        match ArtifactSize::from_big(big) {
            ArtifactSize::Small => self.small.clone(),
            ArtifactSize::Large => self.large.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CHUNK_SIZE_BYTES;

    #[test]
    fn select_resolves_flag_to_size_class() {
        let store = ArtifactStore::global();
        assert_eq!(store.select(false).size(), ArtifactSize::Small);
        assert_eq!(store.select(true).size(), ArtifactSize::Large);
    }

    #[test]
    fn embedded_artifacts_are_point_cloud_files() {
        let store = ArtifactStore::global();
        for big in [false, true] {
            let artifact = store.select(big);
            assert!(artifact.bytes().starts_with(b"# .PCD v0.7"));
        }
    }

    #[test]
    fn embedded_artifacts_straddle_the_chunk_size() {
        let store = ArtifactStore::global();
        let small = store.select(false);
        let large = store.select(true);

        assert!(!small.is_empty());
        assert!(small.len() < CHUNK_SIZE_BYTES.get());
        assert!(large.len() > 2 * CHUNK_SIZE_BYTES.get());
        assert_ne!(large.len() % CHUNK_SIZE_BYTES.get(), 0);
    }

    #[test]
    fn selection_never_copies_or_changes_bytes() {
        let store = ArtifactStore::global();
        let first = store.select(true);
        let second = store.select(true);
        assert_eq!(first, second);
        assert_eq!(first.bytes().as_ptr(), second.bytes().as_ptr());
    }
}

//! # swassets - Asset repository boundary for SoundWalk
//!
//! This crate provides the foundational abstractions between the playback
//! scheduler and the persistent asset storage, whatever backs it (SQL,
//! in-memory fixtures, a remote API):
//!
//! - **[`Recording`]**: plain value type for a playable audio clip, free of
//!   persistence concerns. The scheduler only ever reads it.
//! - **[`RepeatMode`]**: per-project policy governing what happens when a
//!   session has played everything in range.
//! - **[`AssetRepository`] / [`ProjectDirectory`]**: async adapter traits the
//!   surrounding service implements over its storage layer.
//! - **[`MemoryAssetStore`]**: a lock-guarded in-memory implementation of
//!   both traits, used by tests and demos.
//!
//! ## Usage
//!
//! ```
//! use swassets::{MemoryAssetStore, Recording, RepeatMode};
//! use swgeo::GeoPosition;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> swassets::Result<()> {
//! use swassets::AssetRepository;
//!
//! let store = MemoryAssetStore::new();
//! store.set_repeat_mode(1, RepeatMode::Continuous);
//! store.add_recording(
//!     Recording::new(10, "intro.wav").with_position(GeoPosition::new(42.36, -71.06)),
//! );
//!
//! let candidates = store.fetch_candidates(100, None).await?;
//! assert_eq!(candidates.len(), 1);
//! # Ok(())
//! # }
//! ```

mod memory;

use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use swgeo::GeoPosition;

pub use memory::MemoryAssetStore;

/// Error types for asset repository operations
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    AssetNotFound(i64),

    #[error("Project not found: {0}")]
    ProjectNotFound(i64),

    #[error("Repository unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid repeat mode: {0}")]
    InvalidRepeatMode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for asset repository operations
pub type Result<T> = std::result::Result<T, AssetError>;

/// A playable audio clip as the scheduler sees it.
///
/// A `Recording` is a read-only snapshot of a repository row: the scheduler
/// never mutates these fields, it only moves recordings between its pools.
/// `position` is `None` when the clip was captured without coordinates; such
/// clips are audible from everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Repository identity of the asset.
    pub id: i64,
    /// Playable media filename, relative to the project's media root.
    pub filename: String,
    /// Where the clip was recorded, if known.
    pub position: Option<GeoPosition>,
    /// Number of likes the asset has accumulated.
    pub like_count: u32,
    /// Editorial weight used by the by-weight ordering policy.
    pub weight: f64,
}

impl Recording {
    /// Creates a recording with no position, no likes and zero weight.
    pub fn new(id: i64, filename: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            position: None,
            like_count: 0,
            weight: 0.0,
        }
    }

    /// Sets the recorded position.
    pub fn with_position(mut self, position: GeoPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the like count.
    pub fn with_like_count(mut self, like_count: u32) -> Self {
        self.like_count = like_count;
        self
    }

    /// Sets the editorial weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Per-project exhaustion policy.
///
/// Consulted by the scheduler when a session has played every in-range clip:
/// `Continuous` projects refill the session pool from the repository and keep
/// streaming, `Stop` projects let the stream idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    Continuous,
    Stop,
}

impl RepeatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatMode::Continuous => "continuous",
            RepeatMode::Stop => "stop",
        }
    }

    /// True if exhaustion should trigger a pool refill.
    pub fn is_continuous(&self) -> bool {
        matches!(self, RepeatMode::Continuous)
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatMode {
    type Err = AssetError;

    // Unknown strings are a hard error: this value decides whether a stream
    // keeps running forever, so it must never be guessed.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "continuous" => Ok(RepeatMode::Continuous),
            "stop" => Ok(RepeatMode::Stop),
            other => Err(AssetError::InvalidRepeatMode(other.to_string())),
        }
    }
}

impl Serialize for RepeatMode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RepeatMode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        RepeatMode::from_str(&value).map_err(serde::de::Error::custom)
    }
}

/// Query interface over the persistent asset storage.
///
/// Implementations must be idempotent and side-effect-free from the
/// scheduler's viewpoint: two identical `fetch_candidates` calls may return
/// different rows (the repository is live), but the call itself must not
/// change repository state.
#[async_trait::async_trait]
pub trait AssetRepository: Debug + Send + Sync {
    /// Returns the candidate clips for a session, optionally narrowed to
    /// assets carrying at least one of the given tags.
    ///
    /// May return an empty vec; that is not an error.
    async fn fetch_candidates(
        &self,
        session_id: i64,
        tags: Option<&[i64]>,
    ) -> Result<Vec<Recording>>;

    /// Returns a single asset by identity.
    ///
    /// # Errors
    ///
    /// [`AssetError::AssetNotFound`] if the id is unknown.
    async fn fetch_by_id(&self, asset_id: i64) -> Result<Recording>;
}

/// Lookup of per-project playback policy.
#[async_trait::async_trait]
pub trait ProjectDirectory: Debug + Send + Sync {
    /// Returns the repeat mode configured for a project.
    ///
    /// # Errors
    ///
    /// [`AssetError::ProjectNotFound`] if the project does not exist. Callers
    /// must not treat this as an implicit [`RepeatMode::Stop`].
    async fn repeat_mode(&self, project_id: i64) -> Result<RepeatMode>;
}

pub use async_trait::async_trait;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_mode_string_round_trip() {
        for mode in [RepeatMode::Continuous, RepeatMode::Stop] {
            assert_eq!(RepeatMode::from_str(mode.as_str()).unwrap(), mode);
        }
    }

    #[test]
    fn repeat_mode_parse_is_case_insensitive() {
        assert_eq!(
            RepeatMode::from_str("Continuous").unwrap(),
            RepeatMode::Continuous
        );
        assert_eq!(RepeatMode::from_str("STOP").unwrap(), RepeatMode::Stop);
    }

    #[test]
    fn repeat_mode_rejects_unknown_strings() {
        assert!(matches!(
            RepeatMode::from_str("shuffle"),
            Err(AssetError::InvalidRepeatMode(_))
        ));
        // Same through serde
        let parsed: std::result::Result<RepeatMode, _> = serde_json::from_str("\"shuffle\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn recording_builder_defaults() {
        let rec = Recording::new(7, "ambient.wav");
        assert_eq!(rec.id, 7);
        assert_eq!(rec.filename, "ambient.wav");
        assert!(rec.position.is_none());
        assert_eq!(rec.like_count, 0);
        assert_eq!(rec.weight, 0.0);
    }

    #[test]
    fn recording_serde_round_trip() {
        let rec = Recording::new(7, "ambient.wav")
            .with_position(swgeo::GeoPosition::new(42.36, -71.06))
            .with_like_count(3)
            .with_weight(1.5);
        let json = serde_json::to_string(&rec).unwrap();
        let back: Recording = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }
}

//! In-memory implementation of the repository traits
//!
//! Backs the scheduler's tests and demos: a real deployment implements
//! [`AssetRepository`] and [`ProjectDirectory`] over its storage layer, but
//! everything above the trait boundary behaves identically against this
//! store. State can be mutated between calls (new recordings, flipped repeat
//! modes, simulated outages), which is exactly what the exhaustion and
//! reload tests need.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::{AssetError, AssetRepository, ProjectDirectory, Recording, RepeatMode, Result};

#[derive(Debug)]
struct TaggedRecording {
    recording: Recording,
    tags: Vec<i64>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Insertion order is preserved; `fetch_candidates` returns it as-is so
    /// callers get a deterministic baseline to reorder.
    recordings: Vec<TaggedRecording>,
    projects: HashMap<i64, RepeatMode>,
}

/// Lock-guarded in-memory asset store.
///
/// Implements both [`AssetRepository`] and [`ProjectDirectory`]. Cloneless:
/// share it as `Arc<MemoryAssetStore>`.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    inner: RwLock<Inner>,
    unavailable: AtomicBool,
    candidate_fetches: AtomicUsize,
}

impl MemoryAssetStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an untagged recording.
    pub fn add_recording(&self, recording: Recording) {
        self.add_recording_with_tags(recording, Vec::new());
    }

    /// Adds a recording carrying the given tag ids.
    pub fn add_recording_with_tags(&self, recording: Recording, tags: Vec<i64>) {
        let mut inner = self.inner.write().unwrap();
        inner.recordings.push(TaggedRecording { recording, tags });
    }

    /// Replaces the whole recording set (tags cleared).
    pub fn set_recordings(&self, recordings: Vec<Recording>) {
        let mut inner = self.inner.write().unwrap();
        inner.recordings = recordings
            .into_iter()
            .map(|recording| TaggedRecording {
                recording,
                tags: Vec::new(),
            })
            .collect();
    }

    /// Removes a recording by id. Returns true if it was present.
    pub fn remove_recording(&self, asset_id: i64) -> bool {
        let mut inner = self.inner.write().unwrap();
        let before = inner.recordings.len();
        inner.recordings.retain(|t| t.recording.id != asset_id);
        inner.recordings.len() != before
    }

    /// Sets (or creates) a project's repeat mode.
    pub fn set_repeat_mode(&self, project_id: i64, mode: RepeatMode) {
        let mut inner = self.inner.write().unwrap();
        inner.projects.insert(project_id, mode);
    }

    /// When set, every asset fetch fails with [`AssetError::Unavailable`].
    /// Project lookups are unaffected; the directory is a separate
    /// collaborator from the asset storage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `fetch_candidates` calls served (or refused) so far.
    pub fn candidate_fetch_count(&self) -> usize {
        self.candidate_fetches.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(AssetError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl AssetRepository for MemoryAssetStore {
    async fn fetch_candidates(
        &self,
        _session_id: i64,
        tags: Option<&[i64]>,
    ) -> Result<Vec<Recording>> {
        self.candidate_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let inner = self.inner.read().unwrap();
        let candidates = inner
            .recordings
            .iter()
            .filter(|t| match tags {
                // A tagged query matches assets carrying at least one of the
                // requested tags.
                Some(wanted) => t.tags.iter().any(|tag| wanted.contains(tag)),
                None => true,
            })
            .map(|t| t.recording.clone())
            .collect();
        Ok(candidates)
    }

    async fn fetch_by_id(&self, asset_id: i64) -> Result<Recording> {
        self.check_available()?;

        let inner = self.inner.read().unwrap();
        inner
            .recordings
            .iter()
            .find(|t| t.recording.id == asset_id)
            .map(|t| t.recording.clone())
            .ok_or(AssetError::AssetNotFound(asset_id))
    }
}

#[async_trait::async_trait]
impl ProjectDirectory for MemoryAssetStore {
    async fn repeat_mode(&self, project_id: i64) -> Result<RepeatMode> {
        let inner = self.inner.read().unwrap();
        inner
            .projects
            .get(&project_id)
            .copied()
            .ok_or(AssetError::ProjectNotFound(project_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_three_recordings() -> MemoryAssetStore {
        let store = MemoryAssetStore::new();
        store.add_recording_with_tags(Recording::new(1, "a.wav"), vec![10]);
        store.add_recording_with_tags(Recording::new(2, "b.wav"), vec![20]);
        store.add_recording_with_tags(Recording::new(3, "c.wav"), vec![10, 20]);
        store
    }

    #[tokio::test]
    async fn fetch_candidates_preserves_insertion_order() {
        let store = store_with_three_recordings();
        let all = store.fetch_candidates(1, None).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn fetch_candidates_filters_by_tag_overlap() {
        let store = store_with_three_recordings();
        let tagged = store.fetch_candidates(1, Some(&[20])).await.unwrap();
        let ids: Vec<i64> = tagged.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn fetch_by_id_reports_missing_assets() {
        let store = store_with_three_recordings();
        assert!(store.fetch_by_id(2).await.is_ok());
        assert!(matches!(
            store.fetch_by_id(99).await,
            Err(AssetError::AssetNotFound(99))
        ));
    }

    #[tokio::test]
    async fn repeat_mode_reports_missing_projects() {
        let store = MemoryAssetStore::new();
        store.set_repeat_mode(5, RepeatMode::Stop);
        assert_eq!(store.repeat_mode(5).await.unwrap(), RepeatMode::Stop);
        assert!(matches!(
            store.repeat_mode(6).await,
            Err(AssetError::ProjectNotFound(6))
        ));
    }

    #[tokio::test]
    async fn outage_fails_every_fetch() {
        let store = store_with_three_recordings();
        store.set_unavailable(true);
        assert!(matches!(
            store.fetch_candidates(1, None).await,
            Err(AssetError::Unavailable(_))
        ));
        assert!(matches!(
            store.fetch_by_id(1).await,
            Err(AssetError::Unavailable(_))
        ));
        store.set_unavailable(false);
        assert_eq!(store.fetch_candidates(1, None).await.unwrap().len(), 3);
        assert_eq!(store.candidate_fetch_count(), 2);
    }
}

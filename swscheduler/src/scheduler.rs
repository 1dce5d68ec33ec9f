//! ProximityScheduler: per-session selection of the next clip to stream

use std::sync::Arc;

use swassets::{AssetRepository, ProjectDirectory, Recording};
use swgeo::GeoPosition;
use tokio::sync::Mutex;

use crate::config::SessionConfig;
use crate::ordering::OrderingPolicy;
use crate::pool::{PoolCounts, SessionPool};
use crate::Result;

/// State guarded by the session mutex: the partitioned pool plus the last
/// applied listener position (reloads reclassify against it).
struct PoolState {
    pool: SessionPool,
    listener: Option<GeoPosition>,
}

/// Proximity-aware playback scheduler for one listening session.
///
/// Owns the session's [`SessionPool`] behind a single mutex: every
/// operation, from the streaming thread's `select_next`/`has_pending` polls
/// to the control-side `listener_moved`/`insert_asset`/`reload` calls, runs
/// as one exclusive critical section, so no caller can observe a
/// half-updated partition set. Schedulers of different sessions share
/// nothing and never contend.
///
/// Share it as `Arc<ProximityScheduler>` between the streaming and control
/// actors.
pub struct ProximityScheduler {
    session_id: i64,
    project_id: i64,
    tags: Option<Vec<i64>>,
    radius_meters: f64,
    ordering: OrderingPolicy,
    repository: Arc<dyn AssetRepository>,
    projects: Arc<dyn ProjectDirectory>,
    state: Mutex<PoolState>,
}

impl ProximityScheduler {
    /// Builds the scheduler for a session.
    ///
    /// Validates the configuration, fetches the candidate set from the
    /// repository and classifies it against the initial listener position.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Validation`] on an unusable configuration,
    /// [`crate::Error::Asset`] if the initial fetch fails.
    pub async fn new(
        config: SessionConfig,
        repository: Arc<dyn AssetRepository>,
        projects: Arc<dyn ProjectDirectory>,
    ) -> Result<Self> {
        config.validate()?;

        let scheduler = Self {
            session_id: config.session_id,
            project_id: config.project_id,
            tags: config.tags,
            radius_meters: config.radius_meters,
            ordering: config.ordering,
            repository,
            projects,
            state: Mutex::new(PoolState {
                pool: SessionPool::new(),
                listener: config.listener,
            }),
        };

        {
            let mut state = scheduler.state.lock().await;
            scheduler.reload_locked(&mut state).await?;
        }

        Ok(scheduler)
    }

    /// Returns the next clip to stream, or `None` when nothing is playable.
    ///
    /// Serves the head of the unplayed pool if there is one. When the
    /// unplayed pool is exhausted but in-range clips have been played this
    /// cycle, the project's repeat mode decides what happens: `continuous`
    /// projects refill the pool from the repository (one reload, then one
    /// retry, which may still legitimately come up empty) while `stop`
    /// projects idle without touching the repository. `None` is a steady
    /// state and safe to poll.
    ///
    /// The continuous-mode refetch runs while the session lock is held; with
    /// bounded pool sizes and rare exhaustion this is an accepted contention
    /// point, but it will stretch concurrent callers if repository latency
    /// grows.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Asset`] if the repeat-mode lookup or the reload fetch
    /// fails. An unknown project is a hard error, never an implicit `stop`.
    pub async fn select_next(&self) -> Result<Option<Arc<Recording>>> {
        let mut state = self.state.lock().await;

        if let Some(recording) = state.pool.pop_next() {
            tracing::debug!("Session {}: serving {}", self.session_id, recording.filename);
            return Ok(Some(recording));
        }

        if state.pool.counts().nearby_played == 0 {
            // Nothing in range at all; nothing to repeat either.
            return Ok(None);
        }

        let mode = self.projects.repeat_mode(self.project_id).await?;
        tracing::debug!("Repeat mode for project {}: {}", self.project_id, mode);
        if !mode.is_continuous() {
            return Ok(None);
        }

        tracing::info!(
            "Session {}: in-range clips exhausted, reloading from repository",
            self.session_id
        );
        self.reload_locked(&mut state).await?;

        match state.pool.pop_next() {
            Some(recording) => {
                tracing::debug!("Session {}: serving {}", self.session_id, recording.filename);
                Ok(Some(recording))
            }
            None => {
                tracing::debug!(
                    "Session {}: reload produced nothing in range",
                    self.session_id
                );
                Ok(None)
            }
        }
    }

    /// Discards the pool and repeats the fetch-then-classify sequence
    /// against the last known listener position.
    ///
    /// All-or-nothing: if the fetch fails the pool keeps its previous
    /// contents.
    pub async fn reload(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.reload_locked(&mut state).await
    }

    /// Fetches an asset by id and pushes it onto the head of the unplayed
    /// pool, bypassing the ordering policy.
    ///
    /// The inserted clip is guaranteed to be the next one returned by
    /// [`select_next`](Self::select_next).
    ///
    /// # Errors
    ///
    /// [`swassets::AssetError::AssetNotFound`] (wrapped) if the id is
    /// unknown; the pool is left unchanged.
    pub async fn insert_asset(&self, asset_id: i64) -> Result<()> {
        let mut state = self.state.lock().await;
        let recording = self.repository.fetch_by_id(asset_id).await?;
        tracing::debug!(
            "Session {}: priority insertion of asset {} ({})",
            self.session_id,
            asset_id,
            recording.filename
        );
        state.pool.push_priority(recording);
        Ok(())
    }

    /// Applies a listener movement: reclassifies every clip against the new
    /// position and reorders the unplayed pool.
    ///
    /// `None` means the listener stopped reporting a position; every clip
    /// then classifies as in range.
    pub async fn listener_moved(&self, position: Option<GeoPosition>) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.listener = position;
        state
            .pool
            .reclassify(state.listener.as_ref(), self.radius_meters, self.ordering);
        self.log_counts(&state.pool);
    }

    /// True if the session has unplayed, in-range clips left.
    pub async fn has_pending(&self) -> bool {
        let state = self.state.lock().await;
        state.pool.has_pending()
    }

    /// Filenames of the unplayed clips in serve order, for diagnostics.
    ///
    /// The snapshot is assembled under the session lock and owned by the
    /// caller, so it can be iterated (and re-iterated) freely afterwards.
    pub async fn unplayed_filenames(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state.pool.unplayed_filenames()
    }

    /// Current partition sizes, for diagnostics.
    pub async fn counts(&self) -> PoolCounts {
        let state = self.state.lock().await;
        state.pool.counts()
    }

    /// Identity of the session this scheduler serves.
    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    /// Project the session belongs to.
    pub fn project_id(&self) -> i64 {
        self.project_id
    }

    /// Configured audibility radius in meters.
    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    /// Ordering policy fixed at construction.
    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    /// Fetch-then-swap refill of the pool, shared by construction, explicit
    /// reloads and the continuous-mode exhaustion path. The caller holds the
    /// session lock. A failed fetch returns before the pool is touched.
    async fn reload_locked(&self, state: &mut PoolState) -> Result<()> {
        let candidates = self
            .repository
            .fetch_candidates(self.session_id, self.tags.as_deref())
            .await?;
        tracing::debug!(
            "Session {}: fetched {} candidate clips",
            self.session_id,
            candidates.len()
        );

        state.pool.seed(candidates);
        state
            .pool
            .reclassify(state.listener.as_ref(), self.radius_meters, self.ordering);
        self.log_counts(&state.pool);
        Ok(())
    }

    fn log_counts(&self, pool: &SessionPool) {
        let counts = pool.counts();
        tracing::debug!(
            "Session {}: far {}, nearby unplayed {}, nearby played {}",
            self.session_id,
            counts.far,
            counts.nearby_unplayed,
            counts.nearby_played
        );
    }
}

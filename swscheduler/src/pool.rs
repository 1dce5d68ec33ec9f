//! Session pool: the three-way partition of a session's candidate clips

use std::collections::VecDeque;
use std::mem;
use std::sync::Arc;

use swassets::Recording;
use swgeo::GeoPosition;

use crate::ordering::OrderingPolicy;
use crate::proximity::is_audible;

/// Partition sizes, for diagnostics and invariant checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolCounts {
    pub far: usize,
    pub nearby_unplayed: usize,
    pub nearby_played: usize,
}

impl PoolCounts {
    /// Total number of clips across all three partitions.
    pub fn total(&self) -> usize {
        self.far + self.nearby_unplayed + self.nearby_played
    }
}

/// The candidate clips of one listening session, partitioned into three
/// disjoint pools:
///
/// - `far`: out of range, not playable right now
/// - `nearby_unplayed`: in range, not yet served this cycle, in serve order
/// - `nearby_played`: in range, already served this cycle
///
/// Every clip from the last repository fetch is in exactly one pool at any
/// time. `SessionPool` itself is not synchronized; the scheduler owns one
/// behind its session mutex.
#[derive(Debug, Default)]
pub struct SessionPool {
    far: Vec<Arc<Recording>>,
    nearby_unplayed: VecDeque<Arc<Recording>>,
    nearby_played: Vec<Arc<Recording>>,
}

impl SessionPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pool contents with a fresh candidate set.
    ///
    /// Everything lands in `far`; call [`reclassify`](Self::reclassify) to
    /// bring the in-range clips into play.
    pub fn seed(&mut self, candidates: Vec<Recording>) {
        self.far = candidates.into_iter().map(Arc::new).collect();
        self.nearby_unplayed.clear();
        self.nearby_played.clear();
    }

    /// Re-runs the proximity classifier over all three partitions.
    ///
    /// Clips that came into range join the unplayed pool; clips that left
    /// range drop back to `far` whatever their play status; clips still in
    /// range keep their partition. The ordering policy is applied to the
    /// resulting unplayed pool only.
    pub fn reclassify(
        &mut self,
        listener: Option<&GeoPosition>,
        radius_meters: f64,
        ordering: OrderingPolicy,
    ) {
        let mut far = Vec::new();
        let mut unplayed = Vec::new();
        let mut played = Vec::new();

        for recording in mem::take(&mut self.far) {
            if is_audible(listener, radius_meters, &recording) {
                unplayed.push(recording);
            } else {
                far.push(recording);
            }
        }

        for recording in mem::take(&mut self.nearby_unplayed) {
            if is_audible(listener, radius_meters, &recording) {
                unplayed.push(recording);
            } else {
                far.push(recording);
            }
        }

        for recording in mem::take(&mut self.nearby_played) {
            if is_audible(listener, radius_meters, &recording) {
                played.push(recording);
            } else {
                far.push(recording);
            }
        }

        ordering.apply(&mut unplayed);

        self.far = far;
        self.nearby_unplayed = unplayed.into();
        self.nearby_played = played;
    }

    /// Takes the next clip in serve order, moving it to the played pool.
    pub fn pop_next(&mut self) -> Option<Arc<Recording>> {
        let recording = self.nearby_unplayed.pop_front()?;
        self.nearby_played.push(recording.clone());
        Some(recording)
    }

    /// Pushes a clip onto the head of the unplayed pool, bypassing the
    /// ordering policy. It will be the next clip served.
    pub fn push_priority(&mut self, recording: Recording) {
        self.nearby_unplayed.push_front(Arc::new(recording));
    }

    /// True if the pool has clips left to serve this cycle.
    pub fn has_pending(&self) -> bool {
        !self.nearby_unplayed.is_empty()
    }

    /// Filenames of the unplayed clips, in serve order.
    pub fn unplayed_filenames(&self) -> Vec<String> {
        self.nearby_unplayed
            .iter()
            .map(|recording| recording.filename.clone())
            .collect()
    }

    /// Current partition sizes.
    pub fn counts(&self) -> PoolCounts {
        PoolCounts {
            far: self.far.len(),
            nearby_unplayed: self.nearby_unplayed.len(),
            nearby_played: self.nearby_played.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(id: i64, latitude: f64) -> Recording {
        Recording::new(id, format!("clip-{}.wav", id))
            .with_position(GeoPosition::new(latitude, 0.0))
    }

    /// ~meters of northward offset expressed in degrees of latitude.
    fn north(meters: f64) -> f64 {
        meters / 111_195.0
    }

    #[test]
    fn seed_puts_everything_far() {
        let mut pool = SessionPool::new();
        pool.seed(vec![clip(1, 0.0), clip(2, north(500.0))]);
        let counts = pool.counts();
        assert_eq!(counts.far, 2);
        assert_eq!(counts.nearby_unplayed, 0);
        assert_eq!(counts.nearby_played, 0);
        assert!(!pool.has_pending());
    }

    #[test]
    fn reclassify_partitions_by_distance() {
        let mut pool = SessionPool::new();
        pool.seed(vec![clip(1, 0.0), clip(2, north(500.0))]);
        let listener = GeoPosition::new(0.0, 0.0);
        pool.reclassify(Some(&listener), 100.0, OrderingPolicy::ByLikeCount);

        let counts = pool.counts();
        assert_eq!(counts.far, 1);
        assert_eq!(counts.nearby_unplayed, 1);
        assert_eq!(pool.unplayed_filenames(), vec!["clip-1.wav"]);
    }

    #[test]
    fn pop_next_moves_clip_to_played() {
        let mut pool = SessionPool::new();
        pool.seed(vec![clip(1, 0.0)]);
        pool.reclassify(None, 100.0, OrderingPolicy::ByLikeCount);

        let served = pool.pop_next().unwrap();
        assert_eq!(served.id, 1);
        let counts = pool.counts();
        assert_eq!(counts.nearby_unplayed, 0);
        assert_eq!(counts.nearby_played, 1);
        assert!(pool.pop_next().is_none());
    }

    #[test]
    fn priority_insertion_goes_to_the_head() {
        let mut pool = SessionPool::new();
        pool.seed(vec![clip(1, 0.0), clip(2, 0.0)]);
        pool.reclassify(None, 100.0, OrderingPolicy::ByLikeCount);

        pool.push_priority(Recording::new(99, "urgent.wav"));
        assert_eq!(pool.pop_next().unwrap().id, 99);
    }

    #[test]
    fn played_clip_leaving_range_comes_back_unplayed() {
        let mut pool = SessionPool::new();
        pool.seed(vec![clip(1, 0.0)]);
        let origin = GeoPosition::new(0.0, 0.0);
        pool.reclassify(Some(&origin), 100.0, OrderingPolicy::ByLikeCount);
        pool.pop_next().unwrap();
        assert_eq!(pool.counts().nearby_played, 1);

        // Walk away: the played clip drops back to far
        let away = GeoPosition::new(north(5_000.0), 0.0);
        pool.reclassify(Some(&away), 100.0, OrderingPolicy::ByLikeCount);
        assert_eq!(pool.counts().far, 1);
        assert_eq!(pool.counts().nearby_played, 0);

        // Walk back: it re-enters as unplayed, ready for another cycle
        pool.reclassify(Some(&origin), 100.0, OrderingPolicy::ByLikeCount);
        assert_eq!(pool.counts().nearby_unplayed, 1);
    }

    #[test]
    fn reclassify_never_loses_or_duplicates_clips() {
        let mut pool = SessionPool::new();
        pool.seed(vec![
            clip(1, 0.0),
            clip(2, north(50.0)),
            clip(3, north(500.0)),
            Recording::new(4, "nowhere.wav"),
        ]);
        let listener = GeoPosition::new(0.0, 0.0);

        for radius in [10.0, 100.0, 1_000.0] {
            pool.reclassify(Some(&listener), radius, OrderingPolicy::Random);
            assert_eq!(pool.counts().total(), 4);
        }
        pool.reclassify(None, 10.0, OrderingPolicy::Random);
        assert_eq!(pool.counts().total(), 4);
        // Without a listener position everything is audible
        assert_eq!(pool.counts().nearby_unplayed, 4);
    }
}

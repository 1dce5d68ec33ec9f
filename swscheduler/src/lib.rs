//! # swscheduler - Proximity-aware playback scheduler
//!
//! This crate decides which pre-recorded clip a listening session streams
//! next, based on the listener's position, each clip's play status and a
//! configurable ordering policy.
//!
//! # Architecture
//!
//! - **[`ProximityScheduler`]** : one per active session; owns the session
//!   pool behind a single mutex and serves `select_next` to the streaming
//!   actor while control actors feed it movement updates and priority
//!   insertions
//! - **[`SessionPool`]** : the three-way partition (far / nearby unplayed /
//!   nearby played) every candidate clip lives in
//! - **[`OrderingPolicy`]** : pluggable serve-order strategy (random,
//!   by like count, by weight) fixed at session construction
//! - **[`SessionConfig`]** : the configuration surface handed over by the
//!   surrounding streaming service
//!
//! The persistent storage sits behind the [`swassets`] adapter traits; the
//! geodesic distance comes from [`swgeo`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use swassets::{MemoryAssetStore, Recording, RepeatMode};
//! use swgeo::GeoPosition;
//! use swscheduler::{OrderingPolicy, ProximityScheduler, SessionConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> swscheduler::Result<()> {
//! let store = Arc::new(MemoryAssetStore::new());
//! store.set_repeat_mode(7, RepeatMode::Stop);
//! store.add_recording(
//!     Recording::new(1, "fountain.wav")
//!         .with_position(GeoPosition::new(42.3601, -71.0589))
//!         .with_weight(2.0),
//! );
//!
//! let config = SessionConfig::new(42, 7, 50.0)
//!     .with_ordering(OrderingPolicy::ByWeight)
//!     .with_listener(GeoPosition::new(42.3601, -71.0589));
//!
//! let scheduler = ProximityScheduler::new(config, store.clone(), store).await?;
//! let next = scheduler.select_next().await?;
//! assert_eq!(next.unwrap().filename, "fountain.wav");
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod ordering;
mod pool;
mod proximity;
mod scheduler;

pub use config::SessionConfig;
pub use error::{Error, Result};
pub use ordering::OrderingPolicy;
pub use pool::{PoolCounts, SessionPool};
pub use proximity::is_audible;
pub use scheduler::ProximityScheduler;

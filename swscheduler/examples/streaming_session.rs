//! Simulated walk through a sound installation
//!
//! This example demonstrates:
//! - Building a scheduler over an in-memory asset store
//! - A streaming task polling `select_next` while a control task moves the
//!   listener along a path
//! - A priority insertion jumping the queue
//!
//! To run:
//! ```bash
//! cargo run -p swscheduler --example streaming_session
//! ```

use std::sync::Arc;
use std::time::Duration;

use swassets::{MemoryAssetStore, Recording, RepeatMode};
use swgeo::GeoPosition;
use swscheduler::{OrderingPolicy, ProximityScheduler, SessionConfig};
use tokio::time::sleep;

/// ~meters of northward offset expressed in degrees of latitude.
fn north(meters: f64) -> f64 {
    meters / 111_195.0
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swscheduler=debug".into()),
        )
        .init();

    println!("=== SoundWalk session simulation ===\n");

    // A small installation: four clips strung out every 80 meters
    let store = Arc::new(MemoryAssetStore::new());
    store.set_repeat_mode(1, RepeatMode::Continuous);
    for (id, meters) in [(1, 0.0), (2, 80.0), (3, 160.0), (4, 240.0)] {
        store.add_recording(
            Recording::new(id, format!("station-{}.wav", id))
                .with_position(GeoPosition::new(north(meters), 0.0))
                .with_weight(id as f64),
        );
    }

    let config = SessionConfig::new(1001, 1, 100.0)
        .with_ordering(OrderingPolicy::ByWeight)
        .with_listener(GeoPosition::new(0.0, 0.0));

    let scheduler = Arc::new(ProximityScheduler::new(config, store.clone(), store).await?);
    println!(
        "Session {} started, {} clips pending nearby\n",
        scheduler.session_id(),
        scheduler.unplayed_filenames().await.len()
    );

    // Control task: the listener walks north, 40 m every tick
    let walker = {
        let scheduler = scheduler.clone();
        tokio::spawn(async move {
            for step in 1..=8 {
                sleep(Duration::from_millis(150)).await;
                let position = GeoPosition::new(north(step as f64 * 40.0), 0.0);
                scheduler.listener_moved(Some(position)).await;
                println!("[walker] moved to {} m north", step * 40);
            }
        })
    };

    // Streaming task: keep asking for the next clip
    let streamer = {
        let scheduler = scheduler.clone();
        tokio::spawn(async move {
            for _ in 0..10 {
                match scheduler.select_next().await {
                    Ok(Some(recording)) => {
                        println!("[stream] now playing {}", recording.filename)
                    }
                    Ok(None) => println!("[stream] nothing in range"),
                    Err(e) => println!("[stream] error: {}", e),
                }
                sleep(Duration::from_millis(200)).await;
            }
        })
    };

    sleep(Duration::from_millis(500)).await;

    // An operator pushes one clip to the front of the queue
    println!("\n[control] priority insertion of station-4.wav");
    scheduler.insert_asset(4).await?;

    walker.await?;
    streamer.await?;

    let counts = scheduler.counts().await;
    println!(
        "\nDone: far {}, nearby unplayed {}, nearby played {}",
        counts.far, counts.nearby_unplayed, counts.nearby_played
    );

    Ok(())
}

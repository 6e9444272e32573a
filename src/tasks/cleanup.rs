//! Expiry Purge Task
//!
//! Background task that periodically removes expired engine entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::MemoryEngine;

/// Spawns a background task that periodically purges expired engine entries.
///
/// Reads already hide expired entries; this only reclaims their memory.
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
pub fn spawn_cleanup_task(engine: Arc<MemoryEngine>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry purge task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            if engine.is_closed() {
                debug!("engine closed, stopping purge task");
                break;
            }

            let removed = engine.purge_expired();
            if removed > 0 {
                info!("Expiry purge: removed {} expired entries", removed);
            } else {
                debug!("Expiry purge: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::expiry::{FakeClock, Ttl};

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let clock = Arc::new(FakeClock::default());
        let engine = Arc::new(MemoryEngine::new(clock.clone()));

        engine
            .create("expire_soon", b"value".to_vec(), Ttl::After(Duration::from_secs(1)))
            .unwrap();
        clock.advance(chrono::Duration::seconds(2));

        let handle = spawn_cleanup_task(engine.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(engine.is_empty(), "Expired entry should have been purged");
        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let clock = Arc::new(FakeClock::default());
        let engine = Arc::new(MemoryEngine::new(clock.clone()));

        engine
            .create("long_lived", b"value".to_vec(), Ttl::After(Duration::from_secs(3600)))
            .unwrap();

        let handle = spawn_cleanup_task(engine.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(engine.get("long_lived").unwrap(), b"value");
        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_stops_after_close() {
        let clock = Arc::new(FakeClock::default());
        let engine = Arc::new(MemoryEngine::new(clock));

        let handle = spawn_cleanup_task(engine.clone(), 1);
        engine.close().unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(handle.is_finished(), "Task should stop once the engine is closed");
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let clock = Arc::new(FakeClock::default());
        let engine = Arc::new(MemoryEngine::new(clock));

        let handle = spawn_cleanup_task(engine, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}

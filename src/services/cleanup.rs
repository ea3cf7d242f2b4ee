//! Periodic expiry sweep.
//!
//! The deletion contract lives in [`MapperService::expire_sweep`]; this task
//! is only the trigger. It runs on a fixed tokio interval and logs what each
//! pass removed.

use std::sync::Arc;

use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

use super::MapperService;

pub struct CleanupTask {
    service: Arc<MapperService>,
    sweep_interval: Duration,
}

impl CleanupTask {
    pub fn new(service: Arc<MapperService>, sweep_interval: Duration) -> Self {
        Self {
            service,
            sweep_interval,
        }
    }

    /// Run forever, sweeping once per interval. Spawn this onto the runtime.
    pub async fn run(self) {
        info!(
            "CleanupTask: sweeping expired mappings every {:?}",
            self.sweep_interval
        );

        let mut ticker = interval(self.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so startup stays quick.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match self.service.expire_sweep(chrono::Utc::now()).await {
                Ok(deleted) if deleted > 0 => {
                    info!("CleanupTask: deleted {} expired mappings", deleted);
                }
                Ok(_) => {}
                Err(e) => {
                    // Transient store trouble; next tick retries.
                    error!("CleanupTask: sweep failed: {}", e);
                }
            }
        }
    }
}

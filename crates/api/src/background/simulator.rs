//! Admin-toggleable demo load simulator.
//!
//! While running, the simulator random-walks every location's occupancy on a
//! fixed tick and recomputes a plausible wait time from the resulting
//! occupancy percentage. Each tick publishes a `locations.simulated` event so
//! connected clients see the map move in near real time.
//!
//! The walk is intentionally bounded away from both empty and full: demo
//! audiences should see all three status tiers without any location pinning
//! at 0 or max.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use smartqueue_db::repositories::LocationRepo;
use smartqueue_db::DbPool;
use smartqueue_events::{names, EventBus, QueueEvent};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Largest per-tick occupancy change in either direction.
const MAX_STEP: i32 = 15;

/// Lower clamp for simulated occupancy (keeps small rooms visibly occupied).
const FLOOR_OCCUPANCY: i32 = 10;

/// Wait time is modelled as this fraction of the occupancy percentage.
const WAIT_PER_PERCENT: f64 = 0.3;

/// Controls the demo occupancy random walk.
///
/// At most one walk task runs at a time; `start` is a no-op when one is
/// already active, and `stop` cancels the active task via its
/// [`CancellationToken`].
pub struct DemoSimulator {
    pool: DbPool,
    event_bus: Arc<EventBus>,
    tick: Duration,
    running: Mutex<Option<CancellationToken>>,
}

impl DemoSimulator {
    /// Create a stopped simulator.
    pub fn new(pool: DbPool, event_bus: Arc<EventBus>, tick_secs: u64) -> Self {
        Self {
            pool,
            event_bus,
            tick: Duration::from_secs(tick_secs),
            running: Mutex::new(None),
        }
    }

    /// Whether a walk task is currently active.
    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Start the walk task. Returns `false` if one was already running.
    pub async fn start(self: &Arc<Self>) -> bool {
        let mut guard = self.running.lock().await;
        if guard.is_some() {
            return false;
        }

        let cancel = CancellationToken::new();
        *guard = Some(cancel.clone());
        drop(guard);

        let sim = Arc::clone(self);
        tokio::spawn(async move {
            sim.run(cancel).await;
        });

        tracing::info!(tick_secs = self.tick.as_secs(), "Demo simulator started");
        true
    }

    /// Cancel the walk task. Returns `false` if none was running.
    pub async fn stop(&self) -> bool {
        let mut guard = self.running.lock().await;
        match guard.take() {
            Some(cancel) => {
                cancel.cancel();
                tracing::info!("Demo simulator stopped");
                true
            }
            None => false,
        }
    }

    /// The walk loop. Runs until `cancel` is triggered.
    async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.tick);
        // The first tick fires immediately; skip it so start() returns
        // before any occupancy changes.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Demo simulator walk cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.step().await {
                        tracing::error!(error = %e, "Demo simulator tick failed");
                    }
                }
            }
        }
    }

    /// Apply one random-walk step to every location and publish the event.
    async fn step(&self) -> Result<(), sqlx::Error> {
        let locations = LocationRepo::list(&self.pool).await?;

        for loc in &locations {
            let delta: i32 = rand::rng().random_range(-MAX_STEP..=MAX_STEP);
            let ceiling = (loc.max_capacity - 2).max(1);
            let floor = FLOOR_OCCUPANCY.min(ceiling);
            let occupancy = (loc.current_occupancy + delta).clamp(floor, ceiling);

            let percent = f64::from(occupancy) / f64::from(loc.max_capacity.max(1)) * 100.0;
            let wait = ((percent * WAIT_PER_PERCENT).round() as i32).max(1);

            LocationRepo::set_demo_state(&self.pool, &loc.id, occupancy, wait).await?;
        }

        self.event_bus
            .publish(QueueEvent::new(names::LOCATIONS_SIMULATED));
        Ok(())
    }
}

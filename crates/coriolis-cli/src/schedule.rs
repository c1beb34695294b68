//! Fixed-interval task runner.
//!
//! The first run happens immediately, later runs every `interval`. Runs that
//! fall behind are skipped rather than bursted. A failing run is logged and
//! the loop carries on with the next tick.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

/// When and how often to run.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    pub interval: Duration,
    /// Stop after this many runs (`None` runs until shutdown).
    pub max_ticks: Option<u64>,
}

/// Run `task` on every tick until `shutdown` resolves or `max_ticks` runs
/// have happened. Returns the number of runs.
///
/// `interval` must be non-zero.
pub async fn run<F, E, S>(schedule: Schedule, mut task: F, shutdown: S) -> u64
where
    F: FnMut(u64) -> Result<(), E>,
    E: Display,
    S: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(schedule.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut ticks = 0u64;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                log::info!("scheduler stopping after {ticks} run(s)");
                break;
            }
            _ = ticker.tick() => {
                ticks += 1;
                log::info!("executing scheduled task (run {ticks})");
                if let Err(e) = task(ticks) {
                    log::error!("scheduled run {ticks} failed: {e}");
                }
                if schedule.max_ticks.is_some_and(|max| ticks >= max) {
                    break;
                }
            }
        }
    }
    ticks
}

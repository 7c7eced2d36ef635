//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Weak;
use std::thread;
use std::time::Duration;

use tokio::runtime::Builder;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

/// Storage that can drop its own expired entries.
///
/// The sweep task only ever sees a cache through this trait.
pub trait Sweep: Send + Sync + 'static {
    /// Removes every entry that is expired right now.
    ///
    /// Returns the number of entries removed.
    fn sweep_expired(&self) -> usize;
}

/// Handle to a running sweep thread.
#[derive(Debug)]
pub struct SweepHandle {
    thread: thread::JoinHandle<()>,
}

impl SweepHandle {
    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}

/// Spawns a background task that sweeps `target` every `interval`.
///
/// The task holds only a weak reference and exits on the first tick after the
/// target has been dropped. An empty cache keeps being swept, so entries
/// inserted later are still reclaimed.
///
/// The task always runs on its own `cache-sweep` thread driving a
/// current-thread runtime with timers enabled. Any runtime the caller happens
/// to be inside is never used, so the sweep outlives it and works even when
/// that runtime has no time driver. Returns `None` when the interval is zero
/// or no thread could be started.
///
/// # Example
/// ```ignore
/// let handle = spawn_sweep_task(Arc::downgrade(&shared), Duration::from_secs(1));
/// ```
pub fn spawn_sweep_task<S: Sweep>(target: Weak<S>, interval: Duration) -> Option<SweepHandle> {
    if interval.is_zero() {
        return None;
    }

    let spawned = thread::Builder::new()
        .name("cache-sweep".to_string())
        .spawn(move || match Builder::new_current_thread().enable_time().build() {
            Ok(runtime) => runtime.block_on(run(target, interval)),
            Err(err) => warn!(error = %err, "Failed to build sweep runtime, expired entries will not be swept"),
        });

    match spawned {
        Ok(thread) => Some(SweepHandle { thread }),
        Err(err) => {
            warn!(error = %err, "Failed to spawn sweep thread, expired entries will not be swept");
            None
        }
    }
}

async fn run<S: Sweep>(target: Weak<S>, interval: Duration) {
    info!(?interval, "Starting expiry sweep task");

    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let Some(cache) = target.upgrade() else {
            debug!("Cache dropped, stopping expiry sweep task");
            return;
        };
        let removed = cache.sweep_expired();
        drop(cache);

        if removed > 0 {
            debug!(removed, "Expiry sweep removed expired entries");
        } else {
            trace!("Expiry sweep: no expired entries found");
        }
    }
}

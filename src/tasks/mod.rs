//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside a cache.
//!
//! # Tasks
//! - Expiry sweep: Removes expired cache entries at a fixed interval

mod sweep;

pub use sweep::{spawn_sweep_task, Sweep, SweepHandle};

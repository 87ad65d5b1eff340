//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the data
//! access layer.
//!
//! # Tasks
//! - Cache purge: sweeps expired entries once the cache grows past a
//!   size threshold

mod purge;

pub use purge::spawn_purge_task;

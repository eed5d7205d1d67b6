//! Scheduled supplier sync for FeedHub.
//!
//! This crate provides:
//! - A cron scheduler that sweeps for suppliers whose schedule is due
//! - The sweep job that syncs due suppliers with bounded concurrency

pub mod jobs;
pub mod scheduler;

pub use jobs::sync::ScheduledSyncJob;
pub use scheduler::CronScheduler;

//! Scheduled job implementations.

pub mod sync;

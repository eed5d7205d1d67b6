//! Supplier (feed source) entities.

pub mod credentials;
pub mod model;
pub mod schedule;
pub mod status;

pub use credentials::FeedCredentials;
pub use model::{CreateSupplier, SourceType, Supplier, UpdateSupplier};
pub use schedule::SyncSchedule;
pub use status::SupplierStatus;

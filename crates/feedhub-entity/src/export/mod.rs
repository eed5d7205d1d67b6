//! Export profile entities.

pub mod model;

pub use model::{CreateExportProfile, DeliveryMethod, ExportProfile, UpdateExportProfile};

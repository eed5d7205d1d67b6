//! # feedhub-service
//!
//! Business logic service layer for FeedHub. Each service orchestrates
//! repositories, feed storage, the HTTP feed fetcher and the pure
//! transformation layer in `feedhub-feed` to implement application use
//! cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. Every workspace-scoped call
//! takes a [`RequestContext`] whose workspace membership has already been
//! verified.

pub mod category;
pub mod context;
pub mod export;
pub mod fetch;
pub mod field;
pub mod ingestion;
pub mod mapping;
pub mod product;
pub mod supplier;
pub mod workspace;

pub use category::CategoryService;
pub use context::RequestContext;
pub use export::ExportService;
pub use fetch::FeedFetcher;
pub use field::FieldService;
pub use ingestion::IngestionService;
pub use mapping::MappingService;
pub use product::ProductService;
pub use supplier::{FeedSourceLoader, SupplierService};
pub use workspace::WorkspaceService;

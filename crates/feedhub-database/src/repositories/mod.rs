//! Repository implementations for all FeedHub entities.

pub mod category;
pub mod export;
pub mod field;
pub mod ingestion;
pub mod mapping;
pub mod product;
pub mod supplier;
pub mod workspace;

pub use category::CategoryRepository;
pub use export::ExportProfileRepository;
pub use field::CustomFieldRepository;
pub use ingestion::IngestionRepository;
pub use mapping::FieldMappingRepository;
pub use product::{MappedProductRepository, RawProductRepository};
pub use supplier::SupplierRepository;
pub use workspace::WorkspaceRepository;

/// Whether `err` is a violation of the named constraint or unique index.
pub(crate) fn violates(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint() == Some(constraint),
        _ => false,
    }
}

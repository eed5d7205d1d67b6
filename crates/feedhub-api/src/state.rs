//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use feedhub_auth::JwtDecoder;
use feedhub_core::config::AppConfig;
use feedhub_core::result::AppResult;
use feedhub_core::traits::storage::StorageProvider;
use feedhub_database::DatabasePool;
use feedhub_database::repositories::{
    CategoryRepository, CustomFieldRepository, ExportProfileRepository, FieldMappingRepository,
    IngestionRepository, MappedProductRepository, RawProductRepository, SupplierRepository,
    WorkspaceRepository,
};
use feedhub_service::{
    CategoryService, ExportService, FeedFetcher, FeedSourceLoader, FieldService, IngestionService,
    MappingService, ProductService, SupplierService, WorkspaceService,
};
use feedhub_storage::FeedStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db: DatabasePool,
    /// Supplier repository, shared with the scheduled sweep
    pub supplier_repo: Arc<SupplierRepository>,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token verifier
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Workspace and membership service
    pub workspace_service: Arc<WorkspaceService>,
    /// Supplier service
    pub supplier_service: Arc<SupplierService>,
    /// Ingestion pipeline
    pub ingestion_service: Arc<IngestionService>,
    /// Field mapping service
    pub mapping_service: Arc<MappingService>,
    /// Custom field service
    pub field_service: Arc<FieldService>,
    /// Product listing service
    pub product_service: Arc<ProductService>,
    /// Category service
    pub category_service: Arc<CategoryService>,
    /// Export profile service
    pub export_service: Arc<ExportService>,
}

impl AppState {
    /// Wire repositories and services over a pool and a storage provider.
    pub fn build(
        config: AppConfig,
        db: DatabasePool,
        storage: Arc<dyn StorageProvider>,
    ) -> AppResult<Self> {
        let pool = db.pool().clone();

        let workspace_repo = Arc::new(WorkspaceRepository::new(pool.clone()));
        let supplier_repo = Arc::new(SupplierRepository::new(pool.clone()));
        let ingestion_repo = Arc::new(IngestionRepository::new(pool.clone()));
        let raw_repo = Arc::new(RawProductRepository::new(pool.clone()));
        let mapped_repo = Arc::new(MappedProductRepository::new(pool.clone()));
        let field_repo = Arc::new(CustomFieldRepository::new(pool.clone()));
        let mapping_repo = Arc::new(FieldMappingRepository::new(pool.clone()));
        let category_repo = Arc::new(CategoryRepository::new(pool.clone()));
        let export_repo = Arc::new(ExportProfileRepository::new(pool));

        let store = FeedStore::new(storage, config.storage.feeds_bucket.clone());
        let fetcher = Arc::new(FeedFetcher::new(&config.feed)?);
        let loader = Arc::new(FeedSourceLoader::new(
            fetcher,
            store,
            config.feed.sample_bytes,
        ));

        let mapping_service = Arc::new(MappingService::new(
            Arc::clone(&supplier_repo),
            Arc::clone(&field_repo),
            mapping_repo,
            Arc::clone(&raw_repo),
            Arc::clone(&mapped_repo),
            Arc::clone(&category_repo),
            config.feed.clone(),
        ));
        let ingestion_service = Arc::new(IngestionService::new(
            Arc::clone(&supplier_repo),
            ingestion_repo,
            Arc::clone(&raw_repo),
            Arc::clone(&loader),
            Arc::clone(&mapping_service),
            config.feed.clone(),
        ));
        let supplier_service = Arc::new(SupplierService::new(
            Arc::clone(&supplier_repo),
            loader,
            config.feed.clone(),
            config.storage.max_upload_bytes,
        ));
        let product_service = Arc::new(ProductService::new(
            Arc::clone(&supplier_repo),
            raw_repo,
            Arc::clone(&mapped_repo),
            Arc::clone(&category_repo),
        ));
        let export_service = Arc::new(ExportService::new(
            export_repo,
            Arc::clone(&field_repo),
            mapped_repo,
            config.server.clone(),
        ));

        Ok(Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            workspace_service: Arc::new(WorkspaceService::new(workspace_repo)),
            field_service: Arc::new(FieldService::new(field_repo)),
            category_service: Arc::new(CategoryService::new(category_repo)),
            supplier_service,
            ingestion_service,
            mapping_service,
            product_service,
            export_service,
            supplier_repo,
            db,
            config: Arc::new(config),
        })
    }
}

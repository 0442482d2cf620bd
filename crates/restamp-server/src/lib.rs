//! HTTP facade for the invoice re-stamping service.
//!
//! Exposes the core library over REST:
//!
//! - `GET  /health`
//! - `GET  /api/next-invoice-number`
//! - `POST /api/parse-filename`
//! - `POST /api/extract-reference`
//! - `POST /api/preview`
//! - `POST /api/process-invoice`
//! - `GET  /api/preview-processed/:filename`
//! - `GET  /api/download/:filename`
//!
//! All ledger mutation is funneled through a single in-process lock so
//! concurrent requests cannot interleave the ledger's read-modify-write.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod storage;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use restamp_core::{InvoiceLedger, RestampConfig};

use crate::handlers::{files, health, invoice};
use crate::storage::Storage;

/// Application state shared across handlers.
pub struct AppState {
    pub config: RestampConfig,
    pub storage: Storage,
    /// Single writer for the invoice-number ledger.
    pub ledger: Mutex<InvoiceLedger>,
}

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build the shared state and create the storage directories.
    pub fn new(config: RestampConfig) -> std::io::Result<SharedState> {
        let storage = Storage::new(&config.storage);
        storage.ensure_dirs()?;

        let ledger = InvoiceLedger::new(
            config.ledger.file.clone(),
            config.ledger.starting_number,
        );

        Ok(Arc::new(Self {
            config,
            storage,
            ledger: Mutex::new(ledger),
        }))
    }
}

/// Creates the main API router.
pub fn create_router(state: SharedState) -> Router {
    let max_upload = state.config.server.max_upload_bytes;

    let api_routes = Router::new()
        .route("/next-invoice-number", get(invoice::next_invoice_number))
        .route("/parse-filename", post(invoice::parse_filename))
        .route("/extract-reference", post(invoice::extract_reference))
        .route("/process-invoice", post(invoice::process_invoice))
        .route("/preview", post(files::preview_upload))
        .route("/preview-processed/:filename", get(files::preview_processed))
        .route("/download/:filename", get(files::download));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

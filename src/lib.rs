//! Import of restaurant menus from PDF documents.
//!
//! Text pulled out of a PDF is first deciphered (some menus come out with
//! their character codes shifted by one), then parsed line by line into
//! categories and priced items.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod decipher;
pub mod error;
pub mod extract;
pub mod import;
pub mod lambda;
pub mod pdf;
pub mod plan;
pub mod routes;
pub mod state;

pub use decipher::{decipher_text, decipher_token};
pub use error::{AppError, ImportError};
pub use extract::{ParsedCategory, ParsedItem, ParsedMenu, parse_menu_text};
pub use import::{ImportReport, import_pdf, import_text, import_url};
pub use plan::SubscriptionPlan;
pub use state::AppState;

const DEFAULT_LOG_FILTER: &str = "menu_import=info,tower_http=info";

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt().with_env_filter(filter).init();
}

/// Installs the rustls crypto provider used by the HTTP client.
pub fn install_crypto_provider() {
    // Fails only when a provider is already installed.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(routes::health))
        .route("/import/pdf", post(routes::import_pdf_handler))
        .route("/import/text", post(routes::import_text_handler))
        .route("/import/url", post(routes::import_url_handler))
        .route("/discover", get(routes::discover_handler))
        .route("/decipher", post(routes::decipher_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .with_state(state)
}

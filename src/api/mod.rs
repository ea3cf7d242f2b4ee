//! HTTP boundary over [`crate::services::MapperService`].
//!
//! Path mapping, status-code selection and JSON field naming live here; the
//! lifecycle layer below knows nothing about HTTP.

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::errors::ShortmapError;

pub mod health;
pub mod redirect;
pub mod shorten;
pub mod stats;

pub use health::{AppStartTime, HealthService};
pub use redirect::RedirectService;
pub use shorten::ShortenService;
pub use stats::StatsService;

/// Map a core error to an HTTP response. This is the only place status
/// codes are chosen.
pub(crate) fn error_response(err: &ShortmapError) -> HttpResponse {
    let status = match err {
        ShortmapError::Validation(_) => StatusCode::BAD_REQUEST,
        ShortmapError::AliasConflict(_) => StatusCode::CONFLICT,
        ShortmapError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    HttpResponse::build(status).json(json!({
        "code": err.code(),
        "error": err.error_type(),
        "message": err.message(),
    }))
}

/// Compose the user-facing short URL from the configured public base.
pub(crate) fn short_url(code: &str) -> String {
    let base = crate::config::get_config()
        .server
        .public_url
        .trim_end_matches('/')
        .to_string();
    format!("{}/{}", base, code)
}

/// Route table, shared between `main` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(HealthService::health_check))
        .route("/api/shorten", web::post().to(ShortenService::handle_shorten))
        .route("/api/stats/{code}", web::get().to(StatsService::handle_stats))
        .route("/{code}", web::get().to(RedirectService::handle_redirect));
}

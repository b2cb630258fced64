// Route exports
pub mod analytics;
pub mod mortgage;
pub mod properties;

use actix_web::{error, http::StatusCode, web, HttpResponse};
use crate::config::{MortgageSettings, SearchSettings};
use crate::models::ErrorResponse;
use crate::services::{AppwriteClient, AppwriteError, CacheKey, CacheManager, PostgresClient};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub appwrite: Arc<AppwriteClient>,
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
    pub search: SearchSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(properties::configure)
            .configure(analytics::configure)
            .configure(mortgage::configure),
    );
}

/// Register the mortgage defaults and JSON/query error handlers.
///
/// Kept separate from `AppState` so the calculator can be mounted without
/// any backing services.
pub fn configure_app_data(cfg: &mut web::ServiceConfig, mortgage: MortgageSettings) {
    cfg.app_data(web::Data::new(mortgage))
        .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error));
}

/// JSON error response for payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(ErrorResponse::new(self.error.clone(), self.message.clone(), self.status_code))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Map a validator failure to a 400 response
pub(crate) fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new("Validation failed", errors.to_string(), 400))
}

/// Map an Appwrite failure to a response; missing documents become 404
pub(crate) fn appwrite_error(context: &str, err: AppwriteError) -> HttpResponse {
    match err {
        AppwriteError::NotFound(what) => {
            HttpResponse::NotFound().json(ErrorResponse::new("Not found", what, 404))
        }
        other => {
            tracing::error!("{}: {}", context, other);
            HttpResponse::InternalServerError().json(ErrorResponse::new(context, other.to_string(), 500))
        }
    }
}

/// Drop the cached stats for a listing after its events or favorites change
pub(crate) async fn invalidate_stats(cache: &CacheManager, property_id: &str) {
    if let Err(e) = cache.delete(&CacheKey::stats(property_id)).await {
        tracing::warn!("Failed to invalidate stats cache for {}: {}", property_id, e);
    }
}

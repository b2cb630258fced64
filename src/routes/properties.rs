use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::SearchSettings;
use crate::core::{filter_and_sort, paginate, SortKey};
use crate::models::{
    ErrorResponse, HealthResponse, ListingEventType, PropertyQuery, PropertyRecord, RecordEventRequest,
    RecordEventResponse, SearchPropertiesRequest, SearchPropertiesResponse,
};
use crate::routes::{appwrite_error, invalidate_stats, validation_error, AppState};
use crate::services::{AppwriteError, CacheKey, EventType};

/// Configure listing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/properties/search", web::post().to(search_properties))
        .route("/properties/{property_id}", web::get().to(get_property))
        .route("/properties/{property_id}/events", web::post().to(record_event));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Pushed-down listing fetch, served from cache when possible
async fn fetch_listings(state: &AppState, query: &PropertyQuery) -> Result<Vec<PropertyRecord>, AppwriteError> {
    let key = CacheKey::listings(&query.fingerprint());

    if let Ok(cached) = state.cache.get::<Vec<PropertyRecord>>(&key).await {
        return Ok(cached);
    }

    let listings = state.appwrite.list_properties(query).await?;

    if let Err(e) = state.cache.set(&key, &listings).await {
        tracing::warn!("Failed to cache listings: {}", e);
    }

    Ok(listings)
}

/// Page size for a search: the requested limit, or the configured default,
/// never above `max_limit`
pub fn page_limit(req: &SearchPropertiesRequest, settings: &SearchSettings) -> usize {
    req.limit
        .map(usize::from)
        .unwrap_or(settings.default_limit)
        .min(settings.max_limit)
}

/// Search listings
///
/// POST /api/v1/properties/search
///
/// Request body:
/// ```json
/// {
///   "criteria": {"keywords": "loft", "priceRange": {"min": 1000, "max": 2500}},
///   "sort": "price-low",
///   "limit": 20,
///   "offset": 0
/// }
/// ```
async fn search_properties(
    state: web::Data<AppState>,
    req: web::Json<SearchPropertiesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return validation_error(errors);
    }

    let limit = page_limit(&req, &state.search);
    let sort = SortKey::parse(req.sort.as_deref());

    let query = PropertyQuery::from_criteria(&req.criteria, sort, state.search.fetch_limit);
    let listings = match fetch_listings(&state, &query).await {
        Ok(listings) => listings,
        Err(e) => return appwrite_error("Failed to fetch listings", e),
    };

    let fetched = listings.len();
    let results = filter_and_sort(&listings, &req.criteria, sort);
    let page = paginate(results, req.offset, limit);

    tracing::info!(
        "Search returned {} of {} matches (from {} listings, sort: {})",
        page.items.len(),
        page.total,
        fetched,
        sort.as_str()
    );

    HttpResponse::Ok().json(SearchPropertiesResponse {
        properties: page.items,
        total: page.total,
        next_offset: page.next_offset,
    })
}

/// Get a single listing
///
/// GET /api/v1/properties/{propertyId}
async fn get_property(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let property_id = path.into_inner();
    let key = CacheKey::property(&property_id);

    if let Ok(cached) = state.cache.get::<PropertyRecord>(&key).await {
        return HttpResponse::Ok().json(cached);
    }

    match state.appwrite.get_property(&property_id).await {
        Ok(property) => {
            if let Err(e) = state.cache.set(&key, &property).await {
                tracing::warn!("Failed to cache property {}: {}", property_id, e);
            }
            HttpResponse::Ok().json(property)
        }
        Err(e) => appwrite_error("Failed to fetch property", e),
    }
}

/// Record a listing interaction
///
/// POST /api/v1/properties/{propertyId}/events
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "eventType": "viewed|favorited|unfavorited|inquired"
/// }
/// ```
async fn record_event(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<RecordEventRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let property_id = path.into_inner();

    let Some(event_type) = ListingEventType::parse(&req.event_type) else {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Invalid event type",
            "Event type must be one of: viewed, favorited, unfavorited, inquired",
            400,
        ));
    };

    match state
        .postgres
        .record_event(&req.user_id, &property_id, EventType::from(event_type))
        .await
    {
        Ok(event_id) => {
            tracing::debug!("Recorded event: {} -> {} ({:?})", req.user_id, property_id, event_type);

            invalidate_stats(&state.cache, &property_id).await;

            HttpResponse::Ok().json(RecordEventResponse {
                success: true,
                event_id: event_id.to_string(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to record event in PostgreSQL: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to record event",
                e.to_string(),
                500,
            ))
        }
    }
}

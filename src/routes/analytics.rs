use actix_web::{web, HttpResponse, Responder};
use crate::core::summarize_portfolio;
use crate::models::{ErrorResponse, PropertyRecord, PropertyStats};
use crate::routes::{appwrite_error, invalidate_stats, AppState};
use crate::services::{CacheKey, PostgresError};

/// Configure landlord and tenant analytics routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/properties/{property_id}/stats", web::get().to(property_stats))
        .route("/landlords/{landlord_id}/summary", web::get().to(landlord_summary))
        .route("/users/{user_id}/favorites", web::get().to(user_favorites))
        .route("/users/{user_id}/favorites/{property_id}", web::put().to(add_favorite))
        .route("/users/{user_id}/favorites/{property_id}", web::delete().to(remove_favorite));
}

/// Interaction statistics for one listing
///
/// GET /api/v1/properties/{propertyId}/stats
async fn property_stats(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let property_id = path.into_inner();
    let key = CacheKey::stats(&property_id);

    if let Ok(cached) = state.cache.get::<PropertyStats>(&key).await {
        return HttpResponse::Ok().json(cached);
    }

    match state.postgres.get_property_stats(&property_id).await {
        Ok(stats) => {
            if let Err(e) = state.cache.set(&key, &stats).await {
                tracing::warn!("Failed to cache stats for {}: {}", property_id, e);
            }
            HttpResponse::Ok().json(stats)
        }
        Err(e) => {
            tracing::error!("Failed to fetch stats for {}: {}", property_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to fetch property stats",
                e.to_string(),
                500,
            ))
        }
    }
}

/// Portfolio summary for a landlord's dashboard
///
/// GET /api/v1/landlords/{landlordId}/summary
async fn landlord_summary(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let landlord_id = path.into_inner();
    let key = CacheKey::landlord(&landlord_id);

    let listings = match state.cache.get::<Vec<PropertyRecord>>(&key).await {
        Ok(cached) => cached,
        Err(_) => match state
            .appwrite
            .list_by_landlord(&landlord_id, state.search.fetch_limit)
            .await
        {
            Ok(listings) => {
                if let Err(e) = state.cache.set(&key, &listings).await {
                    tracing::warn!("Failed to cache listings for landlord {}: {}", landlord_id, e);
                }
                listings
            }
            Err(e) => return appwrite_error("Failed to fetch landlord listings", e),
        },
    };

    let summary = summarize_portfolio(&landlord_id, &listings);

    tracing::debug!(
        "Landlord {} summary: {} listings, {} available",
        landlord_id,
        summary.total_listings,
        summary.available_listings
    );

    HttpResponse::Ok().json(summary)
}

/// A tenant's saved listings
///
/// GET /api/v1/users/{userId}/favorites
async fn user_favorites(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = path.into_inner();

    match state.postgres.get_favorites(&user_id).await {
        Ok(favorites) => HttpResponse::Ok().json(serde_json::json!({
            "userId": user_id,
            "count": favorites.len(),
            "favorites": favorites,
        })),
        Err(e) => {
            tracing::error!("Failed to fetch favorites for {}: {}", user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to fetch favorites",
                e.to_string(),
                500,
            ))
        }
    }
}

/// Save a listing for a tenant; 201 when new, 200 when already saved
///
/// PUT /api/v1/users/{userId}/favorites/{propertyId}
async fn add_favorite(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (user_id, property_id) = path.into_inner();

    match state.postgres.add_favorite(&user_id, &property_id).await {
        Ok(true) => {
            invalidate_stats(&state.cache, &property_id).await;
            HttpResponse::Created().finish()
        }
        Ok(false) => HttpResponse::Ok().finish(),
        Err(e) => {
            tracing::error!("Failed to add favorite {} for {}: {}", property_id, user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to add favorite",
                e.to_string(),
                500,
            ))
        }
    }
}

/// Drop a saved listing without recording an interaction
///
/// DELETE /api/v1/users/{userId}/favorites/{propertyId}
async fn remove_favorite(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (user_id, property_id) = path.into_inner();

    match state.postgres.remove_favorite(&user_id, &property_id).await {
        Ok(()) => {
            invalidate_stats(&state.cache, &property_id).await;
            HttpResponse::NoContent().finish()
        }
        Err(PostgresError::NotFound(what)) => {
            HttpResponse::NotFound().json(ErrorResponse::new("Not found", what, 404))
        }
        Err(e) => {
            tracing::error!("Failed to remove favorite {} for {}: {}", property_id, user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to remove favorite",
                e.to_string(),
                500,
            ))
        }
    }
}

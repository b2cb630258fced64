use crate::models::{ListingEventType, PropertyStats};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Event types as stored in the `listing_event_type` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "listing_event_type", rename_all = "lowercase")]
pub enum EventType {
    Viewed,
    Favorited,
    Unfavorited,
    Inquired,
}

impl From<ListingEventType> for EventType {
    fn from(value: ListingEventType) -> Self {
        match value {
            ListingEventType::Viewed => EventType::Viewed,
            ListingEventType::Favorited => EventType::Favorited,
            ListingEventType::Unfavorited => EventType::Unfavorited,
            ListingEventType::Inquired => EventType::Inquired,
        }
    }
}

/// A tenant's saved listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub property_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// PostgreSQL client for listing interactions
///
/// Listings themselves live in Appwrite. This database records what tenants
/// do with them (views, favorites, inquiries) so landlords get per-listing
/// analytics and tenants get a favorites list.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Connect and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Record a listing interaction.
    ///
    /// Favorite and unfavorite events also maintain the favorites table in
    /// the same transaction.
    pub async fn record_event(
        &self,
        user_id: &str,
        property_id: &str,
        event_type: EventType,
    ) -> Result<uuid::Uuid, PostgresError> {
        let event_id = uuid::Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO listing_events (id, user_id, property_id, event_type, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(property_id)
        .bind(event_type)
        .execute(&mut *tx)
        .await?;

        match event_type {
            EventType::Favorited => {
                sqlx::query(
                    r#"
                    INSERT INTO favorites (user_id, property_id, created_at)
                    VALUES ($1, $2, NOW())
                    ON CONFLICT (user_id, property_id) DO NOTHING
                    "#,
                )
                .bind(user_id)
                .bind(property_id)
                .execute(&mut *tx)
                .await?;
            }
            EventType::Unfavorited => {
                sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND property_id = $2")
                    .bind(user_id)
                    .bind(property_id)
                    .execute(&mut *tx)
                    .await?;
            }
            EventType::Viewed | EventType::Inquired => {}
        }

        tx.commit().await?;

        tracing::debug!(
            "Recorded listing event: {} -> {} ({:?})",
            user_id,
            property_id,
            event_type
        );

        Ok(event_id)
    }

    /// Aggregate interaction counts for one listing
    pub async fn get_property_stats(&self, property_id: &str) -> Result<PropertyStats, PostgresError> {
        let query = r#"
            SELECT
                COUNT(*) FILTER (WHERE event_type = 'viewed') AS views,
                COUNT(DISTINCT user_id) FILTER (WHERE event_type = 'viewed') AS unique_viewers,
                COUNT(*) FILTER (WHERE event_type = 'inquired') AS inquiries,
                (SELECT COUNT(*) FROM favorites WHERE property_id = $1) AS favorites,
                MAX(created_at) AS last_event_at
            FROM listing_events
            WHERE property_id = $1
        "#;

        let row = sqlx::query(query).bind(property_id).fetch_one(&self.pool).await?;

        Ok(PropertyStats {
            property_id: property_id.to_string(),
            views: row.get("views"),
            unique_viewers: row.get("unique_viewers"),
            favorites: row.get("favorites"),
            inquiries: row.get("inquiries"),
            last_event_at: row.get("last_event_at"),
        })
    }

    /// A tenant's favorites, most recent first
    pub async fn get_favorites(&self, user_id: &str) -> Result<Vec<Favorite>, PostgresError> {
        let rows = sqlx::query(
            r#"
            SELECT property_id, created_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let favorites: Vec<Favorite> = rows
            .iter()
            .map(|row| Favorite {
                property_id: row.get("property_id"),
                created_at: row.get("created_at"),
            })
            .collect();

        tracing::debug!("User {} has {} favorites", user_id, favorites.len());

        Ok(favorites)
    }

    /// Save a favorite without recording an event. Returns false when it already existed.
    pub async fn add_favorite(&self, user_id: &str, property_id: &str) -> Result<bool, PostgresError> {
        let result = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, property_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, property_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(property_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a favorite without recording an event (e.g. listing deleted upstream)
    pub async fn remove_favorite(&self, user_id: &str, property_id: &str) -> Result<(), PostgresError> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND property_id = $2")
            .bind(user_id)
            .bind(property_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PostgresError::NotFound(format!(
                "favorite {} for user {}",
                property_id, user_id
            )));
        }

        Ok(())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

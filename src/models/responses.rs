use serde::{Deserialize, Serialize};
use crate::models::domain::PropertyRecord;

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPropertiesResponse {
    pub properties: Vec<PropertyRecord>,
    pub total: usize,
    #[serde(rename = "nextOffset")]
    pub next_offset: Option<usize>,
}

/// Per-listing interaction statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyStats {
    #[serde(rename = "propertyId")]
    pub property_id: String,
    pub views: i64,
    #[serde(rename = "uniqueViewers")]
    pub unique_viewers: i64,
    pub favorites: i64,
    pub inquiries: i64,
    #[serde(rename = "lastEventAt")]
    pub last_event_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}

/// Record event response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEventResponse {
    pub success: bool,
    pub event_id: String,
}

use crate::core::SortKey;
use crate::models::{PropertyQuery, PropertyRecord};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Documents requested per list call
const PAGE_SIZE: usize = 500;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite API client
///
/// Read-only access to the listings the marketplace keeps in the hosted
/// document store:
/// - Listing properties with server-side query pushdown
/// - Fetching a single property
/// - Listing a landlord's properties
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub properties: String,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.collections.properties
        )
    }

    /// Translate the pushdown query into Appwrite JSON query strings for one page
    fn build_queries(query: &PropertyQuery, offset: usize, page_size: usize) -> Vec<String> {
        let mut queries = Vec::new();

        if query.available_only {
            queries.push(json!({"method": "equal", "attribute": "isAvailable", "values": [true]}));
        }

        if let Some(min) = query.min_price {
            queries.push(json!({"method": "greaterThanEqual", "attribute": "price", "values": [min]}));
        }
        if let Some(max) = query.max_price {
            queries.push(json!({"method": "lessThanEqual", "attribute": "price", "values": [max]}));
        }

        if !query.property_types.is_empty() {
            let types: Vec<&str> = query.property_types.iter().map(|t| t.as_str()).collect();
            queries.push(json!({"method": "equal", "attribute": "propertyType", "values": types}));
        }

        if let Some(landlord_id) = &query.landlord_id {
            queries.push(json!({"method": "equal", "attribute": "landlordId", "values": [landlord_id]}));
        }

        if let Some(sort) = query.order_by {
            let (method, attribute) = match sort {
                SortKey::Newest => ("orderDesc", "$createdAt"),
                SortKey::PriceLow => ("orderAsc", "price"),
                SortKey::PriceHigh => ("orderDesc", "price"),
                SortKey::Rating => ("orderDesc", "rating"),
            };
            queries.push(json!({"method": method, "attribute": attribute}));
        }

        queries.push(json!({"method": "limit", "values": [page_size.clamp(1, PAGE_SIZE)]}));
        if offset > 0 {
            queries.push(json!({"method": "offset", "values": [offset]}));
        }

        queries.into_iter().map(|q| q.to_string()).collect()
    }

    async fn check_status(response: reqwest::Response, what: &str) -> Result<reqwest::Response, AppwriteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppwriteError::Unauthorized),
            StatusCode::NOT_FOUND => Err(AppwriteError::NotFound(what.to_string())),
            _ => {
                let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Appwrite request for {} failed: {} - {}", what, status, body);
                Err(AppwriteError::ApiError(format!("Failed to fetch {}: {}", what, status)))
            }
        }
    }

    /// List properties matching the pushdown query.
    ///
    /// Pages through the collection until Appwrite's `total` is reached or
    /// `query.limit` documents have been read. Documents that do not parse,
    /// or that break the record invariants, are skipped rather than failing
    /// the whole listing.
    pub async fn list_properties(&self, query: &PropertyQuery) -> Result<Vec<PropertyRecord>, AppwriteError> {
        let limit = query.limit.max(1);
        let mut properties = Vec::new();
        let mut offset = 0usize;

        loop {
            let page_size = (limit - offset).min(PAGE_SIZE);
            let (documents, total) = self.fetch_page(query, offset, page_size).await?;
            let received = documents.len();

            properties.extend(documents.iter().filter_map(parse_document));
            offset += received;

            let total = usize::try_from(total).unwrap_or(usize::MAX);
            if received == 0 || offset >= total {
                break;
            }
            if offset >= limit {
                tracing::warn!(
                    "Listing fetch capped at {} of {} documents; ordering and totals cover only these",
                    offset,
                    total
                );
                break;
            }
        }

        tracing::debug!("Fetched {} valid properties from {} documents", properties.len(), offset);

        Ok(properties)
    }

    async fn fetch_page(
        &self,
        query: &PropertyQuery,
        offset: usize,
        page_size: usize,
    ) -> Result<(Vec<Value>, u64), AppwriteError> {
        let queries = Self::build_queries(query, offset, page_size);
        let params: Vec<(&str, &str)> = queries.iter().map(|q| ("queries[]", q.as_str())).collect();

        tracing::debug!("Listing properties at offset {} with {} queries", offset, queries.len());

        let response = self
            .client
            .get(self.documents_url())
            .query(&params)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let response = Self::check_status(response, "properties").await?;
        let mut json: Value = response.json().await?;

        let total = json
            .get("total")
            .and_then(|t| t.as_u64())
            .unwrap_or(0);

        let documents = match json.get_mut("documents").map(Value::take) {
            Some(Value::Array(documents)) => documents,
            _ => return Err(AppwriteError::InvalidResponse("Missing documents array".into())),
        };

        Ok((documents, total))
    }

    /// Get a single property by document ID
    pub async fn get_property(&self, property_id: &str) -> Result<PropertyRecord, AppwriteError> {
        let url = format!("{}/{}", self.documents_url(), urlencoding::encode(property_id));

        tracing::debug!("Fetching property: {}", property_id);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let what = format!("property {}", property_id);
        let response = Self::check_status(response, &what).await?;
        let doc: Value = response.json().await?;

        parse_document(&doc)
            .ok_or_else(|| AppwriteError::InvalidResponse(format!("Failed to parse property {}", property_id)))
    }

    /// All listings owned by a landlord
    pub async fn list_by_landlord(&self, landlord_id: &str, limit: usize) -> Result<Vec<PropertyRecord>, AppwriteError> {
        self.list_properties(&PropertyQuery::for_landlord(landlord_id, limit)).await
    }
}

/// Parse an Appwrite document into a property record.
///
/// Attributes live at the top level of the document; `$id` and
/// `$createdAt` fill in `id` and `createdAt` when the collection does not
/// store them as attributes.
pub fn parse_document(doc: &Value) -> Option<PropertyRecord> {
    let mut data = doc.get("data").unwrap_or(doc).clone();
    let obj = data.as_object_mut()?;

    for (attribute, meta) in [("id", "$id"), ("createdAt", "$createdAt")] {
        if !obj.contains_key(attribute) {
            if let Some(value) = doc.get(meta).cloned() {
                obj.insert(attribute.to_string(), value);
            }
        }
    }

    match serde_json::from_value::<PropertyRecord>(data) {
        Ok(record) if record.is_valid() => Some(record),
        Ok(record) => {
            tracing::debug!("Skipping property {} with invalid price or bathrooms", record.id);
            None
        }
        Err(e) => {
            tracing::debug!("Skipping unparseable property document: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyType;

    fn create_client(base_url: String) -> AppwriteClient {
        let collections = AppwriteCollections {
            properties: "properties".to_string(),
        };

        AppwriteClient::new(
            base_url,
            "test_key".to_string(),
            "test_project".to_string(),
            "test_db".to_string(),
            collections,
        )
        .unwrap()
    }

    fn sample_document(id: &str, price: f64) -> Value {
        json!({
            "$id": id,
            "$createdAt": "2026-03-01T10:00:00.000+00:00",
            "title": "Garden Townhouse",
            "description": "Quiet street, near the market",
            "location": "Makati",
            "price": price,
            "bedrooms": 3,
            "bathrooms": 2.5,
            "propertyType": "townhouse",
            "amenities": ["parking", "garden"],
            "isAvailable": true,
            "availableFrom": "2026-04-01",
            "rating": 4.2,
            "reviewCount": 8,
            "petFriendly": true,
            "landlordId": "landlord_1"
        })
    }

    #[test]
    fn test_appwrite_client_creation() {
        let client = create_client("https://appwrite.test/v1".to_string());

        assert_eq!(client.base_url, "https://appwrite.test/v1");
        assert_eq!(client.api_key, "test_key");
        assert_eq!(
            client.documents_url(),
            "https://appwrite.test/v1/databases/test_db/collections/properties/documents"
        );
    }

    #[test]
    fn test_parse_document_fills_meta_fields() {
        let record = parse_document(&sample_document("prop_9", 1800.0)).unwrap();

        assert_eq!(record.id, "prop_9");
        assert_eq!(record.property_type, PropertyType::Townhouse);
        assert_eq!(record.bathrooms, 2.5);
        assert!(record.pet_friendly);
        assert!(!record.furnished);
    }

    #[test]
    fn test_parse_document_rejects_invalid_record() {
        assert!(parse_document(&sample_document("neg", -5.0)).is_none());
        assert!(parse_document(&json!({"title": "missing fields"})).is_none());
    }

    #[test]
    fn test_build_queries() {
        let query = PropertyQuery {
            available_only: true,
            min_price: Some(1000.0),
            max_price: None,
            property_types: vec![PropertyType::Condo, PropertyType::BoardingHouse],
            landlord_id: None,
            order_by: Some(SortKey::PriceLow),
            limit: 100,
        };

        let queries = AppwriteClient::build_queries(&query, 0, 100);

        assert_eq!(queries.len(), 5);
        assert!(queries[0].contains("isAvailable"));
        assert!(queries[1].contains("greaterThanEqual"));
        assert!(queries[2].contains("boarding-house"));
        assert!(queries[3].contains("orderAsc") && queries[3].contains("price"));
        assert!(queries[4].contains("limit"));

        let second_page = AppwriteClient::build_queries(&query, 500, 100);
        assert!(second_page.last().unwrap().contains("offset"));
    }

    #[test]
    fn test_build_queries_orders_by_sort_key() {
        let query = PropertyQuery {
            order_by: Some(SortKey::Newest),
            limit: 10,
            ..PropertyQuery::default()
        };
        let queries = AppwriteClient::build_queries(&query, 0, 10);
        assert!(queries[0].contains("orderDesc") && queries[0].contains("$createdAt"));

        let unordered = AppwriteClient::build_queries(&PropertyQuery::for_landlord("l1", 10), 0, 10);
        assert!(!unordered.iter().any(|q| q.contains("order")));
    }

    fn page_body(start: usize, count: usize, total: usize) -> String {
        let documents: Vec<Value> = (start..start + count)
            .map(|i| sample_document(&format!("doc_{}", i), 1000.0 + i as f64))
            .collect();
        json!({"total": total, "documents": documents}).to_string()
    }

    #[tokio::test]
    async fn test_list_properties_follows_pages_until_total() {
        let mut server = mockito::Server::new_async().await;
        let path = mockito::Matcher::Regex(r"^/databases/test_db/collections/properties/documents".to_string());

        let first = server
            .mock("GET", path.clone())
            .match_query(mockito::Matcher::UrlEncoded(
                "queries[]".to_string(),
                r#"{"method":"limit","values":[500]}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body(0, 500, 650))
            .create_async()
            .await;
        let second = server
            .mock("GET", path)
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded(
                    "queries[]".to_string(),
                    r#"{"method":"limit","values":[300]}"#.to_string(),
                ),
                mockito::Matcher::UrlEncoded(
                    "queries[]".to_string(),
                    r#"{"method":"offset","values":[500]}"#.to_string(),
                ),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body(500, 150, 650))
            .create_async()
            .await;

        let client = create_client(server.url());
        let properties = client
            .list_properties(&PropertyQuery { limit: 800, ..PropertyQuery::default() })
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(properties.len(), 650);
        assert_eq!(properties[649].id, "doc_649");
    }

    #[tokio::test]
    async fn test_list_properties_stops_at_limit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Regex(r"^/databases/".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body(0, 20, 1500))
            .expect(1)
            .create_async()
            .await;

        let client = create_client(server.url());
        let properties = client
            .list_properties(&PropertyQuery { limit: 20, ..PropertyQuery::default() })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(properties.len(), 20);
    }

    #[tokio::test]
    async fn test_list_properties_skips_bad_documents() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "total": 3,
            "documents": [
                sample_document("a", 1500.0),
                sample_document("b", -1.0),
                {"$id": "c", "title": "broken"}
            ]
        });

        let mock = server
            .mock("GET", mockito::Matcher::Regex(r"^/databases/test_db/collections/properties/documents".to_string()))
            .match_header("X-Appwrite-Project", "test_project")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = create_client(server.url());
        let properties = client
            .list_properties(&PropertyQuery { limit: 50, ..PropertyQuery::default() })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].id, "a");
    }

    #[tokio::test]
    async fn test_get_property_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/databases/test_db/collections/properties/documents/missing")
            .with_status(404)
            .with_body(r#"{"message": "Document not found"}"#)
            .create_async()
            .await;

        let client = create_client(server.url());
        let err = client.get_property("missing").await.unwrap_err();

        assert!(matches!(err, AppwriteError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Regex(r"^/databases/".to_string()))
            .with_status(401)
            .create_async()
            .await;

        let client = create_client(server.url());
        let err = client.list_by_landlord("landlord_1", 10).await.unwrap_err();

        assert!(matches!(err, AppwriteError::Unauthorized));
    }
}

use std::collections::BTreeMap;
use crate::models::{PortfolioSummary, PropertyRecord, TypeCount};

/// Summarize a landlord's listings for the dashboard.
///
/// Ratings are weighted by review count so a single five-star review does
/// not outweigh a well reviewed listing. An empty portfolio yields zeroes.
pub fn summarize_portfolio(landlord_id: &str, properties: &[PropertyRecord]) -> PortfolioSummary {
    let total_listings = properties.len();
    let available_listings = properties.iter().filter(|p| p.is_available).count();

    let availability_rate = if total_listings > 0 {
        available_listings as f64 / total_listings as f64
    } else {
        0.0
    };

    let (average_price, min_price, max_price) = if total_listings > 0 {
        let sum: f64 = properties.iter().map(|p| p.price).sum();
        let min = properties.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
        let max = properties.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
        (sum / total_listings as f64, min, max)
    } else {
        (0.0, 0.0, 0.0)
    };

    let total_reviews: u64 = properties.iter().map(|p| p.review_count as u64).sum();
    let average_rating = if total_reviews > 0 {
        properties
            .iter()
            .map(|p| p.rating * p.review_count as f64)
            .sum::<f64>()
            / total_reviews as f64
    } else {
        0.0
    };

    let mut counts = BTreeMap::new();
    for property in properties {
        *counts.entry(property.property_type).or_insert(0usize) += 1;
    }
    let by_type = counts
        .into_iter()
        .map(|(property_type, count)| TypeCount { property_type, count })
        .collect();

    PortfolioSummary {
        landlord_id: landlord_id.to_string(),
        total_listings,
        available_listings,
        availability_rate,
        average_price,
        min_price,
        max_price,
        average_rating,
        total_reviews,
        by_type,
    }
}

use crate::models::{PropertyRecord, SearchCriteria};
use crate::core::{filters::matches_criteria, sorting::{sort_properties, SortKey}};

/// Filter listings by criteria, then order them by `sort`.
///
/// Every criterion present must match (logical AND); absent criteria are
/// skipped. Sorting is stable, so listings with equal keys keep their input
/// order. The input is never mutated.
pub fn filter_and_sort(
    properties: &[PropertyRecord],
    criteria: &SearchCriteria,
    sort: SortKey,
) -> Vec<PropertyRecord> {
    let mut results: Vec<PropertyRecord> = if criteria.is_unconstrained() {
        properties.to_vec()
    } else {
        properties
            .iter()
            .filter(|p| matches_criteria(p, criteria))
            .cloned()
            .collect()
    };

    sort_properties(&mut results, sort);
    results
}

/// One page of search results
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<PropertyRecord>,
    pub total: usize,
    pub next_offset: Option<usize>,
}

/// Slice an already ordered result set. `next_offset` is None once the
/// page reaches the end.
pub fn paginate(results: Vec<PropertyRecord>, offset: usize, limit: usize) -> Page {
    let total = results.len();
    let end = offset.saturating_add(limit).min(total);

    let items = if offset >= total {
        Vec::new()
    } else {
        results.into_iter().skip(offset).take(end - offset).collect()
    };

    let next_offset = if end < total { Some(end) } else { None };

    Page {
        items,
        total,
        next_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriceRange, PropertyType};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn create_listing(id: &str, price: f64, rating: f64, age_days: i64) -> PropertyRecord {
        PropertyRecord {
            id: id.to_string(),
            title: format!("Listing {}", id),
            description: String::new(),
            location: "Cebu City".to_string(),
            price,
            bedrooms: 1,
            bathrooms: 1.0,
            property_type: PropertyType::Condo,
            amenities: vec!["wifi".to_string()],
            is_available: true,
            available_from: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            rating,
            review_count: 3,
            created_at: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap() - Duration::days(age_days),
            furnished: false,
            pet_friendly: true,
            landlord_id: "landlord".to_string(),
            image_file_ids: vec![],
            is_verified: None,
        }
    }

    fn ids(results: &[PropertyRecord]) -> Vec<&str> {
        results.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        let results = filter_and_sort(&[], &SearchCriteria::default(), SortKey::Newest);
        assert!(results.is_empty());
    }

    #[test]
    fn test_unconstrained_returns_everything_sorted() {
        let listings = vec![
            create_listing("old", 1000.0, 4.0, 10),
            create_listing("new", 1200.0, 3.0, 1),
        ];

        let results = filter_and_sort(&listings, &SearchCriteria::default(), SortKey::Newest);
        assert_eq!(ids(&results), vec!["new", "old"]);
    }

    #[test]
    fn test_price_sorts() {
        let listings = vec![
            create_listing("mid", 2000.0, 4.0, 0),
            create_listing("low", 1000.0, 4.0, 0),
            create_listing("high", 3000.0, 4.0, 0),
        ];
        let criteria = SearchCriteria::default();

        assert_eq!(ids(&filter_and_sort(&listings, &criteria, SortKey::PriceLow)), vec!["low", "mid", "high"]);
        assert_eq!(ids(&filter_and_sort(&listings, &criteria, SortKey::PriceHigh)), vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_rating_sort_is_stable() {
        let listings = vec![
            create_listing("a", 1000.0, 4.0, 0),
            create_listing("b", 1000.0, 5.0, 0),
            create_listing("c", 1000.0, 4.0, 0),
        ];

        let results = filter_and_sort(&listings, &SearchCriteria::default(), SortKey::Rating);
        assert_eq!(ids(&results), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_filter_then_sort() {
        let listings = vec![
            create_listing("1", 2000.0, 4.0, 0),
            create_listing("2", 3500.0, 4.0, 0),
            create_listing("3", 5000.0, 4.0, 0),
        ];
        let criteria = SearchCriteria {
            price_range: Some(PriceRange::between(2000.0, 4000.0)),
            ..SearchCriteria::default()
        };

        let results = filter_and_sort(&listings, &criteria, SortKey::PriceHigh);
        assert_eq!(ids(&results), vec!["2", "1"]);
    }

    #[test]
    fn test_paginate() {
        let listings: Vec<PropertyRecord> = (0..5)
            .map(|i| create_listing(&i.to_string(), 1000.0, 4.0, 0))
            .collect();

        let first = paginate(listings.clone(), 0, 2);
        assert_eq!(ids(&first.items), vec!["0", "1"]);
        assert_eq!(first.total, 5);
        assert_eq!(first.next_offset, Some(2));

        let last = paginate(listings.clone(), 4, 2);
        assert_eq!(ids(&last.items), vec!["4"]);
        assert_eq!(last.next_offset, None);

        let past_end = paginate(listings, 10, 2);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.next_offset, None);
    }
}

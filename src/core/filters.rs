use chrono::NaiveDate;
use crate::models::{PropertyRecord, PropertyType, PriceRange, SearchCriteria};

/// Returns the trimmed, lowercased needle, or None when it is blank
#[inline]
fn normalized(needle: Option<&str>) -> Option<String> {
    needle
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// Keyword match over title, description, location and amenity labels.
///
/// Case-insensitive substring match; any single field containing the
/// keyword is enough.
#[inline]
pub fn matches_keywords(property: &PropertyRecord, keywords: Option<&str>) -> bool {
    let Some(needle) = normalized(keywords) else {
        return true;
    };

    property.title.to_lowercase().contains(&needle)
        || property.description.to_lowercase().contains(&needle)
        || property.location.to_lowercase().contains(&needle)
        || property
            .amenities
            .iter()
            .any(|a| a.to_lowercase().contains(&needle))
}

#[inline]
pub fn matches_location(property: &PropertyRecord, location: Option<&str>) -> bool {
    match normalized(location) {
        Some(needle) => property.location.to_lowercase().contains(&needle),
        None => true,
    }
}

/// Inclusive on both bounds
#[inline]
pub fn matches_price_range(property: &PropertyRecord, range: Option<&PriceRange>) -> bool {
    range.map_or(true, |r| r.contains(property.price))
}

#[inline]
pub fn matches_bedrooms(property: &PropertyRecord, bedrooms: Option<&[u32]>) -> bool {
    match bedrooms {
        Some(wanted) if !wanted.is_empty() => wanted.contains(&property.bedrooms),
        _ => true,
    }
}

#[inline]
pub fn matches_bathrooms(property: &PropertyRecord, bathrooms: Option<&[f64]>) -> bool {
    match bathrooms {
        Some(wanted) if !wanted.is_empty() => wanted.iter().any(|b| *b == property.bathrooms),
        _ => true,
    }
}

#[inline]
pub fn matches_property_type(property: &PropertyRecord, types: Option<&[PropertyType]>) -> bool {
    match types {
        Some(wanted) if !wanted.is_empty() => wanted.contains(&property.property_type),
        _ => true,
    }
}

/// The listing's amenities must be a superset of the required ones.
/// Labels compare trimmed and case-insensitively.
#[inline]
pub fn matches_amenities(property: &PropertyRecord, required: Option<&[String]>) -> bool {
    let Some(required) = required else {
        return true;
    };

    let have: Vec<String> = property
        .amenities
        .iter()
        .map(|a| a.trim().to_lowercase())
        .collect();

    required
        .iter()
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty())
        .all(|r| have.contains(&r))
}

/// Exact match on the furnished and pet-friendly flags when requested
#[inline]
pub fn matches_flags(
    property: &PropertyRecord,
    furnished: Option<bool>,
    pet_friendly: Option<bool>,
) -> bool {
    furnished.map_or(true, |f| property.furnished == f)
        && pet_friendly.map_or(true, |p| property.pet_friendly == p)
}

/// The listing must be available on or before the requested date
#[inline]
pub fn matches_availability(
    property: &PropertyRecord,
    available_by: Option<NaiveDate>,
    available_only: Option<bool>,
) -> bool {
    if available_only == Some(true) && !property.is_available {
        return false;
    }

    available_by.map_or(true, |date| property.available_from <= date)
}

/// Conjunction of every criterion; absent criteria are skipped
#[inline]
pub fn matches_criteria(property: &PropertyRecord, criteria: &SearchCriteria) -> bool {
    matches_price_range(property, criteria.price_range.as_ref())
        && matches_property_type(property, criteria.property_types.as_deref())
        && matches_bedrooms(property, criteria.bedrooms.as_deref())
        && matches_bathrooms(property, criteria.bathrooms.as_deref())
        && matches_flags(property, criteria.furnished, criteria.pet_friendly)
        && matches_availability(property, criteria.available_by, criteria.available_only)
        && matches_amenities(property, criteria.amenities.as_deref())
        && matches_location(property, criteria.location.as_deref())
        && matches_keywords(property, criteria.keywords.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn create_test_property(price: f64, amenities: &[&str]) -> PropertyRecord {
        PropertyRecord {
            id: "prop_1".to_string(),
            title: "Sunny Loft near Campus".to_string(),
            description: "Bright two bedroom with a balcony".to_string(),
            location: "Quezon City, Metro Manila".to_string(),
            price,
            bedrooms: 2,
            bathrooms: 1.5,
            property_type: PropertyType::Apartment,
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
            is_available: true,
            available_from: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            rating: 4.5,
            review_count: 12,
            created_at: Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).unwrap(),
            furnished: true,
            pet_friendly: false,
            landlord_id: "landlord_1".to_string(),
            image_file_ids: vec![],
            is_verified: Some(true),
        }
    }

    #[test]
    fn test_keyword_matches_any_field() {
        let property = create_test_property(1500.0, &["WiFi", "Parking"]);

        assert!(matches_keywords(&property, Some("loft")));
        assert!(matches_keywords(&property, Some("BALCONY")));
        assert!(matches_keywords(&property, Some("quezon")));
        assert!(matches_keywords(&property, Some("wifi")));
        assert!(!matches_keywords(&property, Some("pool")));
    }

    #[test]
    fn test_blank_keyword_is_no_constraint() {
        let property = create_test_property(1500.0, &[]);
        assert!(matches_keywords(&property, None));
        assert!(matches_keywords(&property, Some("  ")));
    }

    #[test]
    fn test_price_range_inclusive() {
        let property = create_test_property(2000.0, &[]);

        assert!(matches_price_range(&property, Some(&PriceRange::between(2000.0, 4000.0))));
        assert!(matches_price_range(&property, Some(&PriceRange::between(1000.0, 2000.0))));
        assert!(!matches_price_range(&property, Some(&PriceRange::between(2000.01, 4000.0))));
        assert!(matches_price_range(&property, Some(&PriceRange { min: None, max: Some(2000.0) })));
    }

    #[test]
    fn test_amenity_superset() {
        let property = create_test_property(1500.0, &["A", "B", "C"]);

        let ab = vec!["A".to_string(), "b ".to_string()];
        let ad = vec!["A".to_string(), "D".to_string()];
        assert!(matches_amenities(&property, Some(&ab[..])));
        assert!(!matches_amenities(&property, Some(&ad[..])));
        let none: Vec<String> = vec![];
        assert!(matches_amenities(&property, Some(&none[..])));
    }

    #[test]
    fn test_fractional_bathrooms() {
        let property = create_test_property(1500.0, &[]);
        assert!(matches_bathrooms(&property, Some(&[1.0, 1.5][..])));
        assert!(!matches_bathrooms(&property, Some(&[1.0, 2.0][..])));
    }

    #[test]
    fn test_availability_date() {
        let property = create_test_property(1500.0, &[]);

        assert!(matches_availability(&property, NaiveDate::from_ymd_opt(2026, 6, 1), None));
        assert!(matches_availability(&property, NaiveDate::from_ymd_opt(2026, 7, 1), None));
        assert!(!matches_availability(&property, NaiveDate::from_ymd_opt(2026, 5, 31), None));
    }

    #[test]
    fn test_unavailable_listing_filtered_when_requested() {
        let mut property = create_test_property(1500.0, &[]);
        property.is_available = false;

        assert!(matches_availability(&property, None, None));
        assert!(matches_availability(&property, None, Some(false)));
        assert!(!matches_availability(&property, None, Some(true)));
    }

    #[test]
    fn test_flags() {
        let property = create_test_property(1500.0, &[]);
        assert!(matches_flags(&property, Some(true), None));
        assert!(!matches_flags(&property, None, Some(true)));
        assert!(matches_flags(&property, None, None));
    }
}

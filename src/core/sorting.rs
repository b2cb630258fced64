use std::cmp::Ordering;
use serde::{Deserialize, Serialize};
use crate::models::PropertyRecord;

/// Result ordering for a search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Most recently listed first
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    Rating,
}

impl SortKey {
    /// Parse a client-supplied key. Unknown, blank or absent keys fall back to `Newest`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("price-low") | Some("price_low") => SortKey::PriceLow,
            Some("price-high") | Some("price_high") => SortKey::PriceHigh,
            Some("rating") => SortKey::Rating,
            _ => SortKey::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Rating => "rating",
        }
    }

    #[inline]
    pub fn compare(&self, a: &PropertyRecord, b: &PropertyRecord) -> Ordering {
        match self {
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::PriceLow => a.price.total_cmp(&b.price),
            SortKey::PriceHigh => b.price.total_cmp(&a.price),
            SortKey::Rating => b.rating.total_cmp(&a.rating),
        }
    }
}

/// Sort in place. `sort_by` is stable, so equal keys keep their input order.
pub fn sort_properties(properties: &mut [PropertyRecord], key: SortKey) {
    properties.sort_by(|a, b| key.compare(a, b));
}

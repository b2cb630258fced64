use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use crate::core::sorting::SortKey;

/// Kind of rental property
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    Apartment,
    House,
    Condo,
    Townhouse,
    Studio,
    Duplex,
    BoardingHouse,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Condo => "condo",
            PropertyType::Townhouse => "townhouse",
            PropertyType::Studio => "studio",
            PropertyType::Duplex => "duplex",
            PropertyType::BoardingHouse => "boarding-house",
        }
    }
}

/// A rental listing as stored in the properties collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    /// Monthly rent
    pub price: f64,
    /// 0 means studio
    pub bedrooms: u32,
    pub bathrooms: f64,
    #[serde(rename = "propertyType")]
    pub property_type: PropertyType,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(rename = "isAvailable", default = "default_true")]
    pub is_available: bool,
    #[serde(rename = "availableFrom")]
    pub available_from: NaiveDate,
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "reviewCount", default)]
    pub review_count: u32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub furnished: bool,
    #[serde(rename = "petFriendly", default)]
    pub pet_friendly: bool,
    #[serde(rename = "landlordId", default)]
    pub landlord_id: String,
    #[serde(rename = "imageFileIds", default)]
    pub image_file_ids: Vec<String>,
    #[serde(rename = "isVerified", default)]
    pub is_verified: Option<bool>,
}

impl PropertyRecord {
    /// Checks the record invariants: non-negative price, positive bathrooms.
    /// Bedrooms are unsigned so they cannot go negative.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0 && self.bathrooms.is_finite() && self.bathrooms > 0.0
    }
}

fn default_true() -> bool { true }

/// Inclusive price bounds; an absent bound is unbounded on that side
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn between(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        self.min.map_or(true, |lo| price >= lo) && self.max.map_or(true, |hi| price <= hi)
    }
}

/// Search constraints. Every field is optional and an absent field imposes
/// no constraint. Empty sets and blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub keywords: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "priceRange")]
    pub price_range: Option<PriceRange>,
    #[serde(rename = "propertyTypes")]
    pub property_types: Option<Vec<PropertyType>>,
    pub bedrooms: Option<Vec<u32>>,
    pub bathrooms: Option<Vec<f64>>,
    pub amenities: Option<Vec<String>>,
    pub furnished: Option<bool>,
    #[serde(rename = "petFriendly")]
    pub pet_friendly: Option<bool>,
    #[serde(rename = "availableBy")]
    pub available_by: Option<NaiveDate>,
    #[serde(rename = "availableOnly")]
    pub available_only: Option<bool>,
}

impl SearchCriteria {
    /// True when no field constrains the result
    pub fn is_unconstrained(&self) -> bool {
        fn blank(s: &Option<String>) -> bool {
            s.as_deref().map_or(true, |s| s.trim().is_empty())
        }
        fn empty<T>(v: &Option<Vec<T>>) -> bool {
            v.as_ref().map_or(true, |v| v.is_empty())
        }

        blank(&self.keywords)
            && blank(&self.location)
            && self.price_range.map_or(true, |r| r.min.is_none() && r.max.is_none())
            && empty(&self.property_types)
            && empty(&self.bedrooms)
            && empty(&self.bathrooms)
            && empty(&self.amenities)
            && self.furnished.is_none()
            && self.pet_friendly.is_none()
            && self.available_by.is_none()
            && self.available_only != Some(true)
    }
}

/// Loan inputs for the amortization engine.
///
/// `down_payment` and `down_payment_pct` are two views of the same value.
/// Build through [`LoanParameters::with_down_payment_amount`] or
/// [`LoanParameters::with_down_payment_pct`] to keep them in sync.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    pub price: f64,
    pub down_payment: f64,
    pub down_payment_pct: f64,
    pub annual_rate_pct: f64,
    pub term_years: u32,
    pub tax_rate_pct: f64,
    pub insurance_rate_pct: f64,
    pub pmi_rate_pct: f64,
}

impl LoanParameters {
    /// Build from an absolute down payment, deriving the percentage
    pub fn with_down_payment_amount(price: f64, down_payment: f64, annual_rate_pct: f64, term_years: u32) -> Self {
        let down_payment_pct = if price > 0.0 { down_payment / price * 100.0 } else { 0.0 };
        Self {
            price,
            down_payment,
            down_payment_pct,
            annual_rate_pct,
            term_years,
            tax_rate_pct: 0.0,
            insurance_rate_pct: 0.0,
            pmi_rate_pct: 0.0,
        }
    }

    /// Build from a down payment percentage, deriving the amount
    pub fn with_down_payment_pct(price: f64, down_payment_pct: f64, annual_rate_pct: f64, term_years: u32) -> Self {
        Self {
            price,
            down_payment: price * down_payment_pct / 100.0,
            down_payment_pct,
            annual_rate_pct,
            term_years,
            tax_rate_pct: 0.0,
            insurance_rate_pct: 0.0,
            pmi_rate_pct: 0.0,
        }
    }

    pub fn escrow(mut self, tax_rate_pct: f64, insurance_rate_pct: f64) -> Self {
        self.tax_rate_pct = tax_rate_pct;
        self.insurance_rate_pct = insurance_rate_pct;
        self
    }

    pub fn pmi(mut self, pmi_rate_pct: f64) -> Self {
        self.pmi_rate_pct = pmi_rate_pct;
        self
    }

    #[inline]
    pub fn loan_amount(&self) -> f64 {
        self.price - self.down_payment
    }
}

/// Monthly payment components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    #[serde(rename = "principalAndInterest")]
    pub principal_and_interest: f64,
    #[serde(rename = "propertyTax")]
    pub property_tax: f64,
    pub insurance: f64,
    pub pmi: f64,
    pub total: f64,
}

/// One year of the amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    #[serde(rename = "principalPaid")]
    pub principal_paid: f64,
    #[serde(rename = "interestPaid")]
    pub interest_paid: f64,
    #[serde(rename = "remainingBalance")]
    pub remaining_balance: f64,
}

/// Full output of a mortgage calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageResult {
    #[serde(rename = "loanAmount")]
    pub loan_amount: f64,
    #[serde(rename = "numPayments")]
    pub num_payments: u32,
    pub monthly: MonthlyBreakdown,
    pub schedule: Vec<AmortizationYear>,
    #[serde(rename = "totalInterest")]
    pub total_interest: f64,
    #[serde(rename = "totalPaid")]
    pub total_paid: f64,
}

/// Kind of tenant interaction with a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingEventType {
    Viewed,
    Favorited,
    Unfavorited,
    Inquired,
}

impl ListingEventType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "viewed" => Some(ListingEventType::Viewed),
            "favorited" => Some(ListingEventType::Favorited),
            "unfavorited" => Some(ListingEventType::Unfavorited),
            "inquired" => Some(ListingEventType::Inquired),
            _ => None,
        }
    }
}

/// Count of listings of one property type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "propertyType")]
    pub property_type: PropertyType,
    pub count: usize,
}

/// Aggregate view over a landlord's listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    #[serde(rename = "landlordId")]
    pub landlord_id: String,
    #[serde(rename = "totalListings")]
    pub total_listings: usize,
    #[serde(rename = "availableListings")]
    pub available_listings: usize,
    #[serde(rename = "availabilityRate")]
    pub availability_rate: f64,
    #[serde(rename = "averagePrice")]
    pub average_price: f64,
    #[serde(rename = "minPrice")]
    pub min_price: f64,
    #[serde(rename = "maxPrice")]
    pub max_price: f64,
    #[serde(rename = "averageRating")]
    pub average_rating: f64,
    #[serde(rename = "totalReviews")]
    pub total_reviews: u64,
    #[serde(rename = "byType")]
    pub by_type: Vec<TypeCount>,
}

/// Server-side query pushed down to the document store.
///
/// Only cheap, indexable constraints go here; the full criteria are still
/// applied in-process by the search pipeline. `order_by` makes the store
/// return the head of the requested ordering when `limit` cuts the set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyQuery {
    pub available_only: bool,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub property_types: Vec<PropertyType>,
    pub landlord_id: Option<String>,
    pub order_by: Option<SortKey>,
    pub limit: usize,
}

impl PropertyQuery {
    pub fn from_criteria(criteria: &SearchCriteria, sort: SortKey, limit: usize) -> Self {
        Self {
            available_only: criteria.available_only == Some(true),
            min_price: criteria.price_range.and_then(|r| r.min),
            max_price: criteria.price_range.and_then(|r| r.max),
            property_types: criteria.property_types.clone().unwrap_or_default(),
            landlord_id: None,
            order_by: Some(sort),
            limit,
        }
    }

    pub fn for_landlord(landlord_id: &str, limit: usize) -> Self {
        Self {
            landlord_id: Some(landlord_id.to_string()),
            limit,
            ..Self::default()
        }
    }

    /// Stable string form used to build cache keys
    pub fn fingerprint(&self) -> String {
        let types = self
            .property_types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "avail={}|min={}|max={}|types={}|landlord={}|order={}|limit={}",
            self.available_only,
            self.min_price.map(|p| p.to_string()).unwrap_or_default(),
            self.max_price.map(|p| p.to_string()).unwrap_or_default(),
            types,
            self.landlord_id.as_deref().unwrap_or(""),
            self.order_by.map(|s| s.as_str()).unwrap_or(""),
            self.limit,
        )
    }
}

use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::SearchCriteria;

/// Request to search listings
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchPropertiesRequest {
    #[serde(default)]
    pub criteria: SearchCriteria,
    /// One of newest, price-low, price-high, rating. Anything else sorts by newest.
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
    #[serde(default)]
    pub offset: usize,
}

/// Request to run the mortgage calculator.
///
/// Supply `downPayment`, `downPaymentPct`, or both. Missing escrow and PMI
/// rates fall back to the configured defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MortgageRequest {
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
    #[serde(alias = "down_payment", rename = "downPayment", default)]
    #[validate(range(min = 0.0))]
    pub down_payment: Option<f64>,
    #[serde(alias = "down_payment_pct", rename = "downPaymentPct", default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub down_payment_pct: Option<f64>,
    #[serde(alias = "rate", rename = "annualRatePct")]
    #[validate(range(min = 0.0))]
    pub annual_rate_pct: f64,
    #[serde(alias = "term", rename = "termYears")]
    #[validate(range(min = 1, max = 50))]
    pub term_years: u32,
    #[serde(rename = "taxRatePct", default)]
    pub tax_rate_pct: Option<f64>,
    #[serde(rename = "insuranceRatePct", default)]
    pub insurance_rate_pct: Option<f64>,
    #[serde(rename = "pmiRatePct", default)]
    pub pmi_rate_pct: Option<f64>,
}

/// Request to record a listing interaction
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordEventRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(alias = "event_type", rename = "eventType")]
    pub event_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_defaults() {
        let req: SearchPropertiesRequest = serde_json::from_str("{}").unwrap();
        assert!(req.criteria.is_unconstrained());
        assert!(req.sort.is_none());
        assert_eq!(req.offset, 0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_search_request_zero_limit_rejected() {
        let req: SearchPropertiesRequest = serde_json::from_str(r#"{"limit": 0}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_mortgage_request_aliases() {
        let req: MortgageRequest = serde_json::from_str(
            r#"{"price": 150000, "down_payment_pct": 20, "rate": 12.5, "term": 20}"#,
        )
        .unwrap();
        assert_eq!(req.down_payment_pct, Some(20.0));
        assert_eq!(req.term_years, 20);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_mortgage_request_rejects_zero_term() {
        let req: MortgageRequest = serde_json::from_str(
            r#"{"price": 150000, "downPayment": 30000, "annualRatePct": 5, "termYears": 0}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }
}

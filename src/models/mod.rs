// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AmortizationYear, ListingEventType, LoanParameters, MonthlyBreakdown, MortgageResult,
    PortfolioSummary, PriceRange, PropertyQuery, PropertyRecord, PropertyType, SearchCriteria, TypeCount,
};
pub use requests::{MortgageRequest, RecordEventRequest, SearchPropertiesRequest};
pub use responses::{ErrorResponse, HealthResponse, PropertyStats, RecordEventResponse, SearchPropertiesResponse};

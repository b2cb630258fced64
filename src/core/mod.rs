// Core algorithm exports
pub mod analytics;
pub mod filters;
pub mod mortgage;
pub mod search;
pub mod sorting;

pub use analytics::summarize_portfolio;
pub use filters::matches_criteria;
pub use mortgage::{compute_mortgage, monthly_payment, MortgageError, MAX_TERM_YEARS, PMI_THRESHOLD_PCT};
pub use search::{filter_and_sort, paginate, Page};
pub use sorting::{sort_properties, SortKey};

//! Rental Search - listing search and mortgage calculation for the rental marketplace
//!
//! The core of this crate is two pure units: a filter/search/sort pipeline over
//! property listings and a fixed-rate amortization engine. The service layer
//! wraps them in an HTTP API backed by Appwrite, Redis and PostgreSQL.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{compute_mortgage, filter_and_sort, MortgageError, SortKey};
pub use models::{LoanParameters, MortgageResult, PropertyRecord, SearchCriteria};

//! Service Module
//!
//! Query building and aggregation over the repositories.

pub mod query;
pub mod stats;

pub use query as query_service;
pub use stats as stats_service;

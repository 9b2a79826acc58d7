//! PR Analytics Engine — batch aggregates and queries over enriched pull requests.
//!
//! Every aggregate is an independent pure reduction over one immutable batch;
//! the query engine filters and stably sorts the same batch on demand.

pub mod aggregate;
pub mod config;
pub mod query;
pub mod types;

#[cfg(test)]
mod test_support;

pub use aggregate::aggregate;
pub use config::AnalyticsConfig;
pub use query::{apply, filter, sort, FilterCriteria, SortDirection, SortKey, SortSpec, StateFilter};
pub use types::AnalyticsReport;

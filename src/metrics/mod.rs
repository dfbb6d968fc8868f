//! Metrics tables: schema, tolerant loading, and grouped aggregation.

pub mod aggregate;
pub mod load;
pub mod row;
pub mod schema;

pub use aggregate::{AggregateRow, aggregate};
pub use load::load_metrics;
pub use schema::MethodType;

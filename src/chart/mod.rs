//! Chart composition: prepared data in, declarative `ChartBundle` out.

pub mod compose;
pub mod model;

pub use compose::{compose_calculating, compose_central, compose_granularity};
pub use model::{ChartBundle, ChartKind};

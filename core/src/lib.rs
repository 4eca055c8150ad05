//! Synthetic marketing-campaign data and the dashboard built from it.
//!
//! Two stages share one CSV file:
//!   1. `simulator` fabricates a daily, per-channel table of ad metrics.
//!   2. `aggregation` groups that table; `charts` renders the groupings.

pub mod aggregation;
pub mod calendar;
pub mod charts;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod report;
pub mod rng;
pub mod simulator;
pub mod types;

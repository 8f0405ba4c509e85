//! This crate provides the Climate Query Service: a small set of read-only HTTP endpoints over a
//! pre-populated climate-observation dataset (station metadata and daily precipitation and
//! temperature measurements), returning JSON summaries. The dataset is loaded once at startup and
//! is immutable for the lifetime of the process; every request runs an independent query against
//! it.
//!
//! The service is built on top of a number of open source components.
//!
//! * [Tokio](tokio), the most popular asynchronous Rust runtime.
//! * [Axum](axum) web framework, built by the Tokio team on top of various popular components,
//!   including the [hyper] HTTP library.
//! * [Serde](serde) performs serialisation of JSON response data.
//! * [Polars](polars) provides the tabular query engine used to filter, join and aggregate the
//!   station and measurement tables.
//! * [Chrono](chrono) handles calendar-date parsing and arithmetic.

pub mod app;
pub mod app_state;
pub mod cli;
pub mod error;
pub mod metrics;
pub mod models;
pub mod server;
pub mod store;
#[cfg(test)]
pub mod test_utils;
pub mod tracing;

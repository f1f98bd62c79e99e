//! Tickline: time bucketing for analytics charts
//!
//! Turns a viewer's date range and timezone into a UTC time frame, picks a
//! bucket size, emits every bucket on the axis and merges sparse GROUP BY
//! results into a zero-filled series.

pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;

//! Domain logic
//!
//! - `timeframe` - time windows, bucketing and series reconciliation

pub mod timeframe;

pub use timeframe::{TimeFrame, TimeFrameError, TimeFrameParams, TimeFrameParser};

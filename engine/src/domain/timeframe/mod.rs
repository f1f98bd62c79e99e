//! Time frames for analytics charts
//!
//! - `parser` - request dates and timezone to a UTC window
//! - `bucket` - bucket sizes, key formats and truncation
//! - `frame` - the `TimeFrame` value object and its GROUP BY expression
//! - `points` - reference points along the time axis
//! - `series` - merging sparse storage rows into a zero-filled series
//! - `clock` - injectable source of "now"
//! - `error` - error type for all of the above

mod bucket;
mod clock;
mod error;
mod frame;
mod parser;
mod points;
mod series;

pub use bucket::BucketSize;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::TimeFrameError;
pub use frame::TimeFrame;
pub use parser::{TimeFrameParams, TimeFrameParser};
pub use points::BucketPoint;
pub use series::{RawRow, SeriesPoint};

//! Request parsing: dates and timezone to a UTC time frame

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use super::clock::{Clock, SystemClock};
use super::error::TimeFrameError;
use super::frame::TimeFrame;
use crate::core::constants::{DEFAULT_LOOKBACK_DAYS, TIME_WINDOW_BUFFER_MINUTES};
use crate::utils::time::{end_of_local_day, parse_timezone, start_of_local_day};

/// Date format accepted for `from_date` and `to_date`
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw time frame request, as received from the API layer.
///
/// Empty or missing dates fall back to the defaults (30 days ago, today).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TimeFrameParams {
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    /// IANA timezone of the viewer
    pub timezone: String,
    /// First recorded event of the site; `from` is never earlier than its day
    #[serde(default)]
    pub first_event: Option<DateTime<Utc>>,
}

impl TimeFrameParams {
    pub fn new(from_date: &str, to_date: &str, timezone: &str) -> Self {
        Self {
            from_date: Some(from_date.to_string()),
            to_date: Some(to_date.to_string()),
            timezone: timezone.to_string(),
            first_event: None,
        }
    }

    pub fn with_first_event(mut self, first_event: DateTime<Utc>) -> Self {
        self.first_event = Some(first_event);
        self
    }
}

/// Turns [`TimeFrameParams`] into a [`TimeFrame`] against an injected clock
#[derive(Debug, Clone, Default)]
pub struct TimeFrameParser<C = SystemClock> {
    clock: C,
}

impl<C: Clock> TimeFrameParser<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Resolve a request into a validated, UTC-anchored time frame.
    ///
    /// `from` is anchored to local midnight of its date. `to` follows the
    /// end-date policy in [`TimeFrameParser::resolve_end`].
    pub fn parse_time_frame(&self, params: &TimeFrameParams) -> Result<TimeFrame, TimeFrameError> {
        let tz = parse_timezone(&params.timezone)
            .ok_or_else(|| TimeFrameError::InvalidTimezone(params.timezone.clone()))?;

        let now = self.clock.now_in(tz);
        let today = now.date_naive();

        let from_date = match non_empty(params.from_date.as_deref()) {
            Some(value) => parse_date("from", value)?,
            None => today
                .checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS))
                .unwrap_or(today),
        };
        let to_date = match non_empty(params.to_date.as_deref()) {
            Some(value) => parse_date("to", value)?,
            None => today,
        };

        let mut from = start_of_local_day(tz, from_date);
        let to = Self::resolve_end(tz, now, to_date);

        if from > to {
            return Err(TimeFrameError::InvalidRange {
                from: from.with_timezone(&Utc),
                to: to.with_timezone(&Utc),
            });
        }

        if let Some(first_event) = params.first_event {
            let floor = start_of_local_day(tz, first_event.with_timezone(&tz).date_naive());
            if floor > from && floor <= to {
                tracing::debug!(%floor, "Raising start to the first recorded event");
                from = floor;
            }
        }

        tracing::trace!(%from, %to, %now, "Resolved local window");

        let frame = TimeFrame::new(from.with_timezone(&Utc), to.with_timezone(&Utc), tz);
        frame.validate()?;
        Ok(frame)
    }

    /// End of the window for a requested `to` date.
    ///
    /// Past dates end at 23:59:59.999999999 local. Today and future dates end
    /// at `now + buffer`, clamped to the end of the requested day so the buffer
    /// never spills into tomorrow.
    fn resolve_end(tz: Tz, now: DateTime<Tz>, date: NaiveDate) -> DateTime<Tz> {
        let end_of_day = end_of_local_day(tz, date);
        if date < now.date_naive() {
            return end_of_day;
        }
        let candidate = now + Duration::minutes(TIME_WINDOW_BUFFER_MINUTES);
        candidate.min(end_of_day)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, TimeFrameError> {
    let invalid = || TimeFrameError::InvalidDateFormat {
        field,
        value: value.to_string(),
    };
    // chrono accepts unpadded fields, the API contract does not
    if value.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;

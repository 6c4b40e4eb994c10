//! Calendar-date helpers.
//!
//! All dates in this service are `chrono::NaiveDate`, which serialises as
//! `YYYY-MM-DD`. Centralising "today" here keeps the creation and expiry
//! paths on the same clock and the same format.

use chrono::{NaiveDate, Utc};

/// Today's calendar date in UTC.
pub fn today() -> NaiveDate { Utc::now().date_naive() }

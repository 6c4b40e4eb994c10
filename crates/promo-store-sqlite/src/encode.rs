//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`,
//! UUIDs as hyphenated lowercase strings, and `active` as 0/1.

use chrono::{DateTime, NaiveDate, Utc};
use promo_core::{
  event::{Event, Location},
  promo::{HydratedPromo, Promo},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `promos` row LEFT JOINed with `events`.
pub struct RawPromoRow {
  // promos columns
  pub promo_id:    String,
  pub event_id:    String,
  pub code:        String,
  pub amount:      f64,
  pub radius:      f64,
  pub active:      bool,
  pub expiry_date: String,
  pub created:     String,
  // events join (all None when the event row is gone)
  pub event_name:       Option<String>,
  pub event_latitude:   Option<f64>,
  pub event_longitude:  Option<f64>,
  pub event_address:    Option<String>,
  pub event_created_at: Option<String>,
}

impl RawPromoRow {
  pub fn into_hydrated(self) -> Result<HydratedPromo> {
    let event_id = decode_uuid(&self.event_id)?;

    let promo = Promo {
      promo_id: decode_uuid(&self.promo_id)?,
      event_id,
      code: self.code,
      amount: self.amount,
      radius: self.radius,
      active: self.active,
      expiry_date: decode_date(&self.expiry_date)?,
      created: decode_date(&self.created)?,
    };

    let event = match (self.event_name, self.event_latitude, self.event_longitude) {
      (Some(name), Some(latitude), Some(longitude)) => Some(Event {
        event_id,
        name,
        location: Location {
          latitude,
          longitude,
          address: self.event_address,
        },
        created_at: decode_dt(
          self.event_created_at.as_deref().unwrap_or_default(),
        )?,
      }),
      _ => None,
    };

    Ok(HydratedPromo { promo, event })
  }
}

/// Raw strings read directly from an `events` row.
pub struct RawEvent {
  pub event_id:   String,
  pub name:       String,
  pub latitude:   f64,
  pub longitude:  f64,
  pub address:    Option<String>,
  pub created_at: String,
}

impl RawEvent {
  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      event_id:   decode_uuid(&self.event_id)?,
      name:       self.name,
      location:   Location {
        latitude:  self.latitude,
        longitude: self.longitude,
        address:   self.address,
      },
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

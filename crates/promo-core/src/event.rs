//! Event — the entity a promo is scoped to.
//!
//! Events are owned and mutated by another service; this crate only ever
//! reads them, so the model carries just what promo responses display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where an event takes place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
  pub latitude:  f64,
  pub longitude: f64,
  pub address:   Option<String>,
}

/// Read-only view of an event, with its location already resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
  pub event_id:   Uuid,
  pub name:       String,
  pub location:   Location,
  pub created_at: DateTime<Utc>,
}

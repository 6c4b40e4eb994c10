//! Promo — a discount code tied to an event.
//!
//! A promo is created once with a generated code, may have its `radius`
//! changed or be deactivated any number of times, and is never deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::Event;

/// A promotional discount code scoped to a single event.
///
/// `active` only ever transitions from `true` to `false`; there is no
/// reactivation path. Calendar dates serialise as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promo {
  pub promo_id:    Uuid,
  pub event_id:    Uuid,
  /// Short generated code customers type in. Unique across all promos.
  pub code:        String,
  /// Discount value, in the platform's currency unit.
  pub amount:      f64,
  /// Geofence radius, in the event location's distance unit.
  pub radius:      f64,
  pub active:      bool,
  pub expiry_date: NaiveDate,
  /// Store-assigned creation date; never changes after insert.
  pub created:     NaiveDate,
}

impl Promo {
  /// A promo is expired strictly after its expiry date — a promo expiring
  /// today still validates today.
  pub fn is_expired(&self, on: NaiveDate) -> bool { self.expiry_date < on }
}

/// Input to [`crate::store::PromoStore::create_promo`].
/// `promo_id`, `created`, and `active` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewPromo {
  pub event_id:    Uuid,
  pub code:        String,
  pub amount:      f64,
  pub radius:      f64,
  pub expiry_date: NaiveDate,
}

/// A promo joined with its event, as produced by store reads.
///
/// Hydration is an explicit join performed by the store; `event` is `None`
/// only if the owning event was removed out from under the foreign key by
/// the events service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydratedPromo {
  pub promo: Promo,
  pub event: Option<Event>,
}

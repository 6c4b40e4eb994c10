//! The `PromoStore` and `EventStore` traits.
//!
//! Implemented by storage backends (e.g. `promo-store-sqlite`). The API
//! layer depends on these abstractions, not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  event::Event,
  promo::{HydratedPromo, NewPromo, Promo},
};

/// Abstraction over promo persistence.
///
/// Every mutation is a single atomic update; there are no multi-write
/// transactions and no delete path. Reads return [`HydratedPromo`] — the
/// store performs the promo→event join itself so callers never see a
/// half-resolved reference.
pub trait PromoStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new promo with `active = true` and a store-assigned id and
  /// creation date.
  ///
  /// Fails if `input.code` is already taken; the caller generates codes
  /// with low collision probability, the store enforces uniqueness.
  fn create_promo(
    &self,
    input: NewPromo,
  ) -> impl Future<Output = Result<Promo, Self::Error>> + Send + '_;

  /// List every promo, hydrated with its event. `active_only` restricts the
  /// result to promos whose `active` flag is still set.
  fn list_promos(
    &self,
    active_only: bool,
  ) -> impl Future<Output = Result<Vec<HydratedPromo>, Self::Error>> + Send + '_;

  /// Look up a promo by its code. Returns `None` if the code is unknown.
  fn find_by_code<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<HydratedPromo>, Self::Error>> + Send + 'a;

  /// Set `active = false`. Succeeds even if the promo is already inactive;
  /// fails only if no promo with this id exists.
  fn deactivate(
    &self,
    promo_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Change the geofence radius. Fails if no promo with this id exists.
  fn set_radius(
    &self,
    promo_id: Uuid,
    radius: f64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// Read-only access to events. Events are owned and mutated by another
/// service; promo creation only needs to check existence.
pub trait EventStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve an event by id. Returns `None` if not found.
  fn get_event(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;
}

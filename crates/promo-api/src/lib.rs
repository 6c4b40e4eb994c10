//! JSON REST API for the promo service.
//!
//! Exposes an axum [`Router`] backed by any [`promo_core::store::PromoStore`]
//! + [`promo_core::store::EventStore`] and any [`promo_geocode::Geocoder`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", promo_api::api_router(state))
//! ```

pub mod error;
pub mod promos;

#[cfg(test)]
mod tests;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use promo_core::store::{EventStore, PromoStore};
use promo_geocode::Geocoder;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  pub geocode_base_url: String,
  pub geocode_api_key:  String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, G> {
  pub store:    Arc<S>,
  pub geocoder: Arc<G>,
}

// Manual impl: `S` and `G` live behind `Arc`s and need no `Clone` of their own.
impl<S, G> Clone for AppState<S, G> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      geocoder: Arc::clone(&self.geocoder),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, G>(state: AppState<S, G>) -> Router<()>
where
  S: PromoStore + EventStore + 'static,
  G: Geocoder + 'static,
{
  Router::new()
    .route(
      "/promos",
      get(promos::list_all::<S, G>).post(promos::create::<S, G>),
    )
    .route("/promos/active", get(promos::list_active::<S, G>))
    .route("/promos/validate", post(promos::validate::<S, G>))
    .route(
      "/promos/{promo_id}/deactivate",
      post(promos::deactivate::<S, G>),
    )
    .route(
      "/promos/{promo_id}/radius",
      post(promos::change_radius::<S, G>),
    )
    .with_state(state)
}

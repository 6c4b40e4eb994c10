//! Geocoding collaborator for the promo service.
//!
//! Resolves free-text place descriptions to coordinates. The [`Geocoder`]
//! trait is the seam the API layer depends on; [`GoogleGeocoder`] is the
//! production implementation over the Google Geocoding JSON endpoint.

#![allow(async_fn_in_trait)]

pub mod client;
pub mod error;

pub use client::{GeocodeConfig, GoogleGeocoder};
pub use error::{Error, Result};

use std::future::Future;

/// One geocoding result. Providers return candidates best-match first.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
  pub latitude:  f64,
  pub longitude: f64,
  /// Provider-formatted address, when available.
  pub label:     Option<String>,
}

/// Abstraction over a geocoding provider.
///
/// Zero candidates is a normal `Ok(vec![])` — callers decide whether an
/// unresolvable place is an error.
pub trait Geocoder: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Resolve `place` to a list of coordinate candidates, best match first.
  fn geocode<'a>(
    &'a self,
    place: &'a str,
  ) -> impl Future<Output = Result<Vec<Candidate>, Self::Error>> + Send + 'a;
}

//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! The wire shapes here are contractual: existing clients match on the exact
//! message strings (including the long-standing "Could not deactivated"
//! grammar), and the create path reports its not-found under a `message` key
//! while every other failure uses `error`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("event id does not exist")]
  EventNotFound,

  #[error("Promo code does not exist")]
  PromoNotFound,

  #[error("Promo code has expired")]
  PromoExpired,

  #[error("Could not deactivated the promo")]
  DeactivateFailed,

  #[error("Could not update promo radius")]
  RadiusUpdateFailed,

  #[error("could not create promo: {0}")]
  CreateFailed(String),

  /// Geocoding transport failure, provider error, or zero candidates.
  #[error("geocoding failed: {0}")]
  Upstream(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      // Legacy shape: create's not-found uses `message`, not `error`.
      ApiError::EventNotFound => {
        (StatusCode::BAD_REQUEST, json!({ "message": self.to_string() }))
      }
      ApiError::PromoNotFound
      | ApiError::PromoExpired
      | ApiError::DeactivateFailed
      | ApiError::RadiusUpdateFailed
      | ApiError::CreateFailed(_) => {
        (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
      }
      ApiError::Upstream(_) => {
        (StatusCode::BAD_GATEWAY, json!({ "error": self.to_string() }))
      }
      ApiError::Store(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
    };
    (status, Json(body)).into_response()
  }
}

//! Error types for `promo-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid polyline: {0}")]
  InvalidPolyline(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

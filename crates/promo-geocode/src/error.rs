//! Error type for `promo-geocode`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("unexpected geocoder response: {0}")]
  UnexpectedResponse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

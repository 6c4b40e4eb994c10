//! Error type for `promo-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to update a promo that was not found.
  #[error("promo not found: {0}")]
  PromoNotFound(uuid::Uuid),

  #[error("event not found: {0}")]
  EventNotFound(uuid::Uuid),

  #[error("promo code already exists: {0:?}")]
  DuplicateCode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error type for `tutor-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown language: {0:?}")]
  UnknownLanguage(String),

  /// An update targeted an id with no row behind it.
  #[error("no {table} row with id {id}")]
  RowNotFound { table: &'static str, id: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

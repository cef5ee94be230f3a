//! Error types for `pelagic-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A platform id failed the digits-only allow-list. The offending string
  /// is carried for diagnostics but is never interpolated into storage
  /// identifiers or predicates.
  #[error("invalid platform id {0:?}: must match ^[0-9]+$")]
  InvalidPlatformId(String),

  /// A raw record is missing a usable natural-key field (`profile_id` or a
  /// parseable `observed_at`). Such records are dropped before the merge;
  /// non-key fields degrade to null instead.
  #[error("record is missing key field `{0}`")]
  MissingKeyField(&'static str),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

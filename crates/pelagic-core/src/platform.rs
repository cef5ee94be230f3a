//! Platform identifiers — the partition key for observation history.
//!
//! Every id that can reach a storage predicate passes through
//! [`PlatformId::parse`], which enforces the digits-only allow-list. A
//! `PlatformId` in hand is therefore always safe to render into a query
//! plan.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A validated sensor-platform id.
///
/// Construction goes through [`PlatformId::parse`] (strictly `^[0-9]+$`
/// and within `i64` range; sign prefixes and surrounding whitespace are
/// rejected) or `From<u64>`, which is reserved for decoding ids already
/// validated on the write path.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlatformId(u64);

impl PlatformId {
  /// Parse a platform id from its textual form.
  ///
  /// Unlike `str::parse::<u64>`, this rejects a leading `+`. Ids are
  /// persisted as SQLite INTEGERs, so values past `i64::MAX` are rejected
  /// here as well: they could be written only in a wrapped, negative form
  /// that no rendered predicate would ever match.
  pub fn parse(s: &str) -> Result<Self> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
      return Err(Error::InvalidPlatformId(s.to_owned()));
    }
    let n = s
      .parse::<u64>()
      .map_err(|_| Error::InvalidPlatformId(s.to_owned()))?;
    if i64::try_from(n).is_err() {
      return Err(Error::InvalidPlatformId(s.to_owned()));
    }
    Ok(Self(n))
  }

  pub fn as_u64(self) -> u64 { self.0 }
}

impl From<u64> for PlatformId {
  fn from(n: u64) -> Self { Self(n) }
}

impl fmt::Display for PlatformId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl FromStr for PlatformId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

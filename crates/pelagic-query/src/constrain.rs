//! Safety clause injection.
//!
//! Constrains a plan to a validated platform whitelist by appending a single
//! predicate. Because the plan is structured, ordering and limit are
//! untouched by construction.

use pelagic_core::{
  PlatformId,
  plan::{Predicate, QueryPlan},
};
use tracing::warn;

/// Append a `platform_id IN (…)` predicate for every whitelist entry that
/// passes the digits-only allow-list.
///
/// Entries failing validation are dropped individually, so a fully-invalid
/// (or empty) whitelist still appends a predicate — one that matches no
/// platform. The constrained query degrades to "no matching platform",
/// never to an unconstrained scan.
pub fn constrain(mut plan: QueryPlan, whitelist: &[String]) -> QueryPlan {
  let valid: Vec<PlatformId> = whitelist
    .iter()
    .filter_map(|entry| match PlatformId::parse(entry) {
      Ok(id) => Some(id),
      Err(_) => {
        warn!(entry, "dropping whitelist entry that fails the digits-only allow-list");
        None
      }
    })
    .collect();

  plan.predicates.push(Predicate::PlatformIn(valid));
  plan
}

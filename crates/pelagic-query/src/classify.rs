//! Rule-based intent classification.
//!
//! Precedence is an explicit contract, not an accident of list order:
//! rules are evaluated top to bottom and the first rule with any matching
//! keyword wins. Location cues outrank temporal, temporal outrank
//! comparative, and so on down to the `General` catch-all. Keywords shared
//! between rules (`nearest`, `closest`) are therefore claimed by the
//! earlier rule.

use std::collections::HashSet;

use pelagic_core::plan::IntentType;

/// The ordered rule table. Matching is against lowercased alphanumeric
/// tokens, so `lat` matches `lat: 10` but not `flat`.
pub const INTENT_RULES: &[(IntentType, &[&str])] = &[
  (
    IntentType::Location,
    &["near", "closest", "nearest", "location", "coordinates", "lat", "lon"],
  ),
  (
    IntentType::Temporal,
    &["time", "date", "when", "recent", "latest", "oldest", "year", "month", "day"],
  ),
  (
    IntentType::Comparative,
    &["compare", "difference", "between", "versus", "vs", "contrast"],
  ),
  (
    IntentType::Statistical,
    &["average", "mean", "max", "min", "maximum", "minimum", "statistics", "stats"],
  ),
  (IntentType::Nearest, &["nearest", "closest", "nearby"]),
];

/// Classify a question. Never fails; an unmatched question is `General`.
pub fn classify(text: &str) -> IntentType {
  let lowered = text.to_lowercase();
  let tokens: HashSet<&str> = lowered
    .split(|c: char| !c.is_ascii_alphanumeric())
    .filter(|t| !t.is_empty())
    .collect();

  for (intent, keywords) in INTENT_RULES {
    if keywords.iter().any(|k| tokens.contains(k)) {
      return *intent;
    }
  }
  IntentType::General
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn comparative_question() {
    assert_eq!(
      classify("Compare salinity between Float 123 and Float 456"),
      IntentType::Comparative
    );
  }

  #[test]
  fn location_outranks_nearest() {
    // "nearest" appears in two rules; the Location rule claims it.
    assert_eq!(
      classify("What are the nearest ARGO floats to my position?"),
      IntentType::Location
    );
  }

  #[test]
  fn temporal_question() {
    assert_eq!(
      classify("Show me temperature data from the last month"),
      IntentType::Temporal
    );
  }

  #[test]
  fn statistical_question() {
    assert_eq!(
      classify("What is the average temperature in the Indian Ocean?"),
      IntentType::Statistical
    );
  }

  #[test]
  fn nearby_without_location_cues_is_nearest() {
    assert_eq!(classify("any floats nearby?"), IntentType::Nearest);
  }

  #[test]
  fn unmatched_question_falls_back_to_general() {
    assert_eq!(classify("tell me about the ocean"), IntentType::General);
    assert_eq!(classify(""), IntentType::General);
  }

  #[test]
  fn keywords_match_whole_tokens_only() {
    // "flat" must not trigger the "lat" location cue.
    assert_eq!(classify("the seafloor here is flat"), IntentType::General);
  }
}

//! Query synthesis for the pelagic observation store.
//!
//! The pipeline is: [`classify`] a question into an intent, [`extract_params`]
//! typed parameters from the text and caller context, [`render`] the fixed
//! plan shape for that intent, then [`constrain`] the plan to a validated
//! platform whitelist. The whitelist usually comes from [`resolve`], which
//! re-ranks approximate candidate-index hits by exact geodesic distance.
//!
//! Every stage degrades instead of erroring: an unmatched question becomes a
//! `General` plan, invalid whitelist entries are dropped, and an unavailable
//! index yields an empty candidate list.

mod classify;
mod constrain;
mod extract;
mod render;
mod resolve;

pub use classify::{INTENT_RULES, classify};
pub use constrain::constrain;
pub use extract::extract_params;
pub use render::render;
pub use resolve::resolve;

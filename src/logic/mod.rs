//! Bracket business logic: round generation and resolution.

mod bracket;
mod resolve;

pub use bracket::{generate_round, shuffled_team_ids};
pub use resolve::{generate_first_round, resolve_match, ResolveOutcome};

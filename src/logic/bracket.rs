//! Bracket generation: shuffling and positional pairing for one round.

use crate::models::{GameMatch, Team, TeamId, TournamentError, TournamentId};
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniformly random permutation of the registered teams' ids.
///
/// All round-1 randomness is injected here; [`generate_round`] itself is
/// deterministic. Tests pass a seeded rng to pin the order.
pub fn shuffled_team_ids<R: Rng + ?Sized>(teams: &[Team], rng: &mut R) -> Vec<TeamId> {
    let mut ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
    ids.shuffle(rng);
    ids
}

/// Pair a sequence of team ids into matches for one round.
///
/// Consecutive ids are paired positionally (0 with 1, 2 with 3, ...). An odd
/// tail becomes a bye: slot B absent, winner pre-recorded. Output length is
/// always `ceil(n / 2)` and every input id lands in exactly one match.
///
/// Round 1 with fewer than 2 teams is a user error
/// (`InsufficientParticipants`). An empty input for a later round can only
/// come from a broken caller and is reported as `EmptyRound`.
pub fn generate_round(
    tournament_id: TournamentId,
    round: u32,
    team_ids: &[TeamId],
) -> Result<Vec<GameMatch>, TournamentError> {
    if round <= 1 && team_ids.len() < 2 {
        return Err(TournamentError::InsufficientParticipants);
    }
    if team_ids.is_empty() {
        return Err(TournamentError::EmptyRound(round));
    }

    let matches = team_ids
        .chunks(2)
        .map(|pair| GameMatch::new(tournament_id, round, pair[0], pair.get(1).copied()))
        .collect();
    Ok(matches)
}

//! Round resolution: recording winners, detecting round completion, and
//! advancing the bracket until a champion is determined.

use crate::logic::bracket::{generate_round, shuffled_team_ids};
use crate::models::{
    MatchId, TeamId, Tournament, TournamentError, TournamentStatus, UserId,
};
use rand::Rng;
use serde::Serialize;

/// What a successful resolve call led to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolveOutcome {
    /// Other matches in the same round are still unresolved.
    RoundWaiting,
    /// The round finished and the next round's matches were created.
    RoundAdvanced {
        next_round: u32,
        matches_created: usize,
    },
    /// The round finished with a single advancer: the tournament is over.
    TournamentCompleted { winner_team_id: TeamId },
}

/// Generate the round-1 bracket over a fresh shuffle of all registered teams.
///
/// Only the organizer may trigger this, exactly once per tournament, with at
/// least 2 teams registered. On success the tournament moves Draft ->
/// InProgress and the number of created matches is returned.
pub fn generate_first_round<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    caller: UserId,
    rng: &mut R,
) -> Result<usize, TournamentError> {
    if tournament.organizer_id != caller {
        return Err(TournamentError::Forbidden);
    }
    if !tournament.matches.is_empty() {
        return Err(TournamentError::BracketAlreadyGenerated);
    }

    let shuffled = shuffled_team_ids(&tournament.teams, rng);
    let matches = generate_round(tournament.id, 1, &shuffled)?;
    let created = matches.len();
    tournament.matches = matches;
    tournament.status = TournamentStatus::InProgress;
    Ok(created)
}

/// Record a match winner, then check the round: if every match in it has a
/// winner, either declare the champion (one advancer) or generate the next
/// round from the winners in match-creation order.
///
/// Re-resolving is a hard error (`AlreadyResolved`): winners never change,
/// and a silent no-op would hide organizer mistakes.
pub fn resolve_match(
    tournament: &mut Tournament,
    match_id: MatchId,
    caller: UserId,
    winner_team_id: TeamId,
) -> Result<ResolveOutcome, TournamentError> {
    if tournament.organizer_id != caller {
        return Err(TournamentError::Forbidden);
    }

    let m = tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if m.is_resolved() {
        return Err(TournamentError::AlreadyResolved(match_id));
    }
    if !m.involves(winner_team_id) {
        return Err(TournamentError::InvalidWinner);
    }
    m.winner = Some(winner_team_id);
    let round = m.round;

    advance_if_round_complete(tournament, round)
}

/// Round-completion check. Runs after every successful resolve, inside the
/// same exclusive section that recorded the winner, so two resolves finishing
/// the same round can never both generate the next one.
fn advance_if_round_complete(
    tournament: &mut Tournament,
    round: u32,
) -> Result<ResolveOutcome, TournamentError> {
    if tournament.round_matches(round).any(|m| !m.is_resolved()) {
        return Ok(ResolveOutcome::RoundWaiting);
    }

    // Winners in match-creation order; each team plays at most one match per
    // round, so these are already distinct.
    let advancers: Vec<TeamId> = tournament
        .round_matches(round)
        .filter_map(|m| m.winner)
        .collect();

    if advancers.len() == 1 {
        tournament.status = TournamentStatus::Completed;
        return Ok(ResolveOutcome::TournamentCompleted {
            winner_team_id: advancers[0],
        });
    }

    let next_round = round + 1;
    debug_assert!(
        !tournament.has_round(next_round),
        "round {} was completed twice",
        next_round
    );
    let matches = generate_round(tournament.id, next_round, &advancers)?;
    let matches_created = matches.len();
    tournament.matches.extend(matches);
    Ok(ResolveOutcome::RoundAdvanced {
        next_round,
        matches_created,
    })
}

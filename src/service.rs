//! Tournament service: in-memory store plus the exclusive section every
//! bracket mutation runs under.
//!
//! All writes take the map's write lock, so round-completion detection and
//! next-round creation are atomic relative to concurrent resolves on sibling
//! matches. Every precondition in the logic layer is therefore checked after
//! the lock is acquired.

use crate::logic::{generate_first_round, resolve_match, ResolveOutcome};
use crate::models::{
    MatchId, TeamId, Tournament, TournamentError, TournamentId, UserId,
};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe store of all tournaments, keyed by id.
#[derive(Default)]
pub struct TournamentService {
    tournaments: RwLock<HashMap<TournamentId, Tournament>>,
}

impl TournamentService {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock means a panic mid-write; the map itself is still
    // structurally sound (logic functions leave valid state on error), so we
    // keep serving rather than propagate the poison.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<TournamentId, Tournament>> {
        self.tournaments.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TournamentId, Tournament>> {
        self.tournaments.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a freshly created tournament and return its id.
    pub fn create_tournament(&self, tournament: Tournament) -> TournamentId {
        let id = tournament.id;
        self.write().insert(id, tournament);
        id
    }

    /// Snapshot of one tournament with its teams and matches.
    pub fn tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.read()
            .get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Snapshots of all tournaments, most recently started first.
    pub fn tournaments(&self) -> Vec<Tournament> {
        let mut all: Vec<Tournament> = self.read().values().cloned().collect();
        all.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        all
    }

    /// Register a team to a Draft tournament.
    pub fn register_team(
        &self,
        id: TournamentId,
        name: &str,
    ) -> Result<TeamId, TournamentError> {
        let mut g = self.write();
        let tournament = g
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        tournament.add_team(name)
    }

    /// Generate the round-1 bracket (organizer only). Returns the number of
    /// matches created.
    pub fn generate_first_round(
        &self,
        id: TournamentId,
        caller: UserId,
    ) -> Result<usize, TournamentError> {
        let mut g = self.write();
        let tournament = g
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        let created = generate_first_round(tournament, caller, &mut rand::thread_rng())?;
        log::info!(
            "Tournament '{}' started: generated {} matches for round 1",
            tournament.name,
            created
        );
        Ok(created)
    }

    /// Record a match winner (organizer only) and advance the bracket if the
    /// round is finished.
    pub fn resolve_match(
        &self,
        id: TournamentId,
        match_id: MatchId,
        caller: UserId,
        winner_team_id: TeamId,
    ) -> Result<ResolveOutcome, TournamentError> {
        let mut g = self.write();
        let tournament = g
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        let outcome = resolve_match(tournament, match_id, caller, winner_team_id)?;
        match outcome {
            ResolveOutcome::RoundAdvanced {
                next_round,
                matches_created,
            } => log::info!(
                "Tournament '{}': round finished, generated {} matches for round {}",
                tournament.name,
                matches_created,
                next_round
            ),
            ResolveOutcome::TournamentCompleted { winner_team_id } => log::info!(
                "Tournament '{}' completed, winning team {}",
                tournament.name,
                winner_team_id
            ),
            ResolveOutcome::RoundWaiting => {}
        }
        Ok(outcome)
    }
}

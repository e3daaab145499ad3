//! Match data structure for bracket play.

use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// A single bracket match: two team slots and an optional winner.
///
/// `team_b == None` marks a bye: the sole occupant advances without playing,
/// and `winner` is recorded at construction so byes never hold up a round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// Round number; round 1 is the first.
    pub round: u32,
    pub team_a: TeamId,
    /// None if the team in slot A has a bye this round.
    pub team_b: Option<TeamId>,
    /// None if not yet played. Once set, never changes.
    pub winner: Option<TeamId>,
}

impl GameMatch {
    pub fn new(
        tournament_id: TournamentId,
        round: u32,
        team_a: TeamId,
        team_b: Option<TeamId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            team_a,
            team_b,
            // A bye has no opponent; its sole team wins by default.
            winner: if team_b.is_none() { Some(team_a) } else { None },
        }
    }

    /// Whether this match is a bye (no opponent in slot B).
    pub fn is_bye(&self) -> bool {
        self.team_b.is_none()
    }

    /// Whether a winner has been recorded.
    pub fn is_resolved(&self) -> bool {
        self.winner.is_some()
    }

    /// Whether the given team occupies one of this match's slots.
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team_a == team_id || self.team_b == Some(team_id)
    }
}

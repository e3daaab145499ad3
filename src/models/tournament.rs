//! Tournament, TournamentStatus, and TournamentError.

use crate::models::game::{GameMatch, MatchId};
use crate::models::team::{Team, TeamId};
use crate::models::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bracket sizes a tournament may declare (powers of two up to 64).
pub const ALLOWED_TEAM_COUNTS: [u32; 6] = [2, 4, 8, 16, 32, 64];

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// No tournament with this id.
    TournamentNotFound(TournamentId),
    /// No match with this id in the tournament.
    MatchNotFound(MatchId),
    /// Caller is not the tournament's organizer.
    Forbidden,
    /// Round 1 matches already exist; a bracket is generated at most once.
    BracketAlreadyGenerated,
    /// The match already has a winner; winners never change.
    AlreadyResolved(MatchId),
    /// Fewer than 2 teams registered at bracket generation.
    InsufficientParticipants,
    /// The submitted winner is not one of the match's two teams.
    InvalidWinner,
    /// Declared team count is not one of the allowed bracket sizes.
    InvalidTeamCount(u32),
    /// A team with this name is already registered (names are unique, case-insensitive).
    DuplicateTeamName,
    /// The tournament already has `max_teams` teams.
    TournamentFull,
    /// Team registration is only open while the tournament is in Draft.
    RegistrationClosed,
    /// Empty or whitespace-only name.
    InvalidName,
    /// Auto-generation was handed an empty winner list. Indicates corrupted
    /// state reached outside the public API; surfaced as an internal error.
    EmptyRound(u32),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::TournamentNotFound(id) => {
                write!(f, "Tournament {} was not found", id)
            }
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::Forbidden => {
                write!(f, "Only the organizer can perform this action")
            }
            TournamentError::BracketAlreadyGenerated => {
                write!(f, "Bracket for this tournament has already been created")
            }
            TournamentError::AlreadyResolved(_) => {
                write!(f, "This match already has a winner")
            }
            TournamentError::InsufficientParticipants => {
                write!(f, "To generate a bracket you need at least 2 teams")
            }
            TournamentError::InvalidWinner => {
                write!(f, "The winner must be one of the teams in this match")
            }
            TournamentError::InvalidTeamCount(n) => write!(
                f,
                "Invalid bracket size {}. Number of teams must be 2, 4, 8, 16, 32, or 64",
                n
            ),
            TournamentError::DuplicateTeamName => {
                write!(f, "A team with this name is already registered")
            }
            TournamentError::TournamentFull => {
                write!(f, "The tournament has reached its team limit")
            }
            TournamentError::RegistrationClosed => {
                write!(f, "Teams can only be registered before the bracket is generated")
            }
            TournamentError::InvalidName => write!(f, "Name must not be empty"),
            TournamentError::EmptyRound(round) => {
                write!(f, "No advancing teams for round {}", round)
            }
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle phase of the tournament. Only moves forward:
/// Draft -> InProgress (first bracket generation) -> Completed (final resolve).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Registering teams; no matches yet.
    #[default]
    Draft,
    /// Bracket generated; rounds being played.
    InProgress,
    /// Champion determined; no further matches.
    Completed,
}

/// A single-elimination tournament: teams, the full bracket, and its status.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Which game is being played (e.g. "CS2").
    pub game: String,
    pub start_date: DateTime<Utc>,
    /// Declared bracket size; one of [`ALLOWED_TEAM_COUNTS`].
    pub max_teams: u32,
    /// The owning user; the only caller allowed to generate rounds or resolve matches.
    pub organizer_id: UserId,
    pub status: TournamentStatus,
    /// Registered teams, in registration order.
    pub teams: Vec<Team>,
    /// All matches across all rounds, in creation order.
    pub matches: Vec<GameMatch>,
}

impl Tournament {
    /// Create a new tournament in Draft with no teams. Validates the name,
    /// game tag, and declared team count.
    pub fn new(
        name: impl Into<String>,
        game: impl Into<String>,
        start_date: DateTime<Utc>,
        max_teams: u32,
        organizer_id: UserId,
    ) -> Result<Self, TournamentError> {
        let name = name.into().trim().to_string();
        let game = game.into().trim().to_string();
        if name.is_empty() || game.is_empty() {
            return Err(TournamentError::InvalidName);
        }
        if !ALLOWED_TEAM_COUNTS.contains(&max_teams) {
            return Err(TournamentError::InvalidTeamCount(max_teams));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            game,
            start_date,
            max_teams,
            organizer_id,
            status: TournamentStatus::Draft,
            teams: Vec::new(),
            matches: Vec::new(),
        })
    }

    /// Register a team (only while Draft, under the team limit). Names must be
    /// unique within the tournament (case-insensitive).
    pub fn add_team(&mut self, name: impl Into<String>) -> Result<TeamId, TournamentError> {
        if self.status != TournamentStatus::Draft {
            return Err(TournamentError::RegistrationClosed);
        }
        if self.teams.len() as u32 >= self.max_teams {
            return Err(TournamentError::TournamentFull);
        }
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::InvalidName);
        }
        let is_duplicate = self
            .teams
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicateTeamName);
        }
        let team = Team::new(self.id, name_trimmed);
        let team_id = team.id;
        self.teams.push(team);
        Ok(team_id)
    }

    /// Look up a registered team by id.
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Mutable reference to a match by id.
    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Matches belonging to one round, in creation order.
    pub fn round_matches(&self, round: u32) -> impl Iterator<Item = &GameMatch> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Whether any match exists for the given round.
    pub fn has_round(&self, round: u32) -> bool {
        self.matches.iter().any(|m| m.round == round)
    }
}

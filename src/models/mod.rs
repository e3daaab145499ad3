//! Data structures for the tournament manager: tournaments, teams, matches, users.

mod game;
mod team;
mod tournament;
mod user;

pub use game::{GameMatch, MatchId};
pub use team::{Team, TeamId};
pub use tournament::{
    Tournament, TournamentError, TournamentId, TournamentStatus, ALLOWED_TEAM_COUNTS,
};
pub use user::{User, UserId, UserRole};

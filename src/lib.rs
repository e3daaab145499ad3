//! Single-elimination tournament manager: library with models, bracket logic,
//! and the tournament service.

pub mod logic;
pub mod models;
pub mod service;

pub use logic::{generate_first_round, generate_round, resolve_match, shuffled_team_ids, ResolveOutcome};
pub use models::{
    GameMatch, MatchId, Team, TeamId, Tournament, TournamentError, TournamentId, TournamentStatus,
    User, UserId, UserRole, ALLOWED_TEAM_COUNTS,
};
pub use service::TournamentService;

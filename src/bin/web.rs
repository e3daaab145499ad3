//! Single binary web server: REST API for the tournament manager.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//!
//! Identity is session-based: register/login store the numeric user id in a
//! cookie session, and every handler passes it to the core as an explicit
//! caller id.

use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tournament_manager_web::{
    MatchId, ResolveOutcome, TeamId, Tournament, TournamentError, TournamentId,
    TournamentService, TournamentStatus, User, UserId,
};

/// In-memory user accounts, keyed by numeric id. Ids are handed out
/// sequentially starting at 1.
struct UserDirectory {
    users: RwLock<HashMap<UserId, User>>,
    next_id: RwLock<UserId>,
}

impl UserDirectory {
    fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: RwLock::new(1),
        }
    }

    /// Register a new account. Usernames are unique (case-insensitive).
    fn register(&self, username: &str, password: &str) -> Result<UserId, &'static str> {
        let username = username.trim();
        if username.is_empty() {
            return Err("Username must not be empty");
        }
        if password.len() < 8 {
            return Err("Password must be at least 8 characters");
        }
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(username))
        {
            return Err("Username already exists");
        }
        let mut next_id = self.next_id.write().unwrap_or_else(PoisonError::into_inner);
        let id = *next_id;
        *next_id += 1;
        users.insert(id, User::new(id, username, hash_password(password)));
        Ok(id)
    }

    /// Verify credentials; returns the user id on success.
    fn login(&self, username: &str, password: &str) -> Option<UserId> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        let user = users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username.trim()))?;
        verify_password(password, &user.password_hash).then_some(user.id)
    }

    fn username(&self, id: UserId) -> Option<String> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(|u| u.username.clone())
    }

    /// Record tournament ownership on the organizer's account.
    fn record_tournament(&self, id: UserId, tournament_id: TournamentId) {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(u) = users.get_mut(&id) {
            u.organized_tournaments.push(tournament_id);
        }
    }
}

/// Salted sha-256, stored as "salt$digest" in hex.
fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = Sha256::new()
        .chain_update(salt)
        .chain_update(password.as_bytes())
        .finalize();
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let digest = Sha256::new()
        .chain_update(&salt)
        .chain_update(password.as_bytes())
        .finalize();
    hex::encode(digest) == digest_hex
}

/// Logged-in user id from the cookie session, if any.
fn caller_id(session: &Session) -> Option<UserId> {
    session.get::<UserId>("user_id").ok().flatten()
}

/// Map a core error to its HTTP status per kind: absent entities are 404,
/// authorization failures 403, invariant violations 500, user errors 400.
fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::TournamentNotFound(_) | TournamentError::MatchNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        TournamentError::Forbidden => HttpResponse::Forbidden().json(body),
        TournamentError::EmptyRound(_) => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Please log in first" }))
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct RegisterBody {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    game: String,
    start_date: DateTime<Utc>,
    max_teams: u32,
}

#[derive(Deserialize)]
struct RegisterTeamBody {
    name: String,
}

#[derive(Deserialize)]
struct ResolveMatchBody {
    winner_team_id: TeamId,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

/// Listing view: tournament header plus organizer name from the directory.
#[derive(Serialize)]
struct TournamentSummary {
    id: TournamentId,
    name: String,
    game: String,
    start_date: DateTime<Utc>,
    max_teams: u32,
    status: TournamentStatus,
    organizer_name: String,
}

impl TournamentSummary {
    fn from_tournament(t: &Tournament, users: &UserDirectory) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            game: t.game.clone(),
            start_date: t.start_date,
            max_teams: t.max_teams,
            status: t.status,
            organizer_name: users
                .username(t.organizer_id)
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-manager-web",
    })
}

/// Create an account.
#[post("/api/auth/register")]
async fn api_register(users: Data<UserDirectory>, body: Json<RegisterBody>) -> HttpResponse {
    match users.register(&body.username, &body.password) {
        Ok(id) => HttpResponse::Ok().json(serde_json::json!({
            "message": "User registered successfully!",
            "user_id": id,
        })),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e })),
    }
}

/// Log in; stores the user id in the cookie session.
#[post("/api/auth/login")]
async fn api_login(
    users: Data<UserDirectory>,
    session: Session,
    body: Json<LoginBody>,
) -> HttpResponse {
    match users.login(&body.username, &body.password) {
        Some(id) => {
            if session.insert("user_id", id).is_err() {
                return HttpResponse::InternalServerError().body("session error");
            }
            HttpResponse::Ok().json(serde_json::json!({ "message": "Logged in", "user_id": id }))
        }
        None => HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Wrong username or password" })),
    }
}

/// Log out; clears the session.
#[post("/api/auth/logout")]
async fn api_logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "message": "Logged out" }))
}

/// List all tournaments with their organizer names (public).
#[get("/api/tournaments")]
async fn api_list_tournaments(
    service: Data<TournamentService>,
    users: Data<UserDirectory>,
) -> HttpResponse {
    let summaries: Vec<TournamentSummary> = service
        .tournaments()
        .iter()
        .map(|t| TournamentSummary::from_tournament(t, &users))
        .collect();
    HttpResponse::Ok().json(summaries)
}

/// Create a tournament; the logged-in caller becomes its organizer.
#[post("/api/tournaments")]
async fn api_create_tournament(
    service: Data<TournamentService>,
    users: Data<UserDirectory>,
    session: Session,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    let Some(user_id) = caller_id(&session) else {
        return unauthorized();
    };
    let tournament = match Tournament::new(
        body.name.clone(),
        body.game.clone(),
        body.start_date,
        body.max_teams,
        user_id,
    ) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    let name = tournament.name.clone();
    let id = service.create_tournament(tournament);
    users.record_tournament(user_id, id);
    HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Tournament '{}' created successfully!", name),
        "tournament_id": id,
    }))
}

/// Get one tournament with its teams and matches (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(
    service: Data<TournamentService>,
    path: Path<TournamentPath>,
) -> HttpResponse {
    match service.tournament(path.id) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Register a team (tournament must be in Draft).
#[post("/api/tournaments/{id}/teams")]
async fn api_register_team(
    service: Data<TournamentService>,
    session: Session,
    path: Path<TournamentPath>,
    body: Json<RegisterTeamBody>,
) -> HttpResponse {
    if caller_id(&session).is_none() {
        return unauthorized();
    }
    match service.register_team(path.id, &body.name) {
        Ok(team_id) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Team registered",
            "team_id": team_id,
        })),
        Err(e) => error_response(&e),
    }
}

/// Generate the round-1 bracket (organizer only, at most once).
#[post("/api/tournaments/{id}/bracket/generate")]
async fn api_generate_bracket(
    service: Data<TournamentService>,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let Some(user_id) = caller_id(&session) else {
        return unauthorized();
    };
    match service.generate_first_round(path.id, user_id) {
        Ok(created) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!(
                "Tournament has officially started! Generated {} matches for round 1.",
                created
            ),
            "matches_created": created,
        })),
        Err(e) => error_response(&e),
    }
}

/// Record a match winner (organizer only); advances the bracket when the
/// round is finished.
#[post("/api/tournaments/{id}/matches/{match_id}/resolve")]
async fn api_resolve_match(
    service: Data<TournamentService>,
    session: Session,
    path: Path<TournamentMatchPath>,
    body: Json<ResolveMatchBody>,
) -> HttpResponse {
    let Some(user_id) = caller_id(&session) else {
        return unauthorized();
    };
    let outcome = match service.resolve_match(path.id, path.match_id, user_id, body.winner_team_id)
    {
        Ok(o) => o,
        Err(e) => return error_response(&e),
    };
    let message = match outcome {
        ResolveOutcome::RoundWaiting => {
            "Match resolved! Waiting for other matches in this round to finish.".to_string()
        }
        ResolveOutcome::RoundAdvanced { next_round, .. } => format!(
            "Match resolved! Round {} is finished. Round {} has been generated.",
            next_round - 1,
            next_round
        ),
        ResolveOutcome::TournamentCompleted { winner_team_id } => {
            let winner_name = service
                .tournament(path.id)
                .ok()
                .and_then(|t| t.team(winner_team_id).map(|team| team.name.clone()))
                .unwrap_or_else(|| winner_team_id.to_string());
            format!("Match resolved! Team {} has won the Tournament!", winner_name)
        }
    };
    HttpResponse::Ok().json(serde_json::json!({ "message": message, "outcome": outcome }))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let service = Data::new(TournamentService::new());
    let users = Data::new(UserDirectory::new());
    // Sessions do not survive a restart; neither does the in-memory store.
    let session_key = Key::generate();

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(users.clone())
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                session_key.clone(),
            ))
            .service(api_health)
            .service(api_register)
            .service(api_login)
            .service(api_logout)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_register_team)
            .service(api_generate_bracket)
            .service(api_resolve_match)
    })
    .bind(bind)?
    .run()
    .await
}

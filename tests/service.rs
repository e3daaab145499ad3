//! Tests for the tournament service: orchestration, error surfacing, and the
//! no-duplicate-round guarantee under concurrent resolves.

use chrono::Utc;
use std::sync::Arc;
use std::thread;
use tournament_manager_web::{
    GameMatch, ResolveOutcome, Tournament, TournamentError, TournamentId, TournamentService,
    TournamentStatus, UserId,
};
use uuid::Uuid;

const ORGANIZER: UserId = 1;

fn service_with_tournament(teams: usize, max_teams: u32) -> (TournamentService, TournamentId) {
    let service = TournamentService::new();
    let t = Tournament::new("Autumn Open", "Rocket League", Utc::now(), max_teams, ORGANIZER)
        .unwrap();
    let id = service.create_tournament(t);
    for i in 0..teams {
        service.register_team(id, &format!("Team {i}")).unwrap();
    }
    (service, id)
}

fn round_matches(service: &TournamentService, id: TournamentId, round: u32) -> Vec<GameMatch> {
    service
        .tournament(id)
        .unwrap()
        .round_matches(round)
        .cloned()
        .collect()
}

#[test]
fn unknown_tournament_is_not_found() {
    let service = TournamentService::new();
    let bogus = Uuid::new_v4();
    assert_eq!(
        service.tournament(bogus),
        Err(TournamentError::TournamentNotFound(bogus))
    );
    assert_eq!(
        service.generate_first_round(bogus, ORGANIZER),
        Err(TournamentError::TournamentNotFound(bogus))
    );
}

#[test]
fn create_register_and_snapshot() {
    let (service, id) = service_with_tournament(4, 8);
    let t = service.tournament(id).unwrap();
    assert_eq!(t.teams.len(), 4);
    assert_eq!(t.status, TournamentStatus::Draft);
    assert!(t.matches.is_empty());
}

#[test]
fn second_generate_call_is_rejected_and_changes_nothing() {
    let (service, id) = service_with_tournament(4, 4);
    assert_eq!(service.generate_first_round(id, ORGANIZER).unwrap(), 2);
    assert_eq!(
        service.generate_first_round(id, ORGANIZER),
        Err(TournamentError::BracketAlreadyGenerated)
    );
    assert_eq!(service.tournament(id).unwrap().matches.len(), 2);
}

#[test]
fn non_organizer_is_forbidden_with_no_side_effect() {
    let (service, id) = service_with_tournament(4, 4);
    assert_eq!(
        service.generate_first_round(id, ORGANIZER + 1),
        Err(TournamentError::Forbidden)
    );
    assert!(service.tournament(id).unwrap().matches.is_empty());

    service.generate_first_round(id, ORGANIZER).unwrap();
    let m = round_matches(&service, id, 1)[0].clone();
    assert_eq!(
        service.resolve_match(id, m.id, ORGANIZER + 1, m.team_a),
        Err(TournamentError::Forbidden)
    );
    assert_eq!(
        service
            .tournament(id)
            .unwrap()
            .round_matches(1)
            .find(|x| x.id == m.id)
            .and_then(|x| x.winner),
        None
    );
}

#[test]
fn registration_after_generation_is_closed() {
    let (service, id) = service_with_tournament(4, 8);
    service.generate_first_round(id, ORGANIZER).unwrap();
    assert_eq!(
        service.register_team(id, "Latecomers"),
        Err(TournamentError::RegistrationClosed)
    );
}

#[test]
fn full_run_through_the_service() {
    let (service, id) = service_with_tournament(8, 8);
    assert_eq!(service.generate_first_round(id, ORGANIZER).unwrap(), 4);

    for round in 1..=2 {
        for m in round_matches(&service, id, round) {
            if !m.is_resolved() {
                service.resolve_match(id, m.id, ORGANIZER, m.team_a).unwrap();
            }
        }
    }
    let decider = round_matches(&service, id, 3)[0].clone();
    let outcome = service
        .resolve_match(id, decider.id, ORGANIZER, decider.team_a)
        .unwrap();
    assert_eq!(
        outcome,
        ResolveOutcome::TournamentCompleted {
            winner_team_id: decider.team_a
        }
    );

    let t = service.tournament(id).unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.matches.len(), 7);
}

#[test]
fn concurrent_resolves_create_the_next_round_exactly_once() {
    // Four threads finish round 1 near-simultaneously. Whatever the
    // interleaving, exactly one of them observes the completed round and
    // creates round 2; the others see RoundWaiting.
    for _ in 0..20 {
        let (service, id) = service_with_tournament(8, 8);
        service.generate_first_round(id, ORGANIZER).unwrap();
        let service = Arc::new(service);

        let handles: Vec<_> = round_matches(&service, id, 1)
            .into_iter()
            .map(|m| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    service.resolve_match(id, m.id, ORGANIZER, m.team_a).unwrap()
                })
            })
            .collect();
        let outcomes: Vec<ResolveOutcome> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let advanced = outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o,
                    ResolveOutcome::RoundAdvanced {
                        next_round: 2,
                        matches_created: 2,
                    }
                )
            })
            .count();
        assert_eq!(advanced, 1);
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| **o == ResolveOutcome::RoundWaiting)
                .count(),
            3
        );
        assert_eq!(round_matches(&service, id, 2).len(), 2);
    }
}

#[test]
fn concurrent_duplicate_resolves_reject_all_but_one() {
    let (service, id) = service_with_tournament(4, 4);
    service.generate_first_round(id, ORGANIZER).unwrap();
    let m = round_matches(&service, id, 1)[0].clone();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            let m = m.clone();
            thread::spawn(move || service.resolve_match(id, m.id, ORGANIZER, m.team_a))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| **r == Err(TournamentError::AlreadyResolved(m.id)))
            .count(),
        3
    );
    assert_eq!(
        round_matches(&service, id, 1)
            .iter()
            .find(|x| x.id == m.id)
            .and_then(|x| x.winner),
        Some(m.team_a)
    );
}

use rand::SeedableRng;
use rand::rngs::StdRng;

use league_sim::config::{EngineConfig, ZeroStrengthPolicy};
use league_sim::error::EngineError;
use league_sim::league::League;
use league_sim::simulation::{MatchSimulator, simulate_weeks};
use league_sim::standings::{Ledger, StandingsRow};
use league_sim::team::{Team, TeamId};

fn seeded_league(teams: i64, seed: u64) -> (League, MatchSimulator<StdRng>) {
    let mut sim = MatchSimulator::with_defaults(StdRng::seed_from_u64(seed));
    let league = League::create("Test League", teams, sim.rng_mut()).expect("league");
    (league, sim)
}

fn no_draws(policy: ZeroStrengthPolicy) -> EngineConfig {
    EngineConfig {
        draw_chance: 0.0,
        zero_strength_policy: policy,
        ..EngineConfig::default()
    }
}

#[test]
fn one_week_at_a_time() {
    let (mut league, mut sim) = seeded_league(4, 11);
    let result = simulate_weeks(&mut league, false, &mut sim).expect("simulate");

    assert_eq!(result.played_matches.len(), 2);
    assert!(result.played_matches.iter().all(|m| m.week == 1 && m.is_played));
    assert_eq!(result.remaining_weeks.len(), 2);
    assert_eq!(result.played_weeks.len(), 1);
    assert_eq!(result.played_weeks[0].number, 1);
    assert_eq!(league.current_week, 1);
    assert_eq!(league.played.len(), 1);
    assert!(league.standings.iter().all(|r| r.played == 1));
    league.verify_ledger().expect("ledger consistent");
}

#[test]
fn play_all_consumes_the_season_in_order() {
    let (mut league, mut sim) = seeded_league(6, 5);
    let result = simulate_weeks(&mut league, true, &mut sim).expect("simulate");

    assert_eq!(result.played_matches.len(), 15);
    assert!(result.remaining_weeks.is_empty());
    let weeks = result.played_matches.iter().map(|m| m.week).collect::<Vec<_>>();
    assert!(weeks.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(league.current_week, 5);
    assert!(league.is_finished());
    league.verify_ledger().expect("ledger consistent");
}

#[test]
fn empty_schedule_is_not_an_error() {
    let (mut league, mut sim) = seeded_league(4, 3);
    simulate_weeks(&mut league, true, &mut sim).expect("season");
    let before = league.clone();

    let result = simulate_weeks(&mut league, false, &mut sim).expect("empty result");
    assert!(result.played_matches.is_empty());
    assert!(result.remaining_weeks.is_empty());
    assert_eq!(league, before);
}

#[test]
fn standings_add_up_after_a_season() {
    let (mut league, mut sim) = seeded_league(8, 2024);
    simulate_weeks(&mut league, true, &mut sim).expect("simulate");

    let total_goals: i32 = league.standings.iter().map(|r| r.goals).sum();
    let total_against: i32 = league.standings.iter().map(|r| r.against).sum();
    assert_eq!(total_goals, total_against);

    for row in &league.standings {
        assert_eq!(row.played, 7);
        assert_eq!(row.played, row.wins + row.draws + row.losses);
        assert_eq!(row.points, row.wins * 3 + row.draws);
        assert_eq!(row.diff, row.goals - row.against);
    }
    let wins: i32 = league.standings.iter().map(|r| r.wins).sum();
    let losses: i32 = league.standings.iter().map(|r| r.losses).sum();
    assert_eq!(wins, losses);
}

#[test]
fn recorded_scores_match_winner_marker() {
    let (mut league, mut sim) = seeded_league(10, 77);
    let result = simulate_weeks(&mut league, true, &mut sim).expect("simulate");
    for m in &result.played_matches {
        if m.is_draw() {
            assert_eq!(m.home_score, m.away_score);
            assert!(m.home_score <= 2);
        } else if m.winner == m.home {
            assert!(m.home_score > m.away_score);
            assert!((1..=5).contains(&m.home_score));
        } else {
            assert_eq!(m.winner, m.away);
            assert!(m.away_score > m.home_score);
            assert!((1..=5).contains(&m.away_score));
        }
    }
}

#[test]
fn condition_stays_clamped_over_many_matches() {
    let mut teams = vec![
        Team::new("Home", 90.0, 90.0, 12.0, 97.0),
        Team::new("Away", 75.0, 72.0, 8.0, 3.0),
    ];
    let mut rows = vec![StandingsRow::new("Home"), StandingsRow::new("Away")];
    let mut sim = MatchSimulator::with_defaults(StdRng::seed_from_u64(42));

    for _ in 0..300 {
        let outcome = sim
            .simulate(TeamId(0), TeamId(1), &teams)
            .expect("simulate");
        Ledger::new(&mut teams, &mut rows).record(&outcome).expect("record");
        for t in &teams {
            assert!((0.0..=100.0).contains(&t.stamina), "{}: {}", t.name, t.stamina);
            assert!((0.0..=100.0).contains(&t.morale), "{}: {}", t.name, t.morale);
        }
    }
    assert_eq!(teams[0].stamina, 0.0);
    assert_eq!(teams[1].stamina, 0.0);
    assert_eq!(rows[0].played, 300);
    // Attack and defense are never touched by match effects.
    assert_eq!(teams[0].attack_power, 90.0);
    assert_eq!(teams[1].defense_power, 72.0);
}

#[test]
fn home_advantage_is_mild() {
    let teams = vec![
        Team::new("Home", 80.0, 80.0, 80.0, 80.0),
        Team::new("Away", 80.0, 80.0, 80.0, 80.0),
    ];
    let mut sim = MatchSimulator::with_defaults(StdRng::seed_from_u64(8));

    let trials = 100_000;
    let (mut home_wins, mut away_wins, mut draws) = (0usize, 0usize, 0usize);
    for _ in 0..trials {
        let outcome = sim.simulate(TeamId(0), TeamId(1), &teams).expect("simulate");
        if outcome.is_draw {
            draws += 1;
        } else if outcome.winner == TeamId(0) {
            home_wins += 1;
        } else {
            away_wins += 1;
        }
    }

    assert!(home_wins > away_wins);
    assert!((home_wins as f64) / (trials as f64) < 0.5);
    let draw_rate = draws as f64 / trials as f64;
    assert!((draw_rate - 0.2).abs() < 0.01, "draw rate {draw_rate}");
}

#[test]
fn zero_strength_forced_draw() {
    let teams = vec![Team::new("Nil", 0.0, 0.0, 0.0, 0.0), Team::new("Void", 0.0, 0.0, 0.0, 0.0)];
    let mut sim = MatchSimulator::new(
        StdRng::seed_from_u64(1),
        &no_draws(ZeroStrengthPolicy::ForcedDraw),
    );
    for _ in 0..50 {
        let outcome = sim.simulate(TeamId(0), TeamId(1), &teams).expect("simulate");
        assert!(outcome.is_draw);
        assert_eq!(outcome.winner_goals, outcome.loser_goals);
    }
}

#[test]
fn zero_strength_coin_flip_produces_results() {
    let teams = vec![Team::new("Nil", 0.0, 0.0, 0.0, 0.0), Team::new("Void", 0.0, 0.0, 0.0, 0.0)];
    let mut sim = MatchSimulator::new(
        StdRng::seed_from_u64(1),
        &no_draws(ZeroStrengthPolicy::CoinFlip),
    );
    let mut home = 0;
    for _ in 0..1_000 {
        let outcome = sim.simulate(TeamId(0), TeamId(1), &teams).expect("simulate");
        assert!(!outcome.is_draw);
        assert!(outcome.winner_goals > outcome.loser_goals);
        if outcome.winner == TeamId(0) {
            home += 1;
        }
    }
    assert!((350..=650).contains(&home), "home wins {home}");
}

#[test]
fn zero_strength_reject_reports_degenerate_state() {
    let teams = vec![Team::new("Nil", 0.0, 0.0, 0.0, 0.0), Team::new("Void", 0.0, 0.0, 0.0, 0.0)];
    let mut sim = MatchSimulator::new(
        StdRng::seed_from_u64(1),
        &no_draws(ZeroStrengthPolicy::Reject),
    );
    let err = sim.simulate(TeamId(0), TeamId(1), &teams).unwrap_err();
    assert_eq!(
        err,
        EngineError::DegenerateState {
            home: "Nil".to_string(),
            away: "Void".to_string(),
        }
    );
}

#[test]
fn unknown_fixture_team_leaves_league_untouched() {
    let (mut league, mut sim) = seeded_league(4, 9);
    league.upcoming[0].matches[1].away = "Ghost FC".to_string();
    let before = league.clone();

    let err = simulate_weeks(&mut league, true, &mut sim).unwrap_err();
    assert!(matches!(err, EngineError::NotFound { kind: "team", .. }));
    assert_eq!(league, before);
}

#[test]
fn out_of_range_team_id_is_not_found() {
    let teams = vec![Team::new("Solo", 80.0, 80.0, 80.0, 80.0)];
    let mut sim = MatchSimulator::with_defaults(StdRng::seed_from_u64(1));
    let err = sim.simulate(TeamId(0), TeamId(3), &teams).unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
}

#[test]
fn reset_starts_a_fresh_season() {
    let (mut league, mut sim) = seeded_league(5, 12);
    simulate_weeks(&mut league, true, &mut sim).expect("simulate");
    let id = league.id.clone();

    league.reset(sim.rng_mut()).expect("reset");
    assert_eq!(league.id, id);
    assert_eq!(league.teams.len(), 5);
    assert_eq!(league.upcoming.len(), 5);
    assert!(league.played.is_empty());
    assert!(league.matches.is_empty());
    assert_eq!(league.current_week, 0);
    assert!(league.standings.iter().all(|r| *r == StandingsRow::new(r.team.clone())));
    let first = league.team("Team A").expect("roster regenerated");
    assert!((70.0..100.0).contains(&first.attack_power));
    assert!(matches!(league.team("Team F"), Err(EngineError::NotFound { .. })));
}

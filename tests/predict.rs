use league_sim::predict::{PredictWeights, TeamStanding, predict_championship};
use league_sim::standings::StandingsRow;
use league_sim::team::Team;

fn entry(name: &str, played: i32, points: i32, goals: i32, against: i32) -> TeamStanding {
    let mut row = StandingsRow::new(name);
    row.played = played;
    row.points = points;
    row.goals = goals;
    row.against = against;
    row.refresh_diff();
    TeamStanding {
        team: Team::new(name, 85.0, 85.0, 80.0, 80.0),
        row,
    }
}

#[test]
fn empty_table_predicts_nothing() {
    assert!(predict_championship(&[], PredictWeights::default()).is_empty());
}

#[test]
fn finished_season_goes_to_the_leader() {
    let table = vec![
        entry("Team A", 3, 9, 7, 1),
        entry("Team B", 3, 6, 5, 3),
        entry("Team C", 3, 3, 2, 5),
        entry("Team D", 3, 0, 1, 6),
    ];
    let out = predict_championship(&table, PredictWeights::default());

    assert_eq!(out.len(), 4);
    assert_eq!(out[0].team_name, "Team A");
    assert_eq!(out[0].odds, 100.0);
    assert!(!out[0].eliminated);
    for p in &out[1..] {
        assert_eq!(p.odds, 0.0);
        assert!(p.eliminated, "{} should be out", p.team_name);
    }
}

#[test]
fn finished_season_tie_breaks_on_goal_difference() {
    let table = vec![
        entry("Team A", 3, 6, 4, 3),
        entry("Team B", 3, 6, 6, 2),
        entry("Team C", 3, 4, 3, 3),
        entry("Team D", 3, 1, 1, 6),
    ];
    let out = predict_championship(&table, PredictWeights::default());
    assert_eq!(out[1].odds, 100.0);
    assert_eq!(out[0].odds, 0.0);
}

#[test]
fn finished_season_full_tie_keeps_the_first_team() {
    let table = vec![
        entry("Team A", 3, 4, 3, 3),
        entry("Team B", 3, 4, 3, 3),
        entry("Team C", 3, 4, 3, 3),
        entry("Team D", 3, 4, 3, 3),
    ];
    let out = predict_championship(&table, PredictWeights::default());
    assert_eq!(out[0].odds, 100.0);
    assert!(out[1..].iter().all(|p| p.odds == 0.0 && p.eliminated));
}

#[test]
fn mid_season_elimination() {
    // One match left each; a team three points short of second cannot catch the leader.
    let table = vec![
        entry("Team A", 2, 6, 5, 1),
        entry("Team B", 2, 3, 3, 3),
        entry("Team C", 2, 3, 2, 2),
        entry("Team D", 2, 0, 0, 4),
    ];
    let out = predict_championship(&table, PredictWeights::default());

    assert!(!out[0].eliminated);
    assert!(!out[1].eliminated);
    assert!(!out[2].eliminated);
    assert!(out[3].eliminated);
    assert_eq!(out[3].odds, 0.0);

    let total: f64 = out.iter().filter(|p| !p.eliminated).map(|p| p.odds).sum();
    assert!((total - 100.0).abs() < 1e-6, "total odds {total}");
    assert!(out[0].odds > out[1].odds);
}

#[test]
fn odds_stay_in_range_and_sum_to_one_hundred() {
    let table = (0..10)
        .map(|i| {
            let mut e = entry(&format!("Team {i}"), 4, (i % 5) * 2, i, 3);
            e.team.attack_power = 70.0 + i as f64 * 3.0;
            e
        })
        .collect::<Vec<_>>();
    let out = predict_championship(&table, PredictWeights::default());

    for p in &out {
        assert!((0.0..=100.0).contains(&p.odds), "{}: {}", p.team_name, p.odds);
        assert!(p.strength > 0.0);
    }
    let total: f64 = out.iter().map(|p| p.odds).sum();
    assert!((total - 100.0).abs() < 1e-6, "total odds {total}");
}

#[test]
fn stronger_team_gets_better_odds_on_equal_points() {
    let mut strong = entry("Strong", 1, 3, 2, 1);
    strong.team.attack_power = 99.0;
    strong.team.defense_power = 99.0;
    let weak = entry("Weak", 1, 3, 2, 1);
    let out = predict_championship(
        &[strong, weak, entry("Other", 1, 0, 1, 2)],
        PredictWeights::default(),
    );
    assert!(out[0].odds > out[1].odds);
}

#[test]
fn all_zero_scores_give_zero_odds() {
    let table = (0..4)
        .map(|i| TeamStanding {
            team: Team::new(format!("Team {i}"), 0.0, 0.0, 0.0, 0.0),
            row: StandingsRow::new(format!("Team {i}")),
        })
        .collect::<Vec<_>>();
    let out = predict_championship(&table, PredictWeights::default());
    assert!(out.iter().all(|p| p.odds == 0.0 && !p.eliminated));
}

#[test]
fn weights_change_the_blend() {
    let mut strong = entry("Strong", 1, 0, 0, 1);
    strong.team.attack_power = 99.0;
    strong.team.defense_power = 99.0;
    let table = vec![strong, entry("Leader", 1, 3, 1, 0), entry("Other", 1, 0, 0, 0)];

    let by_points = predict_championship(&table, PredictWeights { points: 1.0, strength: 0.0 });
    assert_eq!(by_points[0].odds, 0.0);
    assert_eq!(by_points[1].odds, 100.0);

    let by_strength = predict_championship(&table, PredictWeights { points: 0.0, strength: 1.0 });
    assert!(by_strength[0].odds > by_strength[1].odds);
}

#[test]
fn negative_scores_count_as_zero() {
    let table = vec![
        entry("Team A", 1, 3, 2, 0),
        entry("Team B", 1, 3, 1, 0),
        entry("Team C", 1, 0, 0, 3),
    ];
    // Heavy negative points weight pushes both leaders below zero.
    let weights = PredictWeights {
        points: -30.0,
        strength: 1.0,
    };
    let out = predict_championship(&table, weights);

    for p in &out {
        assert!((0.0..=100.0).contains(&p.odds), "{}: {}", p.team_name, p.odds);
        assert!(!p.eliminated);
    }
    assert_eq!(out[0].odds, 0.0);
    assert_eq!(out[1].odds, 0.0);
    assert_eq!(out[2].odds, 100.0);
}

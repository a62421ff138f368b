use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::standings::StandingsRow;
use crate::strength::team_strength;
use crate::team::Team;

const POINTS_PER_REMAINING_MATCH: i32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team: Team,
    pub row: StandingsRow,
}

#[derive(Debug, Clone, Copy)]
pub struct PredictWeights {
    pub points: f64,
    pub strength: f64,
}

impl Default for PredictWeights {
    fn default() -> Self {
        Self {
            points: 0.4,
            strength: 0.6,
        }
    }
}

impl From<&EngineConfig> for PredictWeights {
    fn from(cfg: &EngineConfig) -> Self {
        Self {
            points: cfg.weight_points,
            strength: cfg.weight_strength,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedStanding {
    pub team_name: String,
    pub points: i32,
    pub strength: f64,
    pub odds: f64,
    pub eliminated: bool,
}

struct Scored<'a> {
    entry: &'a TeamStanding,
    strength: f64,
    score: f64,
    remaining: i32,
}

/// Title odds per team from a blend of current points and strength.
///
/// Once every team has played all its matches the table leader (points, then
/// goal difference; earlier rows win remaining ties) takes 100 and everyone
/// else is eliminated. Before that, a team that can no longer reach the
/// leader's points is eliminated with odds 0 and the rest share 100 in
/// proportion to their score relative to the league average.
pub fn predict_championship(standings: &[TeamStanding], weights: PredictWeights) -> Vec<PredictedStanding> {
    if standings.is_empty() {
        return Vec::new();
    }

    let total_teams = standings.len() as i32;
    let leader_points = standings.iter().map(|s| s.row.points).max().unwrap_or(0).max(0);

    let scored = standings
        .iter()
        .map(|entry| {
            let strength = team_strength(&entry.team);
            Scored {
                entry,
                strength,
                score: entry.row.points as f64 * weights.points + strength * weights.strength,
                remaining: (total_teams - 1) - entry.row.played,
            }
        })
        .collect::<Vec<_>>();

    if scored.iter().all(|s| s.remaining <= 0) {
        return season_complete(&scored);
    }

    let avg_score = scored.iter().map(|s| s.score).sum::<f64>() / scored.len() as f64;
    let eliminated = scored
        .iter()
        .map(|s| s.entry.row.points + s.remaining * POINTS_PER_REMAINING_MATCH < leader_points)
        .collect::<Vec<_>>();
    let adjusted = scored
        .iter()
        .zip(&eliminated)
        .map(|(s, out)| {
            if *out || avg_score <= 0.0 {
                0.0
            } else if s.score < 0.0 {
                log::warn!(
                    "{}: negative prediction score {:.3}, counting it as 0",
                    s.entry.team.name,
                    s.score
                );
                0.0
            } else {
                s.score / avg_score
            }
        })
        .collect::<Vec<_>>();
    let total_adjusted = adjusted.iter().sum::<f64>();

    log::debug!(
        "prediction: leader={} avg_score={:.3} total_adjusted={:.3}",
        leader_points,
        avg_score,
        total_adjusted
    );

    scored
        .iter()
        .zip(eliminated)
        .zip(adjusted)
        .map(|((s, out), adj)| {
            let odds = if out || total_adjusted <= 0.0 {
                0.0
            } else {
                adj / total_adjusted * 100.0
            };
            predicted(s, odds, out)
        })
        .collect()
}

fn season_complete(scored: &[Scored<'_>]) -> Vec<PredictedStanding> {
    let mut leader = 0usize;
    for (idx, s) in scored.iter().enumerate().skip(1) {
        let best = &scored[leader].entry.row;
        let row = &s.entry.row;
        if row.points > best.points
            || (row.points == best.points && row.goal_difference() > best.goal_difference())
        {
            leader = idx;
        }
    }

    scored
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            if idx == leader {
                predicted(s, 100.0, false)
            } else {
                predicted(s, 0.0, true)
            }
        })
        .collect()
}

fn predicted(s: &Scored<'_>, odds: f64, eliminated: bool) -> PredictedStanding {
    PredictedStanding {
        team_name: s.entry.team.name.clone(),
        points: s.entry.row.points,
        strength: s.strength,
        odds,
        eliminated,
    }
}

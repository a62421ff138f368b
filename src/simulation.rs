use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, ZeroStrengthPolicy};
use crate::error::{EngineError, EngineResult};
use crate::fixtures::{Fixture, Week};
use crate::league::League;
use crate::standings::{DRAW_MARKER, Ledger, MatchRecord};
use crate::strength::team_strength;
use crate::team::{Team, TeamId};

const DRAW_GOALS_MAX: u32 = 2;
const WINNER_GOALS_MAX: u32 = 5;

/// Result of one match. On a draw `winner` is the home side and both goal counts match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winner: TeamId,
    pub loser: TeamId,
    pub is_draw: bool,
    pub winner_goals: u32,
    pub loser_goals: u32,
}

impl MatchOutcome {
    pub fn draw(home: TeamId, away: TeamId, goals: u32) -> Self {
        Self {
            winner: home,
            loser: away,
            is_draw: true,
            winner_goals: goals,
            loser_goals: goals,
        }
    }

    /// Outcome implied by a final score.
    pub fn from_score(home: TeamId, away: TeamId, home_goals: u32, away_goals: u32) -> Self {
        if home_goals > away_goals {
            Self {
                winner: home,
                loser: away,
                is_draw: false,
                winner_goals: home_goals,
                loser_goals: away_goals,
            }
        } else if home_goals < away_goals {
            Self {
                winner: away,
                loser: home,
                is_draw: false,
                winner_goals: away_goals,
                loser_goals: home_goals,
            }
        } else {
            Self::draw(home, away, home_goals)
        }
    }

    /// Goals as (home, away) given which id played at home.
    pub fn score_for(&self, home: TeamId) -> (u32, u32) {
        if self.is_draw || self.winner == home {
            (self.winner_goals, self.loser_goals)
        } else {
            (self.loser_goals, self.winner_goals)
        }
    }

    pub fn to_record(&self, league_id: &str, week: u32, fixture: &Fixture, home: TeamId) -> MatchRecord {
        let (home_score, away_score) = self.score_for(home);
        let winner = if self.is_draw {
            DRAW_MARKER.to_string()
        } else if self.winner == home {
            fixture.home.clone()
        } else {
            fixture.away.clone()
        };
        MatchRecord {
            league_id: league_id.to_string(),
            week,
            home: fixture.home.clone(),
            away: fixture.away.clone(),
            home_score,
            away_score,
            winner,
            is_played: true,
        }
    }
}

pub struct MatchSimulator<R> {
    rng: R,
    home_advantage: f64,
    draw_chance: f64,
    zero_strength_policy: ZeroStrengthPolicy,
}

impl<R: Rng> MatchSimulator<R> {
    pub fn new(rng: R, cfg: &EngineConfig) -> Self {
        Self {
            rng,
            home_advantage: cfg.home_advantage,
            draw_chance: cfg.draw_chance,
            zero_strength_policy: cfg.zero_strength_policy,
        }
    }

    pub fn with_defaults(rng: R) -> Self {
        Self::new(rng, &EngineConfig::default())
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn simulate(&mut self, home: TeamId, away: TeamId, teams: &[Team]) -> EngineResult<MatchOutcome> {
        let home_team = lookup(teams, home)?;
        let away_team = lookup(teams, away)?;

        let home_score = team_strength(home_team) * self.home_advantage;
        let away_score = team_strength(away_team);

        if self.rng.r#gen::<f64>() < self.draw_chance {
            let goals = self.rng.gen_range(0..=DRAW_GOALS_MAX);
            return Ok(MatchOutcome::draw(home, away, goals));
        }

        let total = home_score + away_score;
        let home_chance = if total > 0.0 {
            home_score / total
        } else {
            match self.zero_strength_policy {
                ZeroStrengthPolicy::ForcedDraw => {
                    log::warn!(
                        "{} vs {}: zero combined strength, forcing a draw",
                        home_team.name,
                        away_team.name
                    );
                    let goals = self.rng.gen_range(0..=DRAW_GOALS_MAX);
                    return Ok(MatchOutcome::draw(home, away, goals));
                }
                ZeroStrengthPolicy::CoinFlip => {
                    log::warn!(
                        "{} vs {}: zero combined strength, using even odds",
                        home_team.name,
                        away_team.name
                    );
                    0.5
                }
                ZeroStrengthPolicy::Reject => {
                    return Err(EngineError::DegenerateState {
                        home: home_team.name.clone(),
                        away: away_team.name.clone(),
                    });
                }
            }
        };

        let home_wins = self.rng.r#gen::<f64>() < home_chance;
        let winner_goals = self.rng.gen_range(1..=WINNER_GOALS_MAX);
        let loser_goals = self.rng.gen_range(0..winner_goals);

        let (winner, loser) = if home_wins { (home, away) } else { (away, home) };
        Ok(MatchOutcome {
            winner,
            loser,
            is_draw: false,
            winner_goals,
            loser_goals,
        })
    }
}

fn lookup(teams: &[Team], id: TeamId) -> EngineResult<&Team> {
    teams.get(id.0).ok_or_else(|| EngineError::NotFound {
        kind: "team id",
        key: id.0.to_string(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub played_matches: Vec<MatchRecord>,
    pub remaining_weeks: Vec<Week>,
    pub played_weeks: Vec<Week>,
}

/// Plays the next upcoming week, or every remaining week when `play_all` is set.
///
/// All changes are staged on copies of the team and standings tables and only
/// committed to `league` once every match in the batch has been played.
pub fn simulate_weeks<R: Rng>(
    league: &mut League,
    play_all: bool,
    sim: &mut MatchSimulator<R>,
) -> EngineResult<SimulationResult> {
    league.upcoming.sort_by_key(|w| w.number);
    if league.upcoming.is_empty() {
        log::info!("league {}: no upcoming weeks to simulate", league.id);
        return Ok(SimulationResult {
            played_matches: Vec::new(),
            remaining_weeks: Vec::new(),
            played_weeks: league.played.clone(),
        });
    }

    let week_count = if play_all { league.upcoming.len() } else { 1 };
    let mut teams = league.teams.clone();
    let mut rows = league.standings.clone();
    let mut played_matches = Vec::new();

    for week in &league.upcoming[..week_count] {
        for fixture in &week.matches {
            let home = league.team_id(&fixture.home)?;
            let away = league.team_id(&fixture.away)?;
            let outcome = sim.simulate(home, away, &teams)?;
            Ledger::new(&mut teams, &mut rows).record(&outcome)?;

            let record = outcome.to_record(&league.id, week.number, fixture, home);
            log::debug!(
                "week {}: {} {}-{} {}",
                record.week,
                record.home,
                record.home_score,
                record.away_score,
                record.away
            );
            played_matches.push(record);
        }
    }
    Ledger::new(&mut teams, &mut rows).refresh_diffs();

    let consumed = league.upcoming.drain(..week_count).collect::<Vec<_>>();
    if let Some(last) = consumed.last() {
        league.current_week = last.number;
    }
    league.played.extend(consumed);
    league.teams = teams;
    league.standings = rows;
    league.matches.extend(played_matches.iter().cloned());

    log::info!(
        "league {}: simulated {} weeks, {} matches, {} weeks left",
        league.id,
        week_count,
        played_matches.len(),
        league.upcoming.len()
    );

    Ok(SimulationResult {
        played_matches,
        remaining_weeks: league.upcoming.clone(),
        played_weeks: league.played.clone(),
    })
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::simulation::MatchOutcome;
use crate::team::{Team, TeamId};

pub const POINTS_WIN: i32 = 3;
pub const POINTS_DRAW: i32 = 1;

/// Winner marker stored on a drawn match record.
pub const DRAW_MARKER: &str = "draw";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSide {
    Winner,
    Loser,
    Draw,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team: String,
    pub goals: i32,
    pub against: i32,
    pub diff: i32,
    pub played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub points: i32,
}

impl StandingsRow {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            ..Self::default()
        }
    }

    pub fn goal_difference(&self) -> i32 {
        self.goals.saturating_sub(self.against)
    }

    pub fn refresh_diff(&mut self) {
        self.diff = self.goal_difference();
    }

    /// Row after one more match on `side`. Fails instead of overflowing.
    fn applied(&self, side: MatchSide, goals_for: u32, goals_against: u32) -> EngineResult<Self> {
        let mut next = self.clone();
        next.goals = checked(self.goals.checked_add(goal_count(goals_for)?), &self.team)?;
        next.against = checked(self.against.checked_add(goal_count(goals_against)?), &self.team)?;
        next.played = checked(self.played.checked_add(1), &self.team)?;
        match side {
            MatchSide::Winner => {
                next.wins = checked(self.wins.checked_add(1), &self.team)?;
                next.points = checked(self.points.checked_add(POINTS_WIN), &self.team)?;
            }
            MatchSide::Loser => {
                next.losses = checked(self.losses.checked_add(1), &self.team)?;
            }
            MatchSide::Draw => {
                next.draws = checked(self.draws.checked_add(1), &self.team)?;
                next.points = checked(self.points.checked_add(POINTS_DRAW), &self.team)?;
            }
        }
        Ok(next)
    }

    /// Row with one match on `side` taken back out.
    fn reverted(&self, side: MatchSide, goals_for: u32, goals_against: u32) -> EngineResult<Self> {
        let counter = match side {
            MatchSide::Winner => self.wins,
            MatchSide::Loser => self.losses,
            MatchSide::Draw => self.draws,
        };
        if self.played < 1 || counter < 1 {
            return Err(EngineError::InvalidState(format!(
                "{}: no {:?} result left to revert",
                self.team, side
            )));
        }

        let mut next = self.clone();
        next.goals = checked(self.goals.checked_sub(goal_count(goals_for)?), &self.team)?;
        next.against = checked(self.against.checked_sub(goal_count(goals_against)?), &self.team)?;
        next.played -= 1;
        match side {
            MatchSide::Winner => {
                next.wins -= 1;
                next.points = checked(self.points.checked_sub(POINTS_WIN), &self.team)?;
            }
            MatchSide::Loser => {
                next.losses -= 1;
            }
            MatchSide::Draw => {
                next.draws -= 1;
                next.points = checked(self.points.checked_sub(POINTS_DRAW), &self.team)?;
            }
        }
        Ok(next)
    }
}

/// Goal count as stored in a row.
pub fn goal_count(goals: u32) -> EngineResult<i32> {
    i32::try_from(goals)
        .map_err(|_| EngineError::InvalidArgument(format!("goal count {goals} is out of range")))
}

fn checked(value: Option<i32>, team: &str) -> EngineResult<i32> {
    value.ok_or_else(|| EngineError::InvalidState(format!("{team}: standings total out of range")))
}

/// Identifies one scheduled match within a league.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchKey {
    pub week: u32,
    pub home: String,
    pub away: String,
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week {} {} vs {}", self.week, self.home, self.away)
    }
}

/// Durable trace of one played match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub league_id: String,
    pub week: u32,
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
    pub winner: String,
    pub is_played: bool,
}

impl MatchRecord {
    pub fn key(&self) -> MatchKey {
        MatchKey {
            week: self.week,
            home: self.home.clone(),
            away: self.away.clone(),
        }
    }

    pub fn is_draw(&self) -> bool {
        self.winner == DRAW_MARKER
    }

    /// Sides for (home, away) as recorded by the winner marker.
    pub fn sides(&self) -> EngineResult<(MatchSide, MatchSide)> {
        if self.is_draw() {
            Ok((MatchSide::Draw, MatchSide::Draw))
        } else if self.winner == self.home {
            Ok((MatchSide::Winner, MatchSide::Loser))
        } else if self.winner == self.away {
            Ok((MatchSide::Loser, MatchSide::Winner))
        } else {
            Err(EngineError::InvalidState(format!(
                "{}: winner {:?} is neither side",
                self.key(),
                self.winner
            )))
        }
    }
}

/// Single mutation path for team attributes and standings rows, both indexed by [`TeamId`].
pub struct Ledger<'a> {
    teams: &'a mut [Team],
    rows: &'a mut [StandingsRow],
}

impl<'a> Ledger<'a> {
    pub fn new(teams: &'a mut [Team], rows: &'a mut [StandingsRow]) -> Self {
        Self { teams, rows }
    }

    fn entry(&mut self, id: TeamId) -> EngineResult<(&mut Team, &mut StandingsRow)> {
        match (self.teams.get_mut(id.0), self.rows.get_mut(id.0)) {
            (Some(team), Some(row)) => Ok((team, row)),
            _ => Err(EngineError::NotFound {
                kind: "team id",
                key: id.0.to_string(),
            }),
        }
    }

    fn row(&self, id: TeamId) -> EngineResult<&StandingsRow> {
        self.rows.get(id.0).ok_or_else(|| EngineError::NotFound {
            kind: "team id",
            key: id.0.to_string(),
        })
    }

    pub fn record(&mut self, outcome: &MatchOutcome) -> EngineResult<()> {
        let (winner_side, loser_side) = if outcome.is_draw {
            (MatchSide::Draw, MatchSide::Draw)
        } else {
            (MatchSide::Winner, MatchSide::Loser)
        };
        // Both rows are computed before either is written.
        let winner_row = self
            .row(outcome.winner)?
            .applied(winner_side, outcome.winner_goals, outcome.loser_goals)?;
        let loser_row = self
            .row(outcome.loser)?
            .applied(loser_side, outcome.loser_goals, outcome.winner_goals)?;

        let (team, row) = self.entry(outcome.winner)?;
        *row = winner_row;
        team.apply_match_effects(winner_side);

        let (team, row) = self.entry(outcome.loser)?;
        *row = loser_row;
        team.apply_match_effects(loser_side);
        Ok(())
    }

    /// Replaces a recorded match with `outcome`: the old result comes out of both
    /// rows and the new one goes in. Stamina and morale only move when a side's
    /// result changes, so rescoring a win as a bigger win leaves both teams as they are.
    pub fn rescore(
        &mut self,
        home: TeamId,
        away: TeamId,
        record: &MatchRecord,
        outcome: &MatchOutcome,
    ) -> EngineResult<()> {
        let (old_home, old_away) = record.sides()?;
        let (new_home, new_away) = outcome_sides(outcome, home);
        let (home_goals, away_goals) = outcome.score_for(home);
        let not_reflected = |_| {
            EngineError::InvalidState(format!("{} is not reflected in the standings", record.key()))
        };

        let home_row = self
            .row(home)?
            .reverted(old_home, record.home_score, record.away_score)
            .map_err(not_reflected)?
            .applied(new_home, home_goals, away_goals)?;
        let away_row = self
            .row(away)?
            .reverted(old_away, record.away_score, record.home_score)
            .map_err(not_reflected)?
            .applied(new_away, away_goals, home_goals)?;

        let updates = [
            (home, home_row, old_home, new_home),
            (away, away_row, old_away, new_away),
        ];
        for (id, row, old, new) in updates {
            let (team, slot) = self.entry(id)?;
            *slot = row;
            if old != new {
                team.revert_match_effects(old);
                team.apply_match_effects(new);
            }
        }
        Ok(())
    }

    pub fn refresh_diffs(&mut self) {
        for row in self.rows.iter_mut() {
            row.refresh_diff();
        }
    }
}

fn outcome_sides(outcome: &MatchOutcome, home: TeamId) -> (MatchSide, MatchSide) {
    if outcome.is_draw {
        (MatchSide::Draw, MatchSide::Draw)
    } else if outcome.winner == home {
        (MatchSide::Winner, MatchSide::Loser)
    } else {
        (MatchSide::Loser, MatchSide::Winner)
    }
}

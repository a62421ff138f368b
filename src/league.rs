use std::cmp::Ordering;
use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::fixtures::{Week, generate_fixtures};
use crate::predict::TeamStanding;
use crate::standings::{MatchKey, MatchRecord, StandingsRow};
use crate::team::{Team, TeamId, generate_roster};

/// One league's mutable unit: teams, standings, schedule and played-match records.
///
/// `teams[i]` and `standings[i]` always describe the same team; [`TeamId`] is that index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    pub teams: Vec<Team>,
    pub standings: Vec<StandingsRow>,
    pub total_weeks: u32,
    pub current_week: u32,
    pub upcoming: Vec<Week>,
    pub played: Vec<Week>,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

impl League {
    pub fn create<R: Rng + ?Sized>(name: &str, team_count: i64, rng: &mut R) -> EngineResult<Self> {
        let teams = generate_roster(team_count, rng)?;
        let league = Self::from_teams(Uuid::new_v4().to_string(), name, teams)?;
        log::info!(
            "created league {} ({:?}) with {} teams over {} weeks",
            league.id,
            league.name,
            league.teams.len(),
            league.total_weeks
        );
        Ok(league)
    }

    /// Builds a fresh season for an explicit roster.
    pub fn from_teams(id: impl Into<String>, name: &str, teams: Vec<Team>) -> EngineResult<Self> {
        let mut seen = HashSet::new();
        for team in &teams {
            if !seen.insert(team.name.as_str()) {
                return Err(EngineError::InvalidArgument(format!(
                    "duplicate team name {:?}",
                    team.name
                )));
            }
        }

        let fixtures = generate_fixtures(&teams);
        let standings = teams.iter().map(|t| StandingsRow::new(t.name.clone())).collect();
        Ok(Self {
            id: id.into(),
            name: name.to_string(),
            total_weeks: fixtures.len() as u32,
            current_week: 0,
            upcoming: fixtures,
            played: Vec::new(),
            matches: Vec::new(),
            standings,
            teams,
        })
    }

    /// New roster (same size), schedule and zeroed standings; played history is discarded.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> EngineResult<()> {
        let teams = generate_roster(self.teams.len() as i64, rng)?;
        let fresh = Self::from_teams(self.id.clone(), &self.name, teams)?;
        *self = fresh;
        log::info!("reset league {}", self.id);
        Ok(())
    }

    pub fn team_id(&self, name: &str) -> EngineResult<TeamId> {
        self.teams
            .iter()
            .position(|t| t.name == name)
            .map(TeamId)
            .ok_or_else(|| EngineError::team_not_found(name))
    }

    pub fn team(&self, name: &str) -> EngineResult<&Team> {
        let id = self.team_id(name)?;
        Ok(&self.teams[id.0])
    }

    pub fn standing(&self, name: &str) -> EngineResult<&StandingsRow> {
        let id = self.team_id(name)?;
        self.standings
            .get(id.0)
            .ok_or_else(|| EngineError::team_not_found(name))
    }

    pub fn find_match(&self, key: &MatchKey) -> EngineResult<usize> {
        self.matches
            .iter()
            .position(|m| m.is_played && m.key() == *key)
            .ok_or_else(|| EngineError::match_not_found(key))
    }

    pub fn standings_snapshot(&self) -> Vec<TeamStanding> {
        self.teams
            .iter()
            .zip(self.standings.iter())
            .map(|(team, row)| TeamStanding {
                team: team.clone(),
                row: row.clone(),
            })
            .collect()
    }

    /// Standings in table order: points, goal difference, goals scored, then name.
    pub fn table(&self) -> Vec<&StandingsRow> {
        let mut rows = self.standings.iter().collect::<Vec<_>>();
        rows.sort_by(|a, b| compare_rows(a, b));
        rows
    }

    pub fn is_finished(&self) -> bool {
        self.upcoming.iter().all(|w| w.matches.is_empty())
    }

    /// Checks the ledger against the played-match records.
    pub fn verify_ledger(&self) -> EngineResult<()> {
        if self.teams.len() != self.standings.len() {
            return Err(EngineError::InvalidState(format!(
                "{} teams but {} standings rows",
                self.teams.len(),
                self.standings.len()
            )));
        }

        let mut appearances = vec![0i32; self.teams.len()];
        for record in self.matches.iter().filter(|m| m.is_played) {
            appearances[self.team_id(&record.home)?.0] += 1;
            appearances[self.team_id(&record.away)?.0] += 1;
        }

        for ((team, row), seen) in self.teams.iter().zip(&self.standings).zip(appearances) {
            if row.team != team.name {
                return Err(EngineError::InvalidState(format!(
                    "standings row {:?} is out of line with team {:?}",
                    row.team, team.name
                )));
            }
            if row.played != row.wins + row.draws + row.losses {
                return Err(EngineError::InvalidState(format!(
                    "{}: played {} != {}W {}D {}L",
                    row.team, row.played, row.wins, row.draws, row.losses
                )));
            }
            if row.played != seen {
                return Err(EngineError::InvalidState(format!(
                    "{}: played {} but {} recorded matches",
                    row.team, row.played, seen
                )));
            }
        }
        Ok(())
    }
}

fn compare_rows(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(b.goal_difference().cmp(&a.goal_difference()))
        .then(b.goals.cmp(&a.goals))
        .then(a.team.cmp(&b.team))
}

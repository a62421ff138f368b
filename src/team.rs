use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::standings::MatchSide;

pub const ATTRIBUTE_MIN: f64 = 70.0;
pub const ATTRIBUTE_MAX: f64 = 100.0;

const CONDITION_FLOOR: f64 = 0.0;
const CONDITION_CAP: f64 = 100.0;
const STAMINA_COST: f64 = 5.0;
const MORALE_SWING: f64 = 5.0;

/// Stable index of a team inside its league's team table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub attack_power: f64,
    pub defense_power: f64,
    pub stamina: f64,
    pub morale: f64,
}

impl Team {
    pub fn new(name: impl Into<String>, attack: f64, defense: f64, stamina: f64, morale: f64) -> Self {
        Self {
            name: name.into(),
            attack_power: attack,
            defense_power: defense,
            stamina,
            morale,
        }
    }

    /// Post-match condition changes. Attack and defense are never touched.
    pub fn apply_match_effects(&mut self, side: MatchSide) {
        self.stamina = (self.stamina - STAMINA_COST).max(CONDITION_FLOOR);
        match side {
            MatchSide::Winner => {
                self.morale = (self.morale + MORALE_SWING).min(CONDITION_CAP);
            }
            MatchSide::Loser => {
                self.morale = (self.morale - MORALE_SWING).max(CONDITION_FLOOR);
            }
            MatchSide::Draw => {}
        }
    }

    /// Inverse of [`Team::apply_match_effects`]. Lossy when the forward step was clamped.
    pub fn revert_match_effects(&mut self, side: MatchSide) {
        self.stamina = (self.stamina + STAMINA_COST).min(CONDITION_CAP);
        match side {
            MatchSide::Winner => {
                self.morale = (self.morale - MORALE_SWING).max(CONDITION_FLOOR);
            }
            MatchSide::Loser => {
                self.morale = (self.morale + MORALE_SWING).min(CONDITION_CAP);
            }
            MatchSide::Draw => {}
        }
    }
}

pub fn parse_team_count(raw: &str) -> EngineResult<usize> {
    let trimmed = raw.trim();
    let n = trimmed
        .parse::<i64>()
        .map_err(|_| EngineError::InvalidArgument(format!("team count is not a number: {trimmed:?}")))?;
    checked_team_count(n)
}

fn checked_team_count(n: i64) -> EngineResult<usize> {
    if n < 0 {
        return Err(EngineError::InvalidArgument(format!(
            "team count must not be negative (got {n})"
        )));
    }
    usize::try_from(n)
        .map_err(|_| EngineError::InvalidArgument(format!("team count out of range: {n}")))
}

/// Builds `count` teams named "Team A", "Team B", ... with attributes drawn from [70, 100).
pub fn generate_roster<R: Rng + ?Sized>(count: i64, rng: &mut R) -> EngineResult<Vec<Team>> {
    let count = checked_team_count(count)?;
    let teams = (0..count)
        .map(|idx| Team {
            name: format!("Team {}", roster_label(idx)),
            attack_power: random_attribute(rng, ATTRIBUTE_MIN, ATTRIBUTE_MAX),
            defense_power: random_attribute(rng, ATTRIBUTE_MIN, ATTRIBUTE_MAX),
            stamina: random_attribute(rng, ATTRIBUTE_MIN, ATTRIBUTE_MAX),
            morale: random_attribute(rng, ATTRIBUTE_MIN, ATTRIBUTE_MAX),
        })
        .collect::<Vec<_>>();
    log::debug!("generated roster of {} teams", teams.len());
    Ok(teams)
}

fn random_attribute<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..max)
}

// 0 -> A, 25 -> Z, 26 -> AA, 27 -> AB, ...
fn roster_label(mut idx: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::{Team, parse_team_count, roster_label};
    use crate::error::EngineError;
    use crate::standings::MatchSide;

    #[test]
    fn roster_labels_continue_past_z() {
        assert_eq!(roster_label(0), "A");
        assert_eq!(roster_label(25), "Z");
        assert_eq!(roster_label(26), "AA");
        assert_eq!(roster_label(27), "AB");
        assert_eq!(roster_label(52), "BA");
    }

    #[test]
    fn team_count_rejects_garbage() {
        assert_eq!(parse_team_count(" 4 "), Ok(4));
        assert!(matches!(
            parse_team_count("-1"),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_team_count("four"),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn effects_clamp_at_bounds() {
        let mut team = Team::new("X", 80.0, 80.0, 3.0, 98.0);
        team.apply_match_effects(MatchSide::Winner);
        assert_eq!(team.stamina, 0.0);
        assert_eq!(team.morale, 100.0);

        let mut team = Team::new("Y", 80.0, 80.0, 50.0, 2.0);
        team.apply_match_effects(MatchSide::Loser);
        assert_eq!(team.stamina, 45.0);
        assert_eq!(team.morale, 0.0);
    }

    #[test]
    fn revert_undoes_unclamped_effects() {
        let before = Team::new("Z", 75.0, 90.0, 60.0, 60.0);
        for side in [MatchSide::Winner, MatchSide::Loser, MatchSide::Draw] {
            let mut team = before.clone();
            team.apply_match_effects(side);
            team.revert_match_effects(side);
            assert_eq!(team, before);
        }
    }
}

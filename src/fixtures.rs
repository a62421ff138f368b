use serde::{Deserialize, Serialize};

use crate::team::Team;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fixture {
    pub home: String,
    pub away: String,
}

impl Fixture {
    pub fn involves(&self, name: &str) -> bool {
        self.home == name || self.away == name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub number: u32,
    pub matches: Vec<Fixture>,
}

/// Round-robin schedule via the circle method.
///
/// Slot 0 stays fixed while every other slot rotates one step per round. An odd
/// field is padded with a bye slot; pairings against it are dropped but the week
/// itself is still emitted.
pub fn generate_fixtures(teams: &[Team]) -> Vec<Week> {
    // `None` is the bye.
    let mut slots: Vec<Option<usize>> = (0..teams.len()).map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }

    let n = slots.len();
    let half = n / 2;
    let rounds = n.saturating_sub(1);
    let mut weeks = Vec::with_capacity(rounds);

    for round in 0..rounds {
        let mut matches = Vec::with_capacity(half);
        for i in 0..half {
            if let (Some(home), Some(away)) = (slots[i], slots[n - 1 - i]) {
                matches.push(Fixture {
                    home: teams[home].name.clone(),
                    away: teams[away].name.clone(),
                });
            }
        }
        weeks.push(Week {
            number: round as u32 + 1,
            matches,
        });

        slots[1..].rotate_right(1);
    }

    log::debug!(
        "scheduled {} weeks for {} teams",
        weeks.len(),
        teams.len()
    );
    weeks
}

use crate::team::Team;

const W_ATTACK: f64 = 0.3;
const W_DEFENSE: f64 = 0.3;
const W_MORALE: f64 = 0.2;
const W_STAMINA: f64 = 0.2;

pub fn team_strength(team: &Team) -> f64 {
    team.attack_power * W_ATTACK
        + team.defense_power * W_DEFENSE
        + team.morale * W_MORALE
        + team.stamina * W_STAMINA
}

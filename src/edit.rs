use crate::error::EngineResult;
use crate::fixtures::Fixture;
use crate::league::League;
use crate::simulation::MatchOutcome;
use crate::standings::{Ledger, MatchKey, StandingsRow, goal_count};

/// Rescores a played match: takes its old contribution out of the standings and
/// applies the new score.
///
/// Works on copies of the team and standings tables; `league` is only touched once
/// both steps succeed. Scores must fit the standings' goal totals. Returns the
/// updated standings.
pub fn edit_match(
    league: &mut League,
    key: &MatchKey,
    home_score: u32,
    away_score: u32,
) -> EngineResult<Vec<StandingsRow>> {
    goal_count(home_score)?;
    goal_count(away_score)?;
    let idx = league.find_match(key)?;
    let original = league.matches[idx].clone();
    let home = league.team_id(&original.home)?;
    let away = league.team_id(&original.away)?;
    let outcome = MatchOutcome::from_score(home, away, home_score, away_score);

    let mut teams = league.teams.clone();
    let mut rows = league.standings.clone();
    let mut ledger = Ledger::new(&mut teams, &mut rows);
    ledger.rescore(home, away, &original, &outcome)?;
    ledger.refresh_diffs();

    let fixture = Fixture {
        home: original.home.clone(),
        away: original.away.clone(),
    };
    let corrected = outcome.to_record(&league.id, original.week, &fixture, home);

    log::info!(
        "league {}: {} corrected {}-{} -> {}-{}",
        league.id,
        key,
        original.home_score,
        original.away_score,
        corrected.home_score,
        corrected.away_score
    );

    league.teams = teams;
    league.standings = rows;
    league.matches[idx] = corrected;
    Ok(league.standings.clone())
}

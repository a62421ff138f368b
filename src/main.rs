use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use env_logger::Env;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rusqlite::Connection;

use league_sim::config::AppConfig;
use league_sim::edit::edit_match;
use league_sim::league::League;
use league_sim::predict::{PredictWeights, predict_championship};
use league_sim::simulation::{MatchSimulator, simulate_weeks};
use league_sim::standings::{MatchKey, MatchRecord};
use league_sim::store;
use league_sim::team::parse_team_count;

const USAGE: &str = "usage: league_sim [--db PATH] <command> [options]

commands:
  create   --name NAME --teams N
  list
  show     --league ID
  results  --league ID [--week W]
  simulate --league ID [--all]
  edit     --league ID --week W --home TEAM --away TEAM --score H-A
  predict  --league ID
  reset    --league ID
  delete   --league ID";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let Some(command) = parse_command(&args) else {
        println!("{USAGE}");
        return Ok(());
    };

    let cfg = AppConfig::from_env();
    let db_path = flag_value(&args, "db")
        .map(PathBuf::from)
        .or_else(|| cfg.db_path.clone())
        .context("unable to resolve sqlite path")?;
    let mut conn = store::open_db(&db_path)?;

    let rng = match cfg.engine.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut sim = MatchSimulator::new(rng, &cfg.engine);

    match command {
        "create" => {
            let name = flag_value(&args, "name").unwrap_or_else(|| "League".to_string());
            let raw_count = flag_value(&args, "teams").context("--teams is required")?;
            let count = parse_team_count(&raw_count)?;
            let league = League::create(&name, count as i64, sim.rng_mut())?;
            store::save_league(&mut conn, &league)?;
            println!("{} {}", league.id, league.name);
        }
        "list" => {
            for item in store::list_leagues(&conn)? {
                println!(
                    "{}  {:<20} week {}/{}  updated {}",
                    item.league_id, item.name, item.current_week, item.total_weeks, item.updated_at
                );
            }
        }
        "show" => {
            let league = load(&conn, &args)?;
            print_table(&league);
            print_fixtures(&league);
        }
        "results" => {
            let id = flag_value(&args, "league").context("--league is required")?;
            store::load_league(&conn, &id)?;
            let week = flag_value(&args, "week")
                .map(|raw| raw.trim().parse::<u32>())
                .transpose()
                .context("--week must be a week number")?;
            let played = store::load_matches(&conn, &id, true)?;
            let shown = results_in_week(&played, week);
            if shown.is_empty() {
                println!("No results yet.");
            }
            print_results(shown);
        }
        "simulate" => {
            let mut league = load(&conn, &args)?;
            let play_all = args.iter().any(|a| a == "--all");
            let result = simulate_weeks(&mut league, play_all, &mut sim)?;
            league.verify_ledger()?;
            store::save_league(&mut conn, &league)?;
            if result.played_matches.is_empty() {
                println!("No matches played.");
            }
            print_results(&result.played_matches);
            println!(
                "Weeks played: {}  remaining: {}",
                result.played_weeks.len(),
                result.remaining_weeks.len()
            );
        }
        "edit" => {
            let mut league = load(&conn, &args)?;
            let week = flag_value(&args, "week")
                .and_then(|w| w.trim().parse::<u32>().ok())
                .context("--week must be a week number")?;
            let home = flag_value(&args, "home").context("--home is required")?;
            let away = flag_value(&args, "away").context("--away is required")?;
            let (home_score, away_score) = flag_value(&args, "score")
                .as_deref()
                .and_then(parse_score_pair)
                .context("--score must look like 2-1")?;
            let key = MatchKey { week, home, away };
            edit_match(&mut league, &key, home_score, away_score)?;
            league.verify_ledger()?;
            store::save_league(&mut conn, &league)?;
            print_table(&league);
        }
        "predict" => {
            let league = load(&conn, &args)?;
            let weights = PredictWeights::from(&cfg.engine);
            let mut rows = predict_championship(&league.standings_snapshot(), weights);
            rows.sort_by(|a, b| b.odds.total_cmp(&a.odds));
            for row in rows {
                println!(
                    "{:<12} {:>3} pts  strength {:>6.2}  odds {:>6.2}%{}",
                    row.team_name,
                    row.points,
                    row.strength,
                    row.odds,
                    if row.eliminated { "  (out)" } else { "" }
                );
            }
        }
        "reset" => {
            let mut league = load(&conn, &args)?;
            league.reset(sim.rng_mut())?;
            store::save_league(&mut conn, &league)?;
            println!("League {} reset", league.id);
        }
        "delete" => {
            let id = flag_value(&args, "league").context("--league is required")?;
            if !store::delete_league(&mut conn, &id)? {
                return Err(anyhow!("league not found: {id}"));
            }
            println!("League {id} deleted");
        }
        other => {
            return Err(anyhow!("unknown command {other:?}\n\n{USAGE}"));
        }
    }

    Ok(())
}

fn load(conn: &Connection, args: &[String]) -> Result<League> {
    let id = flag_value(args, "league").context("--league is required")?;
    store::load_league(conn, &id)
}

fn print_table(league: &League) {
    println!("{} (week {}/{})", league.name, league.current_week, league.total_weeks);
    println!(
        "{:<12} {:>2} {:>2} {:>2} {:>2} {:>3} {:>3} {:>4} {:>4}",
        "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
    );
    for row in league.table() {
        println!(
            "{:<12} {:>2} {:>2} {:>2} {:>2} {:>3} {:>3} {:>4} {:>4}",
            row.team,
            row.played,
            row.wins,
            row.draws,
            row.losses,
            row.goals,
            row.against,
            row.diff,
            row.points
        );
    }
}

fn results_in_week(matches: &[MatchRecord], week: Option<u32>) -> Vec<&MatchRecord> {
    matches
        .iter()
        .filter(|m| week.is_none_or(|w| m.week == w))
        .collect()
}

fn print_results<'a>(matches: impl IntoIterator<Item = &'a MatchRecord>) {
    for m in matches {
        println!(
            "week {:>2}  {} {}-{} {}",
            m.week, m.home, m.home_score, m.away_score, m.away
        );
    }
}

fn print_fixtures(league: &League) {
    for week in &league.upcoming {
        println!("week {:>2}:", week.number);
        for m in &week.matches {
            println!("  {} vs {}", m.home, m.away);
        }
    }
}

// First argument that is neither a flag nor a flag's value.
fn parse_command(args: &[String]) -> Option<&str> {
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(flag) = arg.strip_prefix("--") {
            skip_next = !flag.contains('=') && flag != "all";
            continue;
        }
        return Some(arg.as_str());
    }
    None
}

fn flag_value(args: &[String], name: &str) -> Option<String> {
    let long = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == long
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

// Exactly "H-A" or "H:A" with non-negative goal counts.
fn parse_score_pair(raw: &str) -> Option<(u32, u32)> {
    let (home, away) = raw.trim().split_once(['-', ':'])?;
    Some((parse_goals(home)?, parse_goals(away)?))
}

fn parse_goals(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    let goals = raw.parse::<i32>().ok()?;
    u32::try_from(goals).ok()
}

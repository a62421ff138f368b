use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::league::League;
use crate::standings::MatchRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueSummary {
    pub league_id: String,
    pub name: String,
    pub total_weeks: u32,
    pub current_week: u32,
    pub updated_at: String,
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS leagues (
            league_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            state_json TEXT NOT NULL,
            total_weeks INTEGER NOT NULL,
            current_week INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS matches (
            league_id TEXT NOT NULL,
            week INTEGER NOT NULL,
            home TEXT NOT NULL,
            away TEXT NOT NULL,
            home_goals INTEGER NOT NULL,
            away_goals INTEGER NOT NULL,
            winner TEXT NOT NULL,
            is_played INTEGER NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (league_id, week, home, away)
        );
        CREATE INDEX IF NOT EXISTS idx_matches_league_week ON matches(league_id, week);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Writes the full league state and every fixture's match row in one transaction.
pub fn save_league(conn: &mut Connection, league: &League) -> Result<()> {
    let state_json = serde_json::to_string(league).context("serialize league state")?;
    let now = Utc::now().to_rfc3339();

    let tx = conn.transaction().context("begin save transaction")?;
    tx.execute(
        r#"
        INSERT INTO leagues (league_id, name, state_json, total_weeks, current_week, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        ON CONFLICT(league_id) DO UPDATE SET
            name = excluded.name,
            state_json = excluded.state_json,
            total_weeks = excluded.total_weeks,
            current_week = excluded.current_week,
            updated_at = excluded.updated_at
        "#,
        params![
            league.id,
            league.name,
            state_json,
            league.total_weeks as i64,
            league.current_week as i64,
            now
        ],
    )
    .context("upsert league")?;

    // Rows are rebuilt from scratch so a reset league drops its old fixtures.
    tx.execute("DELETE FROM matches WHERE league_id = ?1", params![league.id])
        .context("clear league matches")?;
    for row in match_rows(league) {
        upsert_match(&tx, &row, &now)?;
    }
    tx.commit().context("commit save transaction")?;
    Ok(())
}

pub fn load_league(conn: &Connection, league_id: &str) -> Result<League> {
    let raw = conn
        .query_row(
            "SELECT state_json FROM leagues WHERE league_id = ?1",
            params![league_id],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .context("query league state")?
        .ok_or_else(|| anyhow!("league not found: {league_id}"))?;
    let league: League = serde_json::from_str(&raw).context("invalid league state json")?;
    league
        .verify_ledger()
        .with_context(|| format!("stored league {league_id} is inconsistent"))?;
    Ok(league)
}

pub fn list_leagues(conn: &Connection) -> Result<Vec<LeagueSummary>> {
    let mut stmt = conn
        .prepare(
            "SELECT league_id, name, total_weeks, current_week, updated_at
             FROM leagues ORDER BY created_at ASC, league_id ASC",
        )
        .context("prepare list leagues query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(LeagueSummary {
                league_id: row.get(0)?,
                name: row.get(1)?,
                total_weeks: row.get::<_, u32>(2)?,
                current_week: row.get::<_, u32>(3)?,
                updated_at: row.get(4)?,
            })
        })
        .context("query leagues")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode league row")?);
    }
    Ok(out)
}

pub fn delete_league(conn: &mut Connection, league_id: &str) -> Result<bool> {
    let tx = conn.transaction().context("begin delete transaction")?;
    tx.execute("DELETE FROM matches WHERE league_id = ?1", params![league_id])
        .context("delete league matches")?;
    let removed = tx
        .execute("DELETE FROM leagues WHERE league_id = ?1", params![league_id])
        .context("delete league")?;
    tx.commit().context("commit delete transaction")?;
    Ok(removed > 0)
}

pub fn load_matches(conn: &Connection, league_id: &str, played_only: bool) -> Result<Vec<MatchRecord>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT league_id, week, home, away, home_goals, away_goals, winner, is_played
            FROM matches
            WHERE league_id = ?1
              AND (?2 = 0 OR is_played = 1)
            ORDER BY week ASC, home ASC
            "#,
        )
        .context("prepare load matches query")?;

    let rows = stmt
        .query_map(params![league_id, bool_to_i64(played_only)], |row| {
            Ok(MatchRecord {
                league_id: row.get(0)?,
                week: row.get::<_, u32>(1)?,
                home: row.get(2)?,
                away: row.get(3)?,
                home_score: row.get::<_, u32>(4)?,
                away_score: row.get::<_, u32>(5)?,
                winner: row.get(6)?,
                is_played: row.get::<_, i64>(7)? != 0,
            })
        })
        .context("query load matches")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode match row")?);
    }
    Ok(out)
}

// Played records plus placeholder rows for every fixture still to come.
fn match_rows(league: &League) -> Vec<MatchRecord> {
    let mut rows = league.matches.clone();
    for week in &league.upcoming {
        for fixture in &week.matches {
            rows.push(MatchRecord {
                league_id: league.id.clone(),
                week: week.number,
                home: fixture.home.clone(),
                away: fixture.away.clone(),
                home_score: 0,
                away_score: 0,
                winner: String::new(),
                is_played: false,
            });
        }
    }
    rows
}

fn upsert_match(tx: &rusqlite::Transaction<'_>, m: &MatchRecord, now: &str) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO matches (
            league_id, week, home, away, home_goals, away_goals, winner, is_played, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(league_id, week, home, away) DO UPDATE SET
            home_goals = excluded.home_goals,
            away_goals = excluded.away_goals,
            winner = excluded.winner,
            is_played = excluded.is_played,
            updated_at = excluded.updated_at
        "#,
        params![
            m.league_id,
            m.week as i64,
            m.home,
            m.away,
            m.home_score as i64,
            m.away_score as i64,
            m.winner,
            bool_to_i64(m.is_played),
            now,
        ],
    )
    .context("upsert match")?;
    Ok(())
}

fn bool_to_i64(v: bool) -> i64 {
    if v { 1 } else { 0 }
}

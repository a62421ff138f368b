use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const DATA_DIR: &str = "league_sim";
const DB_FILE: &str = "leagues.sqlite";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZeroStrengthPolicy {
    ForcedDraw,
    CoinFlip,
    Reject,
}

impl ZeroStrengthPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "forced_draw" | "draw" => Some(Self::ForcedDraw),
            "coin_flip" | "coin" | "50/50" => Some(Self::CoinFlip),
            "reject" | "error" => Some(Self::Reject),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    pub weight_points: f64,
    pub weight_strength: f64,
    pub home_advantage: f64,
    pub draw_chance: f64,
    pub zero_strength_policy: ZeroStrengthPolicy,
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weight_points: 0.4,
            weight_strength: 0.6,
            home_advantage: 1.05,
            draw_chance: 0.2,
            zero_strength_policy: ZeroStrengthPolicy::ForcedDraw,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        let cfg = Self {
            weight_points: f64_env_or_default("LEAGUE_SIM_WEIGHT_POINTS", d.weight_points),
            weight_strength: f64_env_or_default("LEAGUE_SIM_WEIGHT_STRENGTH", d.weight_strength),
            home_advantage: f64_env_or_default("LEAGUE_SIM_HOME_ADVANTAGE", d.home_advantage),
            draw_chance: f64_env_or_default("LEAGUE_SIM_DRAW_CHANCE", d.draw_chance)
                .clamp(0.0, 1.0),
            zero_strength_policy: env::var("LEAGUE_SIM_ZERO_STRENGTH")
                .ok()
                .and_then(|raw| ZeroStrengthPolicy::parse(&raw))
                .unwrap_or(d.zero_strength_policy),
            seed: env::var("LEAGUE_SIM_SEED")
                .ok()
                .and_then(|raw| raw.trim().parse::<u64>().ok()),
        };
        cfg.validated()
    }

    /// Prediction weights and home advantage must be non-negative; offending
    /// values fall back to their defaults.
    pub fn validated(mut self) -> Self {
        let d = Self::default();
        if self.weight_points < 0.0 || self.weight_strength < 0.0 {
            log::warn!(
                "negative prediction weights ({}, {}), using {} / {}",
                self.weight_points,
                self.weight_strength,
                d.weight_points,
                d.weight_strength
            );
            self.weight_points = d.weight_points;
            self.weight_strength = d.weight_strength;
        }
        if self.home_advantage < 0.0 {
            log::warn!(
                "negative home advantage {}, using {}",
                self.home_advantage,
                d.home_advantage
            );
            self.home_advantage = d.home_advantage;
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub db_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let db_path = env::var("LEAGUE_SIM_DB")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .or_else(default_db_path);
        Self {
            engine: EngineConfig::from_env(),
            db_path,
        }
    }
}

pub fn default_db_path() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(DATA_DIR).join(DB_FILE));
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(DATA_DIR).join(DB_FILE))
}

fn f64_env_or_default(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

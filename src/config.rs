use std::env;
use std::str::FromStr;

use log::warn;

use crate::blockchain::{
    DEFAULT_DIFFICULTY, MiningPolicy, PROGRESS_CADENCE, clamp_difficulty_input,
};

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    pub progress_cadence: u64,
    pub max_attempts: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            difficulty: DEFAULT_DIFFICULTY,
            progress_cadence: PROGRESS_CADENCE,
            max_attempts: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            difficulty: clamp_difficulty_input(parse_or(
                &lookup,
                "DIFFICULTY",
                i64::from(defaults.difficulty),
            )),
            progress_cadence: parse_or(&lookup, "PROGRESS_CADENCE", defaults.progress_cadence)
                .max(1),
            max_attempts: lookup("MINING_MAX_ATTEMPTS")
                .and_then(|raw| parse(&raw, "MINING_MAX_ATTEMPTS")),
        }
    }

    pub fn mining_policy(&self) -> MiningPolicy {
        MiningPolicy {
            progress_every: self.progress_cadence,
            max_attempts: self.max_attempts,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|raw| parse(&raw, key))
        .unwrap_or(default)
}

fn parse<T: FromStr>(raw: &str, key: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring invalid {key}={raw:?}");
            None
        }
    }
}

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

pub const DEFAULT_POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Typed configuration, read from the environment (plus an optional `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    // Chat platform
    pub telegram_bot_token: String,
    /// Empty means everyone may use the bot.
    pub telegram_allowed_users: Vec<i64>,
    pub telegram_safe_limit: usize,

    // Persistence
    pub database_path: PathBuf,

    // Move lookup
    pub pokeapi_base_url: String,
    pub lookup_timeout: Duration,

    // Rate limiting
    pub rate_limit_enabled: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_window: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = get("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let telegram_allowed_users = parse_csv_i64(get("TELEGRAM_ALLOWED_USERS"));
        let telegram_safe_limit = parse_num(&get, "TELEGRAM_SAFE_LIMIT")?.unwrap_or(4000);

        let database_path = get("MOVEBOT_DB_PATH")
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("movebot.db"));

        let pokeapi_base_url = get("POKEAPI_BASE_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_POKEAPI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let lookup_timeout =
            Duration::from_millis(parse_num(&get, "LOOKUP_TIMEOUT_MS")?.unwrap_or(10_000));

        let rate_limit_enabled = get("RATE_LIMIT_ENABLED").map_or(true, |s| parse_bool(&s));
        let rate_limit_requests = parse_num(&get, "RATE_LIMIT_REQUESTS")?.unwrap_or(20);
        let rate_limit_window =
            Duration::from_secs(parse_num(&get, "RATE_LIMIT_WINDOW")?.unwrap_or(60));

        Ok(Self {
            telegram_bot_token,
            telegram_allowed_users,
            telegram_safe_limit,
            database_path,
            pokeapi_base_url,
            lookup_timeout,
            rate_limit_enabled,
            rate_limit_requests,
            rate_limit_window,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_num<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = get(key).and_then(non_empty) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| Error::Config(format!("{key} must be a non-negative integer, got '{raw}'")))
}

fn parse_csv_i64(v: Option<String>) -> Vec<i64> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

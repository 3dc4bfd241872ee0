use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

use crate::scoring::{validate_config, PartialScoringConfig, Preset, ScoringConfig};

const DEFAULT_LIMIT: usize = 10;

/// Runtime settings, read from the environment
///
/// | variable                          | default                        |
/// |-----------------------------------|--------------------------------|
/// | `FREQUENT_SITES_DB`               | `~/.frequent-sites/sites.db`   |
/// | `FREQUENT_SITES_PRESET`           | unset (stored preference)      |
/// | `FREQUENT_SITES_LIMIT`            | 10                             |
/// | `FREQUENT_SITES_W_BASE` etc.      | unset (preset value)           |
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub preset: Option<Preset>,
    pub limit: usize,
    pub overrides: PartialScoringConfig,
}

impl Settings {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; `load` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("FREQUENT_SITES_DB")
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let preset = lookup("FREQUENT_SITES_PRESET").and_then(|name| {
            name.parse::<Preset>()
                .map_err(|e| warn!("Ignoring FREQUENT_SITES_PRESET: {e}"))
                .ok()
        });

        let limit = try_load(&lookup, "FREQUENT_SITES_LIMIT").unwrap_or(DEFAULT_LIMIT);

        let overrides = PartialScoringConfig {
            w_base: try_load(&lookup, "FREQUENT_SITES_W_BASE"),
            w_1d: try_load(&lookup, "FREQUENT_SITES_W_1D"),
            w_7d: try_load(&lookup, "FREQUENT_SITES_W_7D"),
            w_decay: try_load(&lookup, "FREQUENT_SITES_W_DECAY"),
            pin: try_load(&lookup, "FREQUENT_SITES_PIN"),
            half_life_days: try_load(&lookup, "FREQUENT_SITES_HALF_LIFE_DAYS"),
        };

        Self {
            db_path,
            preset,
            limit,
            overrides,
        }
    }

    /// Scoring config for `preset`, with any weight overrides applied
    pub fn scoring_config(&self, preset: Preset) -> ScoringConfig {
        validate_config(&self.overrides.or(preset.config().into()))
    }
}

fn default_db_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".frequent-sites").join("sites.db"),
        None => {
            warn!("Home directory not found, using ./sites.db");
            PathBuf::from("sites.db")
        }
    }
}

fn try_load<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key)?;
    raw.trim()
        .parse()
        .map_err(|e| warn!("Invalid {key} value {raw:?}: {e}"))
        .ok()
        .inspect(|_| info!("{key} set from environment"))
}

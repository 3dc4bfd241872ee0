/// Scoring configuration and presets
///
/// Presets are data. Every weight value the engine uses comes from
/// `Preset::config`, either directly or as the fallback inside
/// `validate_config`.

use crate::error::SiteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weights for the five score terms plus the decay half-life
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(rename = "wBase")]
    pub w_base: f64,
    #[serde(rename = "w1d")]
    pub w_1d: f64,
    #[serde(rename = "w7d")]
    pub w_7d: f64,
    #[serde(rename = "wDecay")]
    pub w_decay: f64,
    pub pin: f64,
    #[serde(rename = "halfLifeDays")]
    pub half_life_days: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

/// Partial override of a `ScoringConfig`
///
/// Missing fields fall back to the default preset in `validate_config`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialScoringConfig {
    #[serde(rename = "wBase", default)]
    pub w_base: Option<f64>,
    #[serde(rename = "w1d", default)]
    pub w_1d: Option<f64>,
    #[serde(rename = "w7d", default)]
    pub w_7d: Option<f64>,
    #[serde(rename = "wDecay", default)]
    pub w_decay: Option<f64>,
    #[serde(default)]
    pub pin: Option<f64>,
    #[serde(rename = "halfLifeDays", default)]
    pub half_life_days: Option<f64>,
}

impl From<ScoringConfig> for PartialScoringConfig {
    fn from(config: ScoringConfig) -> Self {
        Self {
            w_base: Some(config.w_base),
            w_1d: Some(config.w_1d),
            w_7d: Some(config.w_7d),
            w_decay: Some(config.w_decay),
            pin: Some(config.pin),
            half_life_days: Some(config.half_life_days),
        }
    }
}

impl PartialScoringConfig {
    /// Fill any field left unset here from `base`
    pub fn or(self, base: PartialScoringConfig) -> Self {
        Self {
            w_base: self.w_base.or(base.w_base),
            w_1d: self.w_1d.or(base.w_1d),
            w_7d: self.w_7d.or(base.w_7d),
            w_decay: self.w_decay.or(base.w_decay),
            pin: self.pin.or(base.pin),
            half_life_days: self.half_life_days.or(base.half_life_days),
        }
    }
}

/// Named ranking personalities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    #[default]
    Balanced,
    Recency,
    Frequency,
    PinPriority,
}

impl Preset {
    /// All presets, in display order
    pub const ALL: [Preset; 4] = [
        Preset::Balanced,
        Preset::Recency,
        Preset::Frequency,
        Preset::PinPriority,
    ];

    /// The weight table
    pub fn config(self) -> ScoringConfig {
        match self {
            Preset::Balanced => ScoringConfig {
                w_base: 1.0,
                w_1d: 3.0,
                w_7d: 1.0,
                w_decay: 2.0,
                pin: 150.0,
                half_life_days: 30.0,
            },
            Preset::Recency => ScoringConfig {
                w_base: 0.5,
                w_1d: 6.0,
                w_7d: 2.0,
                w_decay: 4.0,
                pin: 150.0,
                half_life_days: 7.0,
            },
            Preset::Frequency => ScoringConfig {
                w_base: 2.0,
                w_1d: 1.0,
                w_7d: 0.5,
                w_decay: 1.0,
                pin: 150.0,
                half_life_days: 90.0,
            },
            Preset::PinPriority => ScoringConfig {
                w_base: 1.0,
                w_1d: 3.0,
                w_7d: 1.0,
                w_decay: 2.0,
                pin: 1000.0,
                half_life_days: 30.0,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Balanced => "balanced",
            Preset::Recency => "recency",
            Preset::Frequency => "frequency",
            Preset::PinPriority => "pinPriority",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Balanced => "Even mix of total visits, recent visits and staleness",
            Preset::Recency => "What you opened today and this week comes first",
            Preset::Frequency => "Long-term favourites win, recent spikes matter less",
            Preset::PinPriority => "Pinned sites always stay on top",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Preset {
    type Err = SiteError;

    /// Accepts the canonical names plus snake/kebab spellings of `pinPriority`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "balanced" => Ok(Preset::Balanced),
            "recency" => Ok(Preset::Recency),
            "frequency" => Ok(Preset::Frequency),
            "pinpriority" | "pin_priority" | "pin-priority" => Ok(Preset::PinPriority),
            _ => Err(SiteError::UnknownPreset(s.to_string())),
        }
    }
}

/// Look up a preset's config by name
pub fn preset_config(name: &str) -> Result<ScoringConfig, SiteError> {
    name.parse::<Preset>().map(Preset::config)
}

/// Build a complete, safe config from a partial override
///
/// Never fails. Weights are clamped to `>= 0`, `halfLifeDays` to `>= 1`,
/// and missing or non-finite values take the default preset's value.
pub fn validate_config(partial: &PartialScoringConfig) -> ScoringConfig {
    let defaults = ScoringConfig::default();

    ScoringConfig {
        w_base: weight(partial.w_base, defaults.w_base),
        w_1d: weight(partial.w_1d, defaults.w_1d),
        w_7d: weight(partial.w_7d, defaults.w_7d),
        w_decay: weight(partial.w_decay, defaults.w_decay),
        pin: weight(partial.pin, defaults.pin),
        half_life_days: finite_or(partial.half_life_days, defaults.half_life_days).max(1.0),
    }
}

fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

fn weight(value: Option<f64>, fallback: f64) -> f64 {
    finite_or(value, fallback).max(0.0)
}

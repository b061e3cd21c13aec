//! Runtime settings, read from the environment.

use tracing::debug;

use crate::error::ConfigError;

pub const SEED_VAR: &str = "FANTASMAS_SEED";
pub const MUTE_VAR: &str = "FANTASMAS_MUTE";
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Seed for the game's random source. `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// Start with audio muted.
    pub muted: bool,
    /// `EnvFilter` directives for the tracing subscriber.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            muted: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds settings from an arbitrary variable lookup. Unset and empty variables take
    /// their defaults; malformed ones are errors rather than silently ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|value| value.trim().to_string()).filter(|value| !value.is_empty());

        let seed = get(SEED_VAR)
            .map(|value| {
                value
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed { var: SEED_VAR, value })
            })
            .transpose()?;

        let muted = get(MUTE_VAR)
            .map(|value| parse_flag(MUTE_VAR, value))
            .transpose()?
            .unwrap_or(false);

        let log_filter = get(LOG_FILTER_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let settings = Settings { seed, muted, log_filter };
        debug!(?settings, "Loaded settings");
        Ok(settings)
    }
}

fn parse_flag(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { var, value }),
    }
}

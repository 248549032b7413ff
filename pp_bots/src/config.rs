//! Simulation configuration management.
//!
//! Command-line flags win over environment variables, which win over
//! defaults.

use parlor_poker::{
    constants::MAX_PLAYERS,
    entities::Usd,
    table::{Stakes, TableConfig},
};
use std::{fmt::Display, str::FromStr};

/// Values given on the command line, if any.
#[derive(Debug, Default)]
pub struct Overrides {
    pub hands: Option<u64>,
    pub players: Option<usize>,
    pub stakes: Option<String>,
    pub seed: Option<u64>,
    pub bankroll: Option<Usd>,
}

/// Complete simulation configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Hands to play before stopping
    pub hands: u64,
    /// Bots seated from the default roster
    pub players: usize,
    /// Blind level and buy-in
    pub stakes: Stakes,
    /// Seed for shuffles and bot decisions; random when unset
    pub seed: Option<u64>,
    /// Wallet balance each bot starts with
    pub bankroll: Usd,
}

impl SimConfig {
    /// Load configuration from overrides and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but can't be parsed, or the
    /// stakes name is unknown.
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let hands = match overrides.hands {
            Some(hands) => hands,
            None => parse_env_or("PP_HANDS", 100)?,
        };
        let players = match overrides.players {
            Some(players) => players,
            None => parse_env_or("PP_PLAYERS", 6)?,
        };
        let stakes_name = match overrides.stakes {
            Some(name) => name,
            None => parse_env_or("PP_STAKES", "micro".to_string())?,
        };
        let stakes = Stakes::preset(&stakes_name).ok_or_else(|| ConfigError::Invalid {
            var: "PP_STAKES".to_string(),
            reason: format!("unknown stakes {stakes_name:?}"),
        })?;
        let seed = match overrides.seed {
            Some(seed) => Some(seed),
            None => std::env::var("PP_SEED")
                .ok()
                .map(|raw| parse_value("PP_SEED", &raw))
                .transpose()?,
        };
        let bankroll = match overrides.bankroll {
            Some(bankroll) => bankroll,
            None => parse_env_or("PP_BANKROLL", stakes.buy_in * 5)?,
        };

        Ok(Self {
            hands,
            players,
            stakes,
            seed,
            bankroll,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Errors
    ///
    /// * `ConfigError::Invalid` - Names the offending setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hands == 0 {
            return Err(ConfigError::Invalid {
                var: "PP_HANDS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if !(2..=MAX_PLAYERS).contains(&self.players) {
            return Err(ConfigError::Invalid {
                var: "PP_PLAYERS".to_string(),
                reason: format!("Must be between 2 and {MAX_PLAYERS}"),
            });
        }

        if self.bankroll < self.stakes.buy_in {
            return Err(ConfigError::Invalid {
                var: "PP_BANKROLL".to_string(),
                reason: format!("Must cover the ${} buy-in", self.stakes.buy_in),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            name: format!("Sim {}", self.stakes.name),
            max_players: self.players,
            stakes: self.stakes.clone(),
            ..TableConfig::default()
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback. A variable
/// that is set but malformed is an error rather than silently ignored.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e| ConfigError::Invalid {
        var: key.to_string(),
        reason: format!("{raw:?}: {e}"),
    })
}

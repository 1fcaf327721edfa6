//! Configuration: per-game settings and an optional-value registry.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, instrument, warn};

use crate::game::DEFAULT_BOARD_SIZE;

/// Default turn timeout in milliseconds.
pub const DEFAULT_TURN_TIMEOUT_MS: u64 = 5000;

/// Settings for one game engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Edge length of the square board.
    #[serde(default = "default_board_size")]
    board_size: usize,

    /// Turn timeout in milliseconds; a player who fails to move within it
    /// forfeits the game.
    #[serde(default = "default_turn_timeout_ms")]
    turn_timeout_ms: u64,
}

fn default_board_size() -> usize {
    DEFAULT_BOARD_SIZE
}

fn default_turn_timeout_ms() -> u64 {
    DEFAULT_TURN_TIMEOUT_MS
}

impl GameConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Rejects a board size of zero.
    pub fn new(board_size: usize, turn_timeout_ms: u64) -> Result<Self, ConfigError> {
        Self {
            board_size,
            turn_timeout_ms,
        }
        .validate()
    }

    /// Parses a configuration from TOML; absent fields take defaults.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("failed to parse config: {}", e)))?;
        debug!(?config, "config parsed");
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::new("board_size must be at least 1".to_string()));
        }
        Ok(self)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: default_board_size(),
            turn_timeout_ms: default_turn_timeout_ms(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error was raised.
    pub line: u32,
    /// Source file where the error was raised.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error at the caller's location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Type-keyed registry for optional configuration values.
///
/// Lookups fail soft: a missing entry logs a warning and yields `None`
/// instead of failing the caller, which is the policy for optional
/// configuration. This is an explicit registry — collaborators are handed
/// the store and ask for what they need by type.
#[derive(Default)]
pub struct ConfigStore {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value`, replacing any previous entry of the same type.
    pub fn register<T: Any + Send + Sync>(&mut self, value: T) {
        debug!(config = type_name::<T>(), "config registered");
        self.entries.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Looks up a value by type; logs and returns `None` when absent.
    pub fn get<T: Any + Clone>(&self) -> Option<T> {
        let found = self
            .entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<T>());
        if found.is_none() {
            warn!(config = type_name::<T>(), "config not registered");
        }
        found.cloned()
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}

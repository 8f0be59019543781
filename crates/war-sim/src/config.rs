use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;
use war_core::{DEFAULT_MAX_ROUNDS, NormalizedHand, Seat, validate_hand};

const MAX_PLAYERS: usize = 2;

/// Root simulator configuration loaded from YAML. Every field has a default.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimConfig {
    #[serde(default)]
    pub players: Vec<PlayerConfig>,
    #[serde(default)]
    pub deal: DealMode,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    /// Unset means "ask" when prompting and quick otherwise.
    #[serde(default)]
    pub mode: Option<PlayMode>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            deal: DealMode::default(),
            seed: None,
            max_rounds: default_max_rounds(),
            mode: None,
            output: OutputConfig::default(),
            pacing: PacingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: SimConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ConfigValidationError> {
        if self.max_rounds == 0 {
            return Err(ConfigValidationError::InvalidField {
                field: "max_rounds".to_string(),
                message: "max_rounds must be greater than zero".to_string(),
            });
        }

        if self.players.len() > MAX_PLAYERS {
            return Err(ConfigValidationError::InvalidField {
                field: "players".to_string(),
                message: format!(
                    "War is played by exactly two players but {} were configured",
                    self.players.len()
                ),
            });
        }

        let hands = self.hands()?;
        if self.deal == DealMode::Random && hands.iter().any(Option::is_some) {
            return Err(ConfigValidationError::InvalidField {
                field: "deal".to_string(),
                message: "a random deal cannot be combined with explicit hands".to_string(),
            });
        }

        self.logging.normalize();
        self.logging.validate()?;
        Ok(())
    }

    pub fn player(&self, seat: Seat) -> Option<&PlayerConfig> {
        self.players.get(seat.index())
    }

    pub fn player_mut(&mut self, seat: Seat) -> &mut PlayerConfig {
        while self.players.len() <= seat.index() {
            self.players.push(PlayerConfig::default());
        }
        &mut self.players[seat.index()]
    }

    pub fn name(&self, seat: Seat) -> Option<&str> {
        self.player(seat)
            .and_then(|p| p.name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }

    /// Validated hands per seat; `None` where no hand was configured.
    pub fn hands(&self) -> Result<[Option<NormalizedHand>; 2], ConfigValidationError> {
        let mut hands = [None, None];
        for seat in Seat::BOTH {
            let Some(raw) = self.player(seat).and_then(|p| p.hand.as_deref()) else {
                continue;
            };
            let field = format!("players[{}].hand", seat.index());
            let hand = validate_hand(raw.trim())
                .map_err(|source| ConfigValidationError::Hand { field, source })?;
            hands[seat.index()] = Some(hand);
        }
        Ok(hands)
    }

    pub fn needs_hands(&self) -> bool {
        let missing = |seat: Seat| self.player(seat).and_then(|p| p.hand.as_ref()).is_none();
        self.deal == DealMode::Manual && Seat::BOTH.into_iter().any(missing)
    }

    /// Turns on structured logging to `path`.
    pub fn enable_log_file(&mut self, path: PathBuf) {
        self.logging.enable_structured = true;
        self.logging.path = path;
    }
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PlayerConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hand: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DealMode {
    #[default]
    Manual,
    Random,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    /// Instant simulation.
    #[default]
    Quick,
    /// Pauses between beats so the game can be watched.
    Game,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Game-mode delays in milliseconds.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PacingConfig {
    pub round_start_ms: u64,
    pub card_play_ms: u64,
    pub battle_result_ms: u64,
    pub war_declare_ms: u64,
    pub war_cards_ms: u64,
    pub game_end_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            round_start_ms: 1_000,
            card_play_ms: 500,
            battle_result_ms: 1_500,
            war_declare_ms: 2_000,
            war_cards_ms: 1_000,
            game_end_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Beat {
    RoundStart,
    CardPlay,
    BattleResult,
    WarDeclare,
    WarCards,
    GameEnd,
}

impl PacingConfig {
    pub fn delay(&self, beat: Beat) -> Duration {
        let ms = match beat {
            Beat::RoundStart => self.round_start_ms,
            Beat::CardPlay => self.card_play_ms,
            Beat::BattleResult => self.battle_result_ms,
            Beat::WarDeclare => self.war_declare_ms,
            Beat::WarCards => self.war_cards_ms,
            Beat::GameEnd => self.game_end_ms,
        };
        Duration::from_millis(ms)
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            path: default_log_path(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.level().is_none() {
            return Err(ConfigValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown level '{}'", self.tracing_level),
            });
        }

        if self.enable_structured && self.path.as_os_str().is_empty() {
            return Err(ConfigValidationError::InvalidField {
                field: "logging.path".to_string(),
                message: "path must not be empty when structured logging is enabled".to_string(),
            });
        }

        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_path() -> PathBuf {
    PathBuf::from("war-sim.log.jsonl")
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ConfigValidationError,
    },
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("{field}: {message}")]
    InvalidField {
        field: String,
        message: String,
    },
    #[error("{field}: {source}")]
    Hand {
        field: String,
        source: war_core::ValidationError,
    },
}

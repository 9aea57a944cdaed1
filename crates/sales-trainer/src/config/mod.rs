use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::training::game::{
    GameRules, MIN_RESPONSE_CHARS, OBJECTIONS_PER_LEVEL, PASSING_SCORE_PER_LEVEL,
};
use crate::training::progress::UnlockPolicy;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub training: TrainingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            training: TrainingConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Scoring thresholds and game pacing. Defaults reproduce the standard training program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingConfig {
    pub beginner_pass_score: u32,
    pub intermediate_pass_score: u32,
    pub advanced_pass_score: u32,
    pub min_response_chars: usize,
    pub passing_score_per_level: i64,
    pub objections_per_level: u32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let policy = UnlockPolicy::default();
        Self {
            beginner_pass_score: policy.beginner_pass,
            intermediate_pass_score: policy.intermediate_pass,
            advanced_pass_score: policy.advanced_pass,
            min_response_chars: MIN_RESPONSE_CHARS,
            passing_score_per_level: PASSING_SCORE_PER_LEVEL,
            objections_per_level: OBJECTIONS_PER_LEVEL,
        }
    }
}

impl TrainingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            beginner_pass_score: numeric_var(
                "TRAINER_BEGINNER_PASS_SCORE",
                defaults.beginner_pass_score,
            )?,
            intermediate_pass_score: numeric_var(
                "TRAINER_INTERMEDIATE_PASS_SCORE",
                defaults.intermediate_pass_score,
            )?,
            advanced_pass_score: numeric_var(
                "TRAINER_ADVANCED_PASS_SCORE",
                defaults.advanced_pass_score,
            )?,
            min_response_chars: numeric_var(
                "TRAINER_MIN_RESPONSE_CHARS",
                defaults.min_response_chars,
            )?,
            passing_score_per_level: numeric_var(
                "TRAINER_PASSING_SCORE_PER_LEVEL",
                defaults.passing_score_per_level,
            )?,
            objections_per_level: numeric_var(
                "TRAINER_OBJECTIONS_PER_LEVEL",
                defaults.objections_per_level,
            )?,
        })
    }

    pub fn unlock_policy(&self) -> UnlockPolicy {
        UnlockPolicy {
            beginner_pass: self.beginner_pass_score,
            intermediate_pass: self.intermediate_pass_score,
            advanced_pass: self.advanced_pass_score,
        }
    }

    pub fn game_rules(&self) -> GameRules {
        GameRules {
            objections_per_level: self.objections_per_level,
            passing_score: self.passing_score_per_level,
            min_response_chars: self.min_response_chars,
        }
    }
}

fn numeric_var<T: FromStr>(variable: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { variable, value: raw }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be a non-negative number, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

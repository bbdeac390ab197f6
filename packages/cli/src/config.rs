use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use plotpad_runner::RunnerConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid number in {0}: {1}")]
    InvalidNumber(&'static str, #[source] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("PLOTPAD_MAX_IMAGES must be at least 1")]
    ZeroMaxImages,
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub cors_origin: Option<String>,
    pub max_body_bytes: usize,
    pub runner: RunnerConfig,
}

/// Matches the original deployment's 16 MB request cap
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_var("PLOTPAD_PORT", 5001)?;
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        // Unset means permissive CORS, the mode the original tool ran in
        let cors_origin = env::var("PLOTPAD_CORS_ORIGIN").ok();

        let interpreter =
            PathBuf::from(env::var("PLOTPAD_PYTHON").unwrap_or_else(|_| "python3".to_string()));

        let timeout_secs: u64 = parse_var("PLOTPAD_TIMEOUT_SECS", 1000)?;

        let workspace_dir = env::var("PLOTPAD_WORKSPACE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("plotpad"));

        let max_images: usize = parse_var("PLOTPAD_MAX_IMAGES", 10)?;
        if max_images == 0 {
            return Err(ConfigError::ZeroMaxImages);
        }

        Ok(Config {
            port,
            cors_origin,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            runner: RunnerConfig {
                interpreter,
                timeout: Duration::from_secs(timeout_secs),
                workspace_dir,
                max_images,
            },
        })
    }
}

fn parse_var<T: std::str::FromStr<Err = ParseIntError>>(
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| ConfigError::InvalidNumber(name, e)),
        Err(_) => Ok(default),
    }
}

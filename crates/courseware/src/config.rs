/// Service configuration read from the environment
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Invalid value for {var}: `{value}`")]
    InvalidVar { var: &'static str, value: String },
}

/// Settings for the HTTP service and its backend client.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub listen_addr: SocketAddr,
    /// Base URL of the REST backend that owns courses and enrollments
    pub backend_url: String,
    /// Deployment-wide quiz passing score, used when a request carries none
    pub quiz_passing_score: Option<u8>,
    pub cache_ttl: Duration,
    pub gamification_dir: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8081)),
            backend_url: "http://localhost:5000/api".to_string(),
            quiz_passing_score: None,
            cache_ttl: Duration::from_secs(5 * 60),
            gamification_dir: None,
        }
    }
}

impl ServiceConfig {
    /// Reads `COURSEWARE_*` variables (and `PORT`), falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("COURSEWARE_ADDR") {
            config.listen_addr = addr.parse().map_err(|_| ConfigError::InvalidVar {
                var: "COURSEWARE_ADDR",
                value: addr.clone(),
            })?;
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port.parse().map_err(|_| ConfigError::InvalidVar {
                var: "PORT",
                value: port.clone(),
            })?;
            config.listen_addr.set_port(port);
        }

        if let Some(url) = lookup("COURSEWARE_BACKEND_URL") {
            url::Url::parse(&url).map_err(|_| ConfigError::InvalidVar {
                var: "COURSEWARE_BACKEND_URL",
                value: url.clone(),
            })?;
            config.backend_url = url.trim_end_matches('/').to_string();
        }

        if let Some(score) = lookup("COURSEWARE_QUIZ_PASSING_SCORE") {
            let parsed = score
                .parse::<u8>()
                .ok()
                .filter(|s| *s <= 100)
                .ok_or_else(|| ConfigError::InvalidVar {
                    var: "COURSEWARE_QUIZ_PASSING_SCORE",
                    value: score.clone(),
                })?;
            config.quiz_passing_score = Some(parsed);
        }

        if let Some(secs) = lookup("COURSEWARE_CACHE_TTL_SECS") {
            let secs: u64 = secs.parse().map_err(|_| ConfigError::InvalidVar {
                var: "COURSEWARE_CACHE_TTL_SECS",
                value: secs.clone(),
            })?;
            config.cache_ttl = Duration::from_secs(secs);
        }

        config.gamification_dir = lookup("COURSEWARE_GAMIFICATION_DIR").map(PathBuf::from);

        Ok(config)
    }
}

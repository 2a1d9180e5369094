//! Process configuration read from environment variables.
//!
//! | Variable        | Meaning                                          |
//! |-----------------|--------------------------------------------------|
//! | `OSRM_URL`      | Base URL of `osrm-routed`                        |
//! | `MOCK_NETWORK`  | Path to a mock network file, instead of OSRM     |
//! | `OSRM_PROFILE`  | Routing profile, default `driving`               |
//! | `SNAP_RADIUS`   | Snap radius in metres, or `unlimited`            |
//! | `LISTEN_ADDR`   | Address to serve on, default `127.0.0.1:3000`    |
//! | `STATIONS_FILE` | JSON array of `[lon, lat]` registered at startup |

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::domain::Coordinate;
use crate::engine::{Engine, MockEngine, OsrmClient, OsrmConfig};
use crate::error::RouterError;
use crate::router::{DEFAULT_SNAP_RADIUS_M, RouterConfig};

/// Default listen address.
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OSRM_URL and MOCK_NETWORK are mutually exclusive")]
    ConflictingEngines,

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("failed to read stations file {path}: {message}")]
    StationsFile { path: PathBuf, message: String },
}

/// Which engine to start.
#[derive(Debug, Clone)]
pub enum EngineSettings {
    Osrm(OsrmConfig),
    Mock(PathBuf),
}

impl EngineSettings {
    /// Construct the engine.
    pub fn build(&self) -> Result<Engine, RouterError> {
        match self {
            EngineSettings::Osrm(config) => OsrmClient::new(config.clone())
                .map(Engine::Osrm)
                .map_err(RouterError::EngineInit),
            EngineSettings::Mock(path) => MockEngine::load(path)
                .map(Engine::Mock)
                .map_err(RouterError::EngineInit),
        }
    }
}

/// Settings for the server binary.
#[derive(Debug, Clone)]
pub struct Settings {
    pub engine: EngineSettings,
    pub snap_radius: Option<f64>,
    pub listen_addr: SocketAddr,
    pub stations_file: Option<PathBuf>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let engine = match (var("OSRM_URL"), var("MOCK_NETWORK")) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingEngines),
            (None, Some(path)) => EngineSettings::Mock(PathBuf::from(path)),
            (url, None) => {
                let mut config = url.map(OsrmConfig::new).unwrap_or_default();
                if let Some(profile) = var("OSRM_PROFILE") {
                    config = config.with_profile(profile.trim());
                }
                EngineSettings::Osrm(config)
            }
        };

        let snap_radius = match var("SNAP_RADIUS") {
            None => Some(DEFAULT_SNAP_RADIUS_M),
            Some(value) => parse_radius(&value)?,
        };

        let listen_addr = var("LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: "LISTEN_ADDR",
                value: listen_addr.clone(),
            })?;

        Ok(Self {
            engine,
            snap_radius,
            listen_addr,
            stations_file: var("STATIONS_FILE").map(PathBuf::from),
        })
    }

    /// Router configuration implied by these settings.
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig::default().with_snap_radius(self.snap_radius)
    }
}

fn parse_radius(value: &str) -> Result<Option<f64>, ConfigError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("unlimited") {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(r) if r.is_finite() && r > 0.0 => Ok(Some(r)),
        _ => Err(ConfigError::InvalidValue {
            name: "SNAP_RADIUS",
            value: value.to_string(),
        }),
    }
}

/// Load a JSON array of `[lon, lat]` pairs.
pub fn load_stations(path: &Path) -> Result<Vec<Coordinate>, ConfigError> {
    let err = |message: String| ConfigError::StationsFile {
        path: path.to_path_buf(),
        message,
    };
    let json = std::fs::read_to_string(path).map_err(|e| err(e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| err(e.to_string()))
}

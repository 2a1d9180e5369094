//! OSRM HTTP client.
//!
//! Talks to an `osrm-routed` instance through its public HTTP API. Only the
//! `nearest` and `table` services are used.

use std::sync::Arc;

use reqwest::Url;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::Coordinate;

use super::RoutingEngine;
use super::error::EngineError;
use super::types::{NearestResponse, Snapped, TableRequest};

/// Default base URL of a local `osrm-routed`.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default routing profile.
const DEFAULT_PROFILE: &str = "driving";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the engine, without a trailing service path
    pub base_url: String,
    /// Routing profile segment of the URL (e.g. `driving`)
    pub profile: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OsrmConfig {
    /// Create a config pointing at the given engine URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the routing profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }
}

/// OSRM HTTP API client.
///
/// Uses a semaphore to limit concurrent requests to the engine.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    profile: String,
    semaphore: Arc<Semaphore>,
}

impl OsrmClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails if the base URL does not parse or the HTTP client cannot be
    /// built. No request is made here.
    pub fn new(config: OsrmConfig) -> Result<Self, EngineError> {
        Url::parse(&config.base_url)
            .map_err(|e| EngineError::init(format!("invalid base URL {}: {e}", config.base_url)))?;

        if config.profile.is_empty() || config.profile.contains('/') {
            return Err(EngineError::init(format!(
                "invalid profile {:?}",
                config.profile
            )));
        }
        if config.max_concurrent == 0 {
            return Err(EngineError::init("max_concurrent must be at least 1"));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::init(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// URL of a nearest request for one coordinate.
    fn nearest_url(&self, coordinate: Coordinate, radius: Option<f64>) -> String {
        let mut url = format!(
            "{}/nearest/v1/{}/{}?number=1",
            self.base_url, self.profile, coordinate
        );
        if let Some(radius) = radius {
            url.push_str(&format!("&radiuses={radius}"));
        }
        url
    }

    /// URL of a table request.
    ///
    /// Built by hand rather than through a query serializer: OSRM expects
    /// literal `;` separators, and hints are already URL-safe.
    fn table_url(&self, request: &TableRequest) -> String {
        let coords = join(request.waypoints.iter().map(|w| w.coordinate.to_string()));
        let sources = join(request.sources.iter().map(usize::to_string));
        let destinations = join(request.destinations.iter().map(usize::to_string));

        let mut url = format!(
            "{}/table/v1/{}/{}?sources={}&destinations={}",
            self.base_url, self.profile, coords, sources, destinations
        );

        if request.waypoints.iter().any(|w| w.hint.is_some()) {
            let hints = join(request.waypoints.iter().map(|w| {
                w.hint
                    .as_ref()
                    .map(|h| h.as_str().to_string())
                    .unwrap_or_default()
            }));
            url.push_str("&hints=");
            url.push_str(&hints);
        }

        url
    }

    /// GET a URL and parse the body as JSON.
    ///
    /// OSRM reports query errors as a JSON body with a 4xx status, so the
    /// body is returned whenever it parses, regardless of status.
    async fn get_json(&self, url: &str) -> Result<Value, EngineError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| EngineError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        debug!(url, "engine request");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) if status.is_success() => Err(EngineError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            }),
            Err(_) => Err(EngineError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            }),
        }
    }
}

impl RoutingEngine for OsrmClient {
    async fn snap_nearest(
        &self,
        coordinate: Coordinate,
        radius: Option<f64>,
    ) -> Result<Option<Snapped>, EngineError> {
        let value = self.get_json(&self.nearest_url(coordinate, radius)).await?;
        let response: NearestResponse =
            serde_json::from_value(value).map_err(|e| EngineError::Malformed(e.to_string()))?;
        response.into_snapped()
    }

    async fn table(&self, request: &TableRequest) -> Result<Value, EngineError> {
        request.validate()?;
        self.get_json(&self.table_url(request)).await
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(";")
}

//! Configuration for the engine and its network collaborators
//!
//! Every section has a working `Default`; a JSON file may override any
//! subset of fields and the CLI applies its flags on top.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::core::error::{Error, Result};
use crate::core::geo::Coordinate;

/// Tianguá, CE
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(-3.7333, -40.9919);

/// Zoom level used when inspecting a single point
pub const DEFAULT_ZOOM: u8 = 14;

/// Selection engine settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Map center before anything is selected
    pub initial_center: Coordinate,

    /// Zoom applied by the viewport controller on every recenter
    pub zoom: u8,

    /// Upper bound on how long a route request may stay outstanding
    pub resolve_timeout_ms: u64,

    /// Abort the transport of superseded route requests
    pub abort_superseded: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            resolve_timeout_ms: 10_000,
            abort_superseded: true,
        }
    }
}

impl EngineConfig {
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }
}

/// OSRM routing service location
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub base_url: String,
    /// OSRM profile segment, e.g. `driving`, `foot`, `bike`
    pub profile: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
        }
    }
}

/// Nominatim geocoding service location
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub routing: RoutingConfig,
    pub geocoder: GeocoderConfig,
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.engine.initial_center.is_valid() {
            return Err(Error::InvalidInput(format!(
                "initial center {} is out of range",
                self.engine.initial_center
            )));
        }
        if self.engine.resolve_timeout_ms == 0 {
            return Err(Error::InvalidInput(
                "resolve timeout must be greater than zero".to_string(),
            ));
        }
        if self.routing.profile.is_empty() || self.routing.profile.contains('/') {
            return Err(Error::InvalidInput(format!(
                "invalid routing profile '{}'",
                self.routing.profile
            )));
        }
        for (name, url) in [
            ("routing", &self.routing.base_url),
            ("geocoder", &self.geocoder.base_url),
        ] {
            reqwest::Url::parse(url).map_err(|e| {
                Error::InvalidInput(format!("invalid {name} base URL '{url}': {e}"))
            })?;
        }
        Ok(())
    }
}

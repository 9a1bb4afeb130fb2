//! Place search via Nominatim
//!
//! A plain fetch-and-list client: results are only acted on when the user
//! picks one, so there is no generation tracking here.

use log::{debug, warn};
use reqwest::Url;
use serde::Deserialize;

use crate::core::config::GeocoderConfig;
use crate::core::error::{Error, Result};
use crate::core::geo::Coordinate;
use crate::core::provider::GLOBAL_CLIENT;

/// A geocoding hit
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub place_id: u64,
    pub display_name: String,
    pub coordinate: Coordinate,
}

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    place_id: u64,
    display_name: String,
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn into_place(self) -> Option<Place> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lon = self.lon.trim().parse::<f64>().ok()?;
        let coordinate = Coordinate::new(lat, lon);
        coordinate.is_valid().then_some(Place {
            place_id: self.place_id,
            display_name: self.display_name,
            coordinate,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Geocoder {
    config: GeocoderConfig,
}

impl Geocoder {
    pub fn new(config: GeocoderConfig) -> Self {
        Self { config }
    }

    /// Search places matching `term`; a blank term returns nothing without a request
    pub async fn search(&self, term: &str) -> Result<Vec<Place>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let base = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let url = Url::parse_with_params(&base, &[("q", term), ("format", "json")])
            .map_err(|e| Error::InvalidInput(format!("invalid geocoder URL '{base}': {e}")))?;
        debug!("Geocoding '{term}': {url}");

        let response = GLOBAL_CLIENT.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("geocoder returned {status}")));
        }

        let raw: Vec<NominatimPlace> = response.json().await?;
        let total = raw.len();
        let places: Vec<Place> = raw.into_iter().filter_map(NominatimPlace::into_place).collect();
        if places.len() < total {
            warn!(
                "Skipped {} geocoding result(s) with unusable coordinates",
                total - places.len()
            );
        }

        Ok(places)
    }
}

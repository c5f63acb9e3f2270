//! External geocoding contract and the Nominatim-style reference client.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::search::types::GpsPoint;
use crate::settings::GeocoderSettings;

/// Failures of a free-text coordinate lookup.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("no coordinates found")]
    NotFound,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed geocoder response: {0}")]
    Malformed(String),
}

/// Maps free text ("Oslo", "Baker Street 221b") to coordinates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn lookup(&self, place: &str) -> Result<GpsPoint, GeocodeError>;
}

/// JSON client for a Nominatim-compatible search endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    // Nominatim encodes coordinates as strings.
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(settings: &GeocoderSettings) -> Result<Self, GeocodeError> {
        let endpoint = Url::parse(&settings.endpoint)
            .map_err(|e| GeocodeError::Malformed(format!("invalid endpoint: {e}")))?;
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn lookup(&self, place: &str) -> Result<GpsPoint, GeocodeError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", place)
            .append_pair("format", "json")
            .append_pair("limit", "1");

        tracing::debug!(%place, "geocoding place");
        let places: Vec<NominatimPlace> = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let first = places.into_iter().next().ok_or(GeocodeError::NotFound)?;
        let latitude = first
            .lat
            .parse::<f64>()
            .map_err(|_| GeocodeError::Malformed(format!("latitude '{}'", first.lat)))?;
        let longitude = first
            .lon
            .parse::<f64>()
            .map_err(|_| GeocodeError::Malformed(format!("longitude '{}'", first.lon)))?;
        Ok(GpsPoint {
            latitude,
            longitude,
        })
    }
}

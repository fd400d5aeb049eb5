//! Google Places text search provider (first tier).
//!
//! API: `https://maps.googleapis.com/maps/api/place/textsearch/json`
//! Auth: `key` query parameter.
//! A body `status` other than `"OK"` is treated as a failure, including
//! `ZERO_RESULTS`, so the next tier gets a chance.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::distance::resolve_distance;
use super::{VenueProvider, DEFAULT_PRICE_TIER, DEFAULT_RATING, MAX_RESULTS_PER_PROVIDER};
use crate::types::{Coordinates, Location, ProviderError, VenueRecord, VenueSource};

const PROVIDER: &str = "google_places";
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";
const SEARCH_PATH: &str = "/maps/api/place/textsearch/json";
const PHOTO_PATH: &str = "/maps/api/place/photo";
const SEARCH_RADIUS_METERS: u32 = 5000;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    #[serde(default)]
    place_id: Option<String>,
    name: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    price_level: Option<u8>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    vicinity: Option<String>,
    #[serde(default)]
    photos: Vec<Photo>,
    #[serde(default)]
    opening_hours: Option<OpeningHours>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct Photo {
    photo_reference: String,
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    #[serde(default)]
    open_now: Option<bool>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

pub struct GooglePlacesProvider {
    http: Client,
    api_key: Option<SecretString>,
    base_url: String,
}

impl GooglePlacesProvider {
    pub fn new(api_key: Option<SecretString>, timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, timeout, DEFAULT_BASE_URL)
    }

    /// Point the provider at another host (used by tests).
    pub fn with_base_url(
        api_key: Option<SecretString>,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("roulette/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Free-text query plus optional `location` bias for the request.
    fn query_params(cuisine: &str, location: &Location) -> Vec<(&'static str, String)> {
        match location {
            Location::Coordinates(c) => vec![
                ("query", format!("{cuisine} restaurants")),
                ("location", format!("{},{}", c.lat, c.lng)),
                ("radius", SEARCH_RADIUS_METERS.to_string()),
            ],
            Location::Place { city, postal_code } => {
                let place = match postal_code {
                    Some(zip) => format!("{city} {zip}"),
                    None => city.clone(),
                };
                vec![("query", format!("{cuisine} restaurants in {place}"))]
            }
        }
    }

    fn build_url(&self, cuisine: &str, location: &Location, key: &str) -> String {
        let mut url = format!("{}{SEARCH_PATH}?", self.base_url);
        for (name, value) in Self::query_params(cuisine, location) {
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(&value));
            url.push('&');
        }
        url.push_str("key=");
        url.push_str(&urlencoding::encode(key));
        url
    }

    fn photo_url(&self, reference: &str, key: &str) -> String {
        format!(
            "{}{PHOTO_PATH}?maxwidth=400&photoreference={}&key={}",
            self.base_url,
            urlencoding::encode(reference),
            urlencoding::encode(key),
        )
    }

    fn to_record(
        &self,
        index: usize,
        place: Place,
        cuisine: &str,
        origin: Option<Coordinates>,
        key: &str,
    ) -> VenueRecord {
        let coords = place
            .geometry
            .map(|g| Coordinates::new(g.location.lat, g.location.lng));

        VenueRecord {
            id: place
                .place_id
                .unwrap_or_else(|| format!("google-{index}")),
            name: place.name,
            cuisine: cuisine.to_string(),
            rating: place.rating.unwrap_or(DEFAULT_RATING),
            price_tier: place
                .price_level
                .filter(|p| *p > 0)
                .unwrap_or(DEFAULT_PRICE_TIER),
            distance: resolve_distance(origin, coords, None),
            address: place
                .formatted_address
                .or(place.vicinity)
                .unwrap_or_else(|| "Address not available".to_string()),
            phone: None,
            website: None,
            image_url: place
                .photos
                .first()
                .map(|p| self.photo_url(&p.photo_reference, key)),
            is_open: place.opening_hours.and_then(|h| h.open_now),
            description: Some(format!(
                "Delicious {cuisine} cuisine at this highly-rated local favorite."
            )),
            source: VenueSource::GooglePlaces,
        }
    }
}

#[async_trait]
impl VenueProvider for GooglePlacesProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(
        &self,
        cuisine: &str,
        location: &Location,
    ) -> Result<Vec<VenueRecord>, ProviderError> {
        let key = self
            .api_key
            .as_ref()
            .ok_or(ProviderError::Unconfigured(PROVIDER))?
            .expose_secret();

        let url = self.build_url(cuisine, location, key);
        debug!(cuisine, %location, "Querying Google Places text search");

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let data: TextSearchResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Malformed {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        if data.status != "OK" {
            let message = match data.error_message {
                Some(detail) => format!("{}: {detail}", data.status),
                None => data.status,
            };
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message,
            });
        }

        let origin = location.coords();
        Ok(data
            .results
            .into_iter()
            .take(MAX_RESULTS_PER_PROVIDER)
            .enumerate()
            .map(|(i, place)| self.to_record(i, place, cuisine, origin, key))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Yelp Fusion business search provider (second tier).
//!
//! API: `https://api.yelp.com/v3/businesses/search`
//! Auth: `Authorization: Bearer <key>`.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::distance::resolve_distance;
use super::{VenueProvider, DEFAULT_PRICE_TIER, DEFAULT_RATING, MAX_RESULTS_PER_PROVIDER};
use crate::types::{Coordinates, Location, ProviderError, VenueRecord, VenueSource};

const PROVIDER: &str = "yelp";
const DEFAULT_BASE_URL: &str = "https://api.yelp.com";
const SEARCH_PATH: &str = "/v3/businesses/search";
/// About five miles.
const SEARCH_RADIUS_METERS: u32 = 8000;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    businesses: Vec<Business>,
}

#[derive(Debug, Deserialize)]
struct Business {
    id: String,
    name: String,
    #[serde(default)]
    rating: Option<f64>,
    /// "$" to "$$$$".
    #[serde(default)]
    price: Option<String>,
    /// Meters from the search origin.
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    location: Option<BusinessLocation>,
    #[serde(default)]
    coordinates: Option<BusinessCoordinates>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    is_closed: Option<bool>,
    #[serde(default)]
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct BusinessLocation {
    #[serde(default)]
    address1: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BusinessCoordinates {
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Category {
    title: String,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

pub struct YelpProvider {
    http: Client,
    api_key: Option<SecretString>,
    base_url: String,
}

impl YelpProvider {
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

    fn query_params(cuisine: &str, location: &Location) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("term", format!("{cuisine} restaurants")),
            ("limit", MAX_RESULTS_PER_PROVIDER.to_string()),
            ("radius", SEARCH_RADIUS_METERS.to_string()),
            ("sort_by", "best_match".to_string()),
        ];
        match location {
            Location::Coordinates(c) => {
                params.push(("latitude", c.lat.to_string()));
                params.push(("longitude", c.lng.to_string()));
            }
            Location::Place {
                city,
                postal_code: Some(zip),
            } => params.push(("location", format!("{city} {zip}"))),
            Location::Place { city, .. } => params.push(("location", city.clone())),
        }
        params
    }

    fn to_record(business: Business, cuisine: &str, origin: Option<Coordinates>) -> VenueRecord {
        let coords = business.coordinates.and_then(|c| match (c.latitude, c.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        });

        let address = business
            .location
            .map(|l| {
                [l.address1, l.city]
                    .into_iter()
                    .flatten()
                    .filter(|part| !part.trim().is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| "Address not available".to_string());

        let description = if business.categories.is_empty() {
            format!("Great {cuisine} restaurant")
        } else {
            business
                .categories
                .iter()
                .map(|c| c.title.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        VenueRecord {
            id: business.id,
            name: business.name,
            cuisine: cuisine.to_string(),
            rating: business.rating.unwrap_or(DEFAULT_RATING),
            price_tier: business
                .price
                .map(|p| p.chars().filter(|c| *c == '$').count() as u8)
                .filter(|p| *p > 0)
                .unwrap_or(DEFAULT_PRICE_TIER),
            distance: resolve_distance(origin, coords, business.distance),
            address,
            phone: business.phone.filter(|p| !p.is_empty()),
            website: business.url,
            image_url: business.image_url.filter(|u| !u.is_empty()),
            is_open: business.is_closed.map(|closed| !closed),
            description: Some(description),
            source: VenueSource::Yelp,
        }
    }
}

#[async_trait]
impl VenueProvider for YelpProvider {
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
            .ok_or(ProviderError::Unconfigured(PROVIDER))?;

        debug!(cuisine, %location, "Querying Yelp business search");

        let resp = self
            .http
            .get(format!("{}{SEARCH_PATH}", self.base_url))
            .query(&Self::query_params(cuisine, location))
            .bearer_auth(key.expose_secret())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let data: SearchResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Malformed {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let origin = location.coords();
        Ok(data
            .businesses
            .into_iter()
            .take(MAX_RESULTS_PER_PROVIDER)
            .map(|b| Self::to_record(b, cuisine, origin))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Shared types for the roulette engine.
//!
//! These types form the data model used across all modules.
//! The wheel and venue modules depend on them without depending
//! on each other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Where the user is searching from.
///
/// Supplied by the caller; retrieval reads it but never changes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Coordinates(Coordinates),
    Place {
        city: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        postal_code: Option<String>,
    },
}

impl Location {
    pub fn coordinates(lat: f64, lng: f64) -> Self {
        Location::Coordinates(Coordinates::new(lat, lng))
    }

    pub fn city(city: impl Into<String>) -> Self {
        Location::Place {
            city: city.into(),
            postal_code: None,
        }
    }

    /// The caller's coordinates, if this location carries them.
    pub fn coords(&self) -> Option<Coordinates> {
        match self {
            Location::Coordinates(c) => Some(*c),
            Location::Place { .. } => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Coordinates(c) => write!(f, "{:.4},{:.4}", c.lat, c.lng),
            Location::Place {
                city,
                postal_code: Some(zip),
            } => write!(f, "{city} {zip}"),
            Location::Place { city, .. } => write!(f, "{city}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Wheel segments and spins
// ---------------------------------------------------------------------------

/// One slice of a wheel.
///
/// Slices are laid out in ordinal order, each `360 / N` degrees wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment<T> {
    pub id: String,
    pub label: String,
    pub ordinal: usize,
    pub item: T,
}

/// Randomised parameters for one spin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinPlan {
    /// Full revolutions drawn for this spin (fractional).
    pub spins: f64,
    /// Degrees added to the wheel's rotation. Always positive.
    pub rotation_delta: f64,
    pub duration_ms: u64,
    /// Cumulative rotation once the delta is applied.
    pub final_rotation: f64,
}

/// Outcome of a completed spin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinResult<T> {
    pub id: Uuid,
    pub plan: SpinPlan,
    pub winner: Segment<T>,
    pub spun_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Venues
// ---------------------------------------------------------------------------

/// Which tier produced a venue record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueSource {
    GooglePlaces,
    Yelp,
    StaticCatalog,
}

impl fmt::Display for VenueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VenueSource::GooglePlaces => write!(f, "google_places"),
            VenueSource::Yelp => write!(f, "yelp"),
            VenueSource::StaticCatalog => write!(f, "static_catalog"),
        }
    }
}

/// Distance from the search origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "miles", rename_all = "snake_case")]
pub enum Distance {
    /// Miles, rounded to one decimal place.
    Miles(f64),
    Unknown,
}

impl Distance {
    pub fn from_miles(miles: f64) -> Self {
        Distance::Miles((miles * 10.0).round() / 10.0)
    }

    pub fn miles(&self) -> Option<f64> {
        match self {
            Distance::Miles(m) => Some(*m),
            Distance::Unknown => None,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Miles(m) => write!(f, "{m:.1} mi"),
            Distance::Unknown => write!(f, "Distance unknown"),
        }
    }
}

/// A restaurant as returned by one retrieval tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueRecord {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub rating: f64,
    /// 1 (cheap) to 4 (expensive).
    pub price_tier: u8,
    pub distance: Distance,
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_open: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    pub source: VenueSource,
}

impl fmt::Display for VenueRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {:.1}★, {}, {})",
            self.name,
            self.cuisine,
            self.rating,
            "$".repeat(self.price_tier as usize),
            self.distance,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by the wheel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpinError {
    /// A caller broke a precondition (zero segments, non-finite rotation,
    /// finishing a spin that never started).
    #[error("Invalid wheel state: {0}")]
    InvalidState(String),

    #[error("Wheel is already spinning")]
    AlreadySpinning,
}

/// Errors raised by a single retrieval tier.
///
/// None of these reach the caller of `fetch_venues`; they decide whether
/// the next tier is tried.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider {0} has no credential configured")]
    Unconfigured(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned HTTP {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("{provider} API status: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },

    #[error("Malformed {provider} payload: {message}")]
    Malformed {
        provider: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Restaurant retrieval.
//!
//! Defines the `VenueProvider` trait and the `VenueFinder` that walks the
//! ranked provider tiers, ending with the bundled catalog. Fetching never
//! fails from the caller's point of view: every provider problem is logged
//! and the next tier is tried.

pub mod catalog;
pub mod distance;
pub mod google;
pub mod yelp;

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ProvidersConfig;
use crate::random::RandomSource;
use crate::types::{Location, ProviderError, VenueRecord};
use catalog::StaticCatalog;
use google::GooglePlacesProvider;
use yelp::YelpProvider;

/// Rating used when a provider omits one.
pub const DEFAULT_RATING: f64 = 4.0;
/// Price tier used when a provider omits one.
pub const DEFAULT_PRICE_TIER: u8 = 2;
pub const MAX_RESULTS_PER_PROVIDER: usize = 10;

/// An external source of venues.
#[async_trait]
pub trait VenueProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Whether a credential is available. Unconfigured providers are skipped.
    fn is_configured(&self) -> bool;

    /// Search for venues serving `cuisine` near `location`.
    async fn search(
        &self,
        cuisine: &str,
        location: &Location,
    ) -> Result<Vec<VenueRecord>, ProviderError>;
}

// ---------------------------------------------------------------------------
// Tier outcomes
// ---------------------------------------------------------------------------

/// Result of trying one tier.
#[derive(Debug)]
pub enum TierOutcome {
    Success(Vec<VenueRecord>),
    /// No credential; skipped without an attempt.
    Unavailable,
    TransientFailure(String),
}

/// Try one provider and classify the result.
///
/// A successful answer with no venues counts as a failure so the fallback
/// chain keeps going.
pub async fn attempt_tier(
    provider: &dyn VenueProvider,
    cuisine: &str,
    location: &Location,
) -> TierOutcome {
    if !provider.is_configured() {
        return TierOutcome::Unavailable;
    }
    match provider.search(cuisine, location).await {
        Ok(venues) if venues.is_empty() => {
            TierOutcome::TransientFailure("provider returned no venues".to_string())
        }
        Ok(venues) => TierOutcome::Success(venues),
        Err(ProviderError::Unconfigured(_)) => TierOutcome::Unavailable,
        Err(e) => TierOutcome::TransientFailure(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Finder
// ---------------------------------------------------------------------------

/// Walks provider tiers in rank order, then the static catalog.
pub struct VenueFinder {
    tiers: Vec<Box<dyn VenueProvider>>,
    catalog: StaticCatalog,
    rng: Mutex<Box<dyn RandomSource>>,
    in_flight: AtomicBool,
}

impl VenueFinder {
    pub fn new(tiers: Vec<Box<dyn VenueProvider>>, rng: Box<dyn RandomSource>) -> Self {
        Self {
            tiers,
            catalog: StaticCatalog::new(),
            rng: Mutex::new(rng),
            in_flight: AtomicBool::new(false),
        }
    }

    /// A finder with no external providers; everything comes from the catalog.
    pub fn offline(rng: Box<dyn RandomSource>) -> Self {
        Self::new(Vec::new(), rng)
    }

    /// Build Google → Yelp tiers from configuration.
    ///
    /// Missing credentials leave a tier in place but unconfigured, so it is
    /// reported as unavailable rather than silently absent.
    pub fn from_config(
        cfg: &ProvidersConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(cfg.request_timeout_secs);

        let google_key = resolve_key(&cfg.google_api_key_env);
        let yelp_key = resolve_key(&cfg.yelp_api_key_env);

        let google = match &cfg.google_base_url {
            Some(url) => GooglePlacesProvider::with_base_url(google_key, timeout, url)?,
            None => GooglePlacesProvider::new(google_key, timeout)?,
        };
        let yelp = match &cfg.yelp_base_url {
            Some(url) => YelpProvider::with_base_url(yelp_key, timeout, url)?,
            None => YelpProvider::new(yelp_key, timeout)?,
        };

        info!(
            google = google.is_configured(),
            yelp = yelp.is_configured(),
            timeout_secs = cfg.request_timeout_secs,
            "Venue providers initialised"
        );

        Ok(Self::new(vec![Box::new(google), Box::new(yelp)], rng))
    }

    /// Fetch venues for `cuisine` near `location`.
    ///
    /// Never fails. Returns an empty list only when every provider missed
    /// and the catalog has no entry for `cuisine`.
    pub async fn fetch_venues(&self, cuisine: &str, location: &Location) -> Vec<VenueRecord> {
        let _guard = FetchGuard::engage(&self.in_flight);

        for tier in &self.tiers {
            match attempt_tier(tier.as_ref(), cuisine, location).await {
                TierOutcome::Success(venues) => {
                    info!(
                        provider = tier.name(),
                        cuisine,
                        count = venues.len(),
                        "Venues fetched"
                    );
                    return venues;
                }
                TierOutcome::Unavailable => {
                    debug!(provider = tier.name(), "Provider not configured, skipping");
                }
                TierOutcome::TransientFailure(reason) => {
                    warn!(
                        provider = tier.name(),
                        cuisine,
                        error = %reason,
                        "Provider failed, trying next tier"
                    );
                }
            }
        }

        info!(cuisine, "Using static catalog venues");
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.catalog.venues(cuisine, rng.as_mut())
    }

    /// Whether a fetch is currently running.
    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }
}

fn resolve_key(env_name: &Option<String>) -> Option<SecretString> {
    env_name
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::new)
}

/// Holds the fetch flag for the life of one fetch, including early
/// returns and a dropped future.
struct FetchGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FetchGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self { flag }
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

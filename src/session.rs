//! One user's roulette session.
//!
//! Ties the three wheels (cuisine, restaurant, dish) to the venue finder.
//! Only one wheel may spin at a time. Picking a cuisine refills the dish
//! wheel and empties the restaurant wheel until venues are loaded for it.
//!
//! Spins are exposed both as one async call (`spin_cuisine` and friends)
//! and as `begin_spin` / `complete_spin` halves for callers that must not
//! hold the session across the animation wait.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::cuisine::{self, describe_cuisine, describe_dish, DishOption};
use crate::random::RandomSource;
use crate::types::{Location, Segment, SpinError, SpinPlan, SpinResult, VenueRecord};
use crate::venues::VenueFinder;
use crate::wheel::{animation_delay, PendingSpin, Wheel};

/// Which of the session's wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelKind {
    Cuisine,
    Restaurant,
    Dish,
}

impl fmt::Display for WheelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelKind::Cuisine => write!(f, "cuisine"),
            WheelKind::Restaurant => write!(f, "restaurant"),
            WheelKind::Dish => write!(f, "dish"),
        }
    }
}

/// A resolved spin on any of the wheels.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "wheel", content = "result", rename_all = "snake_case")]
pub enum SpinOutcome {
    Cuisine(SpinResult<String>),
    Restaurant(SpinResult<VenueRecord>),
    Dish(SpinResult<DishOption>),
}

impl SpinOutcome {
    pub fn kind(&self) -> WheelKind {
        match self {
            SpinOutcome::Cuisine(_) => WheelKind::Cuisine,
            SpinOutcome::Restaurant(_) => WheelKind::Restaurant,
            SpinOutcome::Dish(_) => WheelKind::Dish,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SpinOutcome::Cuisine(r) => &r.winner.label,
            SpinOutcome::Restaurant(r) => &r.winner.label,
            SpinOutcome::Dish(r) => &r.winner.label,
        }
    }

    pub fn plan(&self) -> SpinPlan {
        match self {
            SpinOutcome::Cuisine(r) => r.plan,
            SpinOutcome::Restaurant(r) => r.plan,
            SpinOutcome::Dish(r) => r.plan,
        }
    }
}

/// Result of a full cuisine → fetch → restaurant round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundSummary {
    pub cuisine: SpinResult<String>,
    pub venues_found: usize,
    /// `None` when no venue could be found for the cuisine.
    pub restaurant: Option<SpinResult<VenueRecord>>,
}

// ---------------------------------------------------------------------------
// Views and snapshots
// ---------------------------------------------------------------------------

/// Read-only view of one wheel.
#[derive(Debug, Clone, Serialize)]
pub struct WheelView<T> {
    pub labels: Vec<String>,
    pub rotation: f64,
    pub spinning: bool,
    pub winner: Option<Segment<T>>,
    pub history: Vec<Segment<T>>,
}

impl<T: Clone> WheelView<T> {
    fn of(wheel: &Wheel<T>) -> Self {
        Self {
            labels: wheel.segments().iter().map(|s| s.label.clone()).collect(),
            rotation: wheel.rotation(),
            spinning: wheel.is_spinning(),
            winner: wheel.winner().cloned(),
            history: wheel.history().cloned().collect(),
        }
    }
}

/// Everything a client needs to draw the session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub location: Option<Location>,
    pub default_city: String,
    pub selected_cuisine: Option<String>,
    pub venues: Vec<VenueRecord>,
    pub fetching: bool,
    pub cuisine: WheelView<String>,
    pub restaurant: WheelView<VenueRecord>,
    pub dish: WheelView<DishOption>,
}

/// Persisted form of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub selected_cuisine: Option<String>,
    #[serde(default)]
    pub venues: Vec<VenueRecord>,
    #[serde(default)]
    pub dishes: Vec<DishOption>,
    #[serde(default)]
    pub cuisine_history: Vec<Segment<String>>,
    #[serde(default)]
    pub restaurant_history: Vec<Segment<VenueRecord>>,
    #[serde(default)]
    pub dish_history: Vec<Segment<DishOption>>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct RouletteSession {
    cuisines: Wheel<String>,
    restaurants: Wheel<VenueRecord>,
    dishes: Wheel<DishOption>,
    finder: Arc<VenueFinder>,
    rng: Box<dyn RandomSource>,
    location: Option<Location>,
    default_city: String,
    selected_cuisine: Option<String>,
    venues: Vec<VenueRecord>,
    pace: f64,
    dish_count: usize,
}

fn describe_venue(venue: &VenueRecord) -> (String, String) {
    (venue.id.clone(), venue.name.clone())
}

impl RouletteSession {
    pub fn new(cfg: &AppConfig, finder: Arc<VenueFinder>, rng: Box<dyn RandomSource>) -> Self {
        let history_len = cfg.wheel.history_len;
        Self {
            cuisines: Wheel::from_items(
                cuisine::default_cuisines(),
                cfg.wheel.cuisine_tier,
                history_len,
                describe_cuisine,
            ),
            restaurants: Wheel::new(Vec::new(), cfg.wheel.restaurant_tier, history_len),
            dishes: Wheel::new(Vec::new(), cfg.wheel.dish_tier, history_len),
            finder,
            rng,
            location: None,
            default_city: cfg.session.default_city.clone(),
            selected_cuisine: None,
            venues: Vec::new(),
            pace: cfg.wheel.animation_pace,
            dish_count: cfg.session.dish_count,
        }
    }

    // -- Spinning ---------------------------------------------------------

    fn any_spinning(&self) -> bool {
        self.cuisines.is_spinning() || self.restaurants.is_spinning() || self.dishes.is_spinning()
    }

    fn is_spinning(&self, kind: WheelKind) -> bool {
        self.pending_spin(kind).is_some()
    }

    fn pending_spin(&self, kind: WheelKind) -> Option<&PendingSpin> {
        match kind {
            WheelKind::Cuisine => self.cuisines.pending(),
            WheelKind::Restaurant => self.restaurants.pending(),
            WheelKind::Dish => self.dishes.pending(),
        }
    }

    /// Plan a spin on `kind`. `Ok(None)` when that wheel is empty.
    pub fn begin_spin(&mut self, kind: WheelKind) -> Result<Option<PendingSpin>, SpinError> {
        if self.any_spinning() {
            return Err(SpinError::AlreadySpinning);
        }
        if kind != WheelKind::Cuisine && self.selected_cuisine.is_none() {
            return Err(SpinError::InvalidState(
                "spin the cuisine wheel first".to_string(),
            ));
        }

        let rng = self.rng.as_mut();
        let pending = match kind {
            WheelKind::Cuisine => self.cuisines.start_spin(rng)?,
            WheelKind::Restaurant => self.restaurants.start_spin(rng)?,
            WheelKind::Dish => self.dishes.start_spin(rng)?,
        };
        if let Some(p) = &pending {
            debug!(
                wheel = %kind,
                spin_id = %p.id,
                duration_ms = p.plan.duration_ms,
                "Spin started"
            );
        }
        Ok(pending)
    }

    /// Resolve the pending spin on `kind` and apply its consequences.
    ///
    /// `spin_id` must be the id returned by `begin_spin`; a caller holding
    /// a spin that was since cancelled or replaced gets `InvalidState`.
    pub fn complete_spin(
        &mut self,
        kind: WheelKind,
        spin_id: Uuid,
    ) -> Result<SpinOutcome, SpinError> {
        if self.pending_spin(kind).map(|p| p.id) != Some(spin_id) {
            return Err(SpinError::InvalidState(format!(
                "spin {spin_id} on the {kind} wheel is no longer in progress"
            )));
        }
        let outcome = match kind {
            WheelKind::Cuisine => {
                let result = self.cuisines.finish_spin()?;
                self.select_cuisine(&result.winner.item)?;
                SpinOutcome::Cuisine(result)
            }
            WheelKind::Restaurant => SpinOutcome::Restaurant(self.restaurants.finish_spin()?),
            WheelKind::Dish => SpinOutcome::Dish(self.dishes.finish_spin()?),
        };
        info!(wheel = %kind, winner = outcome.label(), "Wheel stopped");
        Ok(outcome)
    }

    /// Drop the pending spin on `kind`, if any.
    pub fn abort_spin(&mut self, kind: WheelKind) {
        match kind {
            WheelKind::Cuisine => self.cuisines.cancel_spin(),
            WheelKind::Restaurant => self.restaurants.cancel_spin(),
            WheelKind::Dish => self.dishes.cancel_spin(),
        }
    }

    /// Begin, wait out the animation, complete.
    ///
    /// Dropping the future mid-wait aborts the spin.
    pub async fn spin(&mut self, kind: WheelKind) -> Result<Option<SpinOutcome>, SpinError> {
        let Some(pending) = self.begin_spin(kind)? else {
            return Ok(None);
        };
        let wait = animation_delay(pending.plan.duration_ms, self.pace);
        let mut guard = SpinGuard { session: self, kind };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        guard.session.complete_spin(kind, pending.id).map(Some)
    }

    pub async fn spin_cuisine(&mut self) -> Result<Option<SpinResult<String>>, SpinError> {
        match self.spin(WheelKind::Cuisine).await? {
            Some(SpinOutcome::Cuisine(result)) => Ok(Some(result)),
            _ => Ok(None),
        }
    }

    pub async fn spin_restaurant(&mut self) -> Result<Option<SpinResult<VenueRecord>>, SpinError> {
        match self.spin(WheelKind::Restaurant).await? {
            Some(SpinOutcome::Restaurant(result)) => Ok(Some(result)),
            _ => Ok(None),
        }
    }

    pub async fn spin_dish(&mut self) -> Result<Option<SpinResult<DishOption>>, SpinError> {
        match self.spin(WheelKind::Dish).await? {
            Some(SpinOutcome::Dish(result)) => Ok(Some(result)),
            _ => Ok(None),
        }
    }

    fn select_cuisine(&mut self, name: &str) -> Result<(), SpinError> {
        let dishes = cuisine::random_dish_options(name, self.dish_count, self.rng.as_mut());
        self.dishes.set_items(dishes, describe_dish)?;
        self.restaurants.set_items(Vec::new(), describe_venue)?;
        self.venues.clear();
        self.selected_cuisine = Some(name.to_string());
        Ok(())
    }

    // -- Venues -----------------------------------------------------------

    /// Cuisine and location for the next venue fetch.
    ///
    /// Falls back to the default city when no location has been set.
    pub fn restaurant_query(&self) -> Result<(String, Location), SpinError> {
        let cuisine = self
            .selected_cuisine
            .clone()
            .ok_or_else(|| SpinError::InvalidState("no cuisine selected".to_string()))?;
        Ok((cuisine, self.search_location()))
    }

    /// The user's location, or the default city.
    pub fn search_location(&self) -> Location {
        self.location
            .clone()
            .unwrap_or_else(|| Location::city(self.default_city.clone()))
    }

    /// Whether a cuisine is picked but its venues are not loaded yet.
    pub fn needs_restaurants(&self) -> bool {
        self.selected_cuisine.is_some() && self.venues.is_empty()
    }

    /// Put fetched venues on the restaurant wheel.
    ///
    /// Rejected if the selected cuisine changed since the fetch began.
    pub fn apply_restaurants(
        &mut self,
        cuisine: &str,
        venues: Vec<VenueRecord>,
    ) -> Result<usize, SpinError> {
        if self.selected_cuisine.as_deref() != Some(cuisine) {
            warn!(cuisine, "Cuisine changed during fetch, discarding venues");
            return Err(SpinError::InvalidState(format!(
                "venues for {cuisine} no longer match the selected cuisine"
            )));
        }
        self.restaurants.set_items(venues.clone(), describe_venue)?;
        self.venues = venues;
        Ok(self.venues.len())
    }

    /// Fetch venues for the selected cuisine and load the restaurant wheel.
    pub async fn load_restaurants(&mut self) -> Result<usize, SpinError> {
        let (cuisine, location) = self.restaurant_query()?;
        let venues = self.finder.fetch_venues(&cuisine, &location).await;
        let count = self.apply_restaurants(&cuisine, venues)?;
        info!(cuisine, %location, count, "Restaurant wheel loaded");
        Ok(count)
    }

    /// Cuisine spin, venue fetch, restaurant spin.
    pub async fn play_round(&mut self) -> Result<RoundSummary, SpinError> {
        let cuisine = self
            .spin_cuisine()
            .await?
            .ok_or_else(|| SpinError::InvalidState("cuisine wheel is empty".to_string()))?;
        let venues_found = self.load_restaurants().await?;
        let restaurant = self.spin_restaurant().await?;
        Ok(RoundSummary {
            cuisine,
            venues_found,
            restaurant,
        })
    }

    // -- State ------------------------------------------------------------

    /// Back to a fresh cuisine wheel. Location and history are kept.
    ///
    /// Rejected while any wheel is spinning.
    pub fn reset(&mut self) -> Result<(), SpinError> {
        if self.any_spinning() {
            return Err(SpinError::AlreadySpinning);
        }
        self.cuisines.reset();
        self.restaurants.reset();
        self.dishes.reset();
        self.restaurants.set_items(Vec::new(), describe_venue)?;
        self.dishes.set_items(Vec::new(), describe_dish)?;
        self.selected_cuisine = None;
        self.venues.clear();
        info!("Session reset");
        Ok(())
    }

    /// Draw a fresh set of dishes for the selected cuisine.
    ///
    /// The dish wheel goes back to rotation zero with no winner; its
    /// history is kept.
    pub fn refresh_dishes(&mut self) -> Result<usize, SpinError> {
        if self.any_spinning() {
            return Err(SpinError::AlreadySpinning);
        }
        let name = self
            .selected_cuisine
            .clone()
            .ok_or_else(|| SpinError::InvalidState("no cuisine selected".to_string()))?;
        let dishes = cuisine::random_dish_options(&name, self.dish_count, self.rng.as_mut());
        let count = dishes.len();
        self.dishes.reset();
        self.dishes.set_items(dishes, describe_dish)?;
        info!(cuisine = %name, count, "Dish options refreshed");
        Ok(count)
    }

    /// Change the search location. Loaded venues are dropped so the next
    /// fetch uses the new location.
    pub fn set_location(&mut self, location: Option<Location>) -> Result<(), SpinError> {
        if self.restaurants.is_spinning() {
            return Err(SpinError::AlreadySpinning);
        }
        if self.location != location {
            self.restaurants.set_items(Vec::new(), describe_venue)?;
            self.venues.clear();
        }
        match &location {
            Some(loc) => info!(%loc, "Location set"),
            None => info!("Location cleared"),
        }
        self.location = location;
        Ok(())
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn selected_cuisine(&self) -> Option<&str> {
        self.selected_cuisine.as_deref()
    }

    pub fn venues(&self) -> &[VenueRecord] {
        &self.venues
    }

    pub fn pace(&self) -> f64 {
        self.pace
    }

    pub fn finder(&self) -> Arc<VenueFinder> {
        Arc::clone(&self.finder)
    }

    pub fn cuisine_wheel(&self) -> &Wheel<String> {
        &self.cuisines
    }

    pub fn restaurant_wheel(&self) -> &Wheel<VenueRecord> {
        &self.restaurants
    }

    pub fn dish_wheel(&self) -> &Wheel<DishOption> {
        &self.dishes
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            location: self.location.clone(),
            default_city: self.default_city.clone(),
            selected_cuisine: self.selected_cuisine.clone(),
            venues: self.venues.clone(),
            fetching: self.finder.is_fetching(),
            cuisine: WheelView::of(&self.cuisines),
            restaurant: WheelView::of(&self.restaurants),
            dish: WheelView::of(&self.dishes),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            saved_at: Utc::now(),
            location: self.location.clone(),
            selected_cuisine: self.selected_cuisine.clone(),
            venues: self.venues.clone(),
            dishes: self.dishes.segments().iter().map(|s| s.item.clone()).collect(),
            cuisine_history: self.cuisines.history().cloned().collect(),
            restaurant_history: self.restaurants.history().cloned().collect(),
            dish_history: self.dishes.history().cloned().collect(),
        }
    }

    /// Load a snapshot into an idle session. Wheel rotations start at zero.
    ///
    /// Rejected while any wheel is spinning.
    pub fn restore(&mut self, snapshot: SessionSnapshot) -> Result<(), SpinError> {
        self.reset()?;

        self.dishes.set_items(snapshot.dishes, describe_dish)?;
        self.restaurants
            .set_items(snapshot.venues.clone(), describe_venue)?;
        self.venues = snapshot.venues;
        self.location = snapshot.location;
        self.selected_cuisine = snapshot.selected_cuisine;

        self.cuisines.restore_history(snapshot.cuisine_history);
        self.restaurants.restore_history(snapshot.restaurant_history);
        self.dishes.restore_history(snapshot.dish_history);

        info!(
            saved_at = %snapshot.saved_at,
            cuisine = self.selected_cuisine.as_deref().unwrap_or("-"),
            venues = self.venues.len(),
            "Session restored"
        );
        Ok(())
    }
}

/// Aborts a spin that is still pending when dropped.
struct SpinGuard<'a> {
    session: &'a mut RouletteSession,
    kind: WheelKind,
}

impl Drop for SpinGuard<'_> {
    fn drop(&mut self) {
        if self.session.is_spinning(self.kind) {
            self.session.abort_spin(self.kind);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

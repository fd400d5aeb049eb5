//! API route handlers.
//!
//! All endpoints return JSON. The session is shared behind a tokio mutex;
//! spin handlers release it for the animation wait so a second request
//! sees the wheel in flight.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::session::{RouletteSession, SessionState, SpinOutcome, WheelKind};
use crate::storage;
use crate::types::{Location, SpinError, VenueRecord};
use crate::wheel::animation_delay;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct RouletteState {
    pub session: Mutex<RouletteSession>,
    /// Snapshot written after every change. None disables persistence.
    pub state_file: Option<String>,
}

impl RouletteState {
    pub fn new(session: RouletteSession, state_file: Option<String>) -> Self {
        Self {
            session: Mutex::new(session),
            state_file,
        }
    }

    fn persist(&self, session: &RouletteSession) {
        if let Some(path) = &self.state_file {
            if let Err(e) = storage::save_snapshot(&session.snapshot(), Some(path)) {
                warn!(path, error = %e, "Failed to save session snapshot");
            }
        }
    }
}

pub type AppState = Arc<RouletteState>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ApiError {
    Spin(SpinError),
    EmptyWheel(WheelKind),
    Unprocessable(String),
    Internal(String),
}

impl From<SpinError> for ApiError {
    fn from(e: SpinError) -> Self {
        ApiError::Spin(e)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Spin(e @ SpinError::AlreadySpinning) => (StatusCode::CONFLICT, e.to_string()),
            ApiError::Spin(e @ SpinError::InvalidState(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::EmptyWheel(kind) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("The {kind} wheel has no segments"),
            ),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RestaurantQuery {
    pub cuisine: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

impl RestaurantQuery {
    /// Location named by the query, if any. Coordinates win over a city.
    fn location(&self) -> Result<Option<Location>, ApiError> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                    return Err(ApiError::Unprocessable(format!(
                        "Coordinates out of range: {lat},{lng}"
                    )));
                }
                Ok(Some(Location::coordinates(lat, lng)))
            }
            (Some(_), None) | (None, Some(_)) => Err(ApiError::Unprocessable(
                "lat and lng must be given together".to_string(),
            )),
            (None, None) => Ok(self
                .city
                .as_ref()
                .filter(|c| !c.trim().is_empty())
                .map(|city| Location::Place {
                    city: city.trim().to_string(),
                    postal_code: self.postal_code.clone(),
                })),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantsResponse {
    pub cuisine: String,
    pub location: Location,
    pub count: usize,
    pub venues: Vec<VenueRecord>,
}

#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    /// `None` clears the location.
    pub location: Option<Location>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /api/state
pub async fn get_state(State(state): State<AppState>) -> Json<SessionState> {
    let session = state.session.lock().await;
    Json(session.state())
}

/// POST /api/spin/cuisine
pub async fn spin_cuisine(State(state): State<AppState>) -> Result<Json<SpinOutcome>, ApiError> {
    spin_wheel(state, WheelKind::Cuisine).await
}

/// POST /api/spin/restaurant
///
/// Loads venues for the selected cuisine first when none are loaded.
pub async fn spin_restaurant(
    State(state): State<AppState>,
) -> Result<Json<SpinOutcome>, ApiError> {
    let pending_fetch = {
        let session = state.session.lock().await;
        if session.needs_restaurants() {
            Some((session.restaurant_query()?, session.finder()))
        } else {
            None
        }
    };

    if let Some(((cuisine, location), finder)) = pending_fetch {
        let venues = finder.fetch_venues(&cuisine, &location).await;
        let mut session = state.session.lock().await;
        session.apply_restaurants(&cuisine, venues)?;
    }

    spin_wheel(state, WheelKind::Restaurant).await
}

/// POST /api/spin/dish
pub async fn spin_dish(State(state): State<AppState>) -> Result<Json<SpinOutcome>, ApiError> {
    spin_wheel(state, WheelKind::Dish).await
}

/// Begin under the lock, wait without it, complete under it again.
///
/// The wait and completion run on their own task so a client that hangs
/// up mid-spin does not leave the wheel stuck in flight.
async fn spin_wheel(state: AppState, kind: WheelKind) -> Result<Json<SpinOutcome>, ApiError> {
    let (pending, pace) = {
        let mut session = state.session.lock().await;
        (session.begin_spin(kind)?, session.pace())
    };
    let pending = pending.ok_or(ApiError::EmptyWheel(kind))?;

    let task = tokio::spawn(async move {
        let wait = animation_delay(pending.plan.duration_ms, pace);
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        let mut session = state.session.lock().await;
        let outcome = session.complete_spin(kind, pending.id);
        if outcome.is_ok() {
            state.persist(&session);
        }
        outcome
    });

    let outcome = task
        .await
        .map_err(|e| ApiError::Internal(format!("Spin task failed: {e}")))??;
    Ok(Json(outcome))
}

/// GET /api/restaurants?cuisine=..&lat=..&lng=..|city=..
///
/// A plain lookup: the session's wheels are not touched. Without a
/// location in the query the session's own location is used.
pub async fn get_restaurants(
    State(state): State<AppState>,
    Query(query): Query<RestaurantQuery>,
) -> Result<Json<RestaurantsResponse>, ApiError> {
    let cuisine = query.cuisine.trim().to_string();
    if cuisine.is_empty() {
        return Err(ApiError::Unprocessable("cuisine must not be empty".into()));
    }

    let requested = query.location()?;
    let (location, finder) = {
        let session = state.session.lock().await;
        (
            requested.unwrap_or_else(|| session.search_location()),
            session.finder(),
        )
    };

    let venues = finder.fetch_venues(&cuisine, &location).await;
    info!(cuisine, %location, count = venues.len(), "Restaurant lookup");

    Ok(Json(RestaurantsResponse {
        cuisine,
        location,
        count: venues.len(),
        venues,
    }))
}

/// POST /api/location
pub async fn set_location(
    State(state): State<AppState>,
    Json(body): Json<LocationRequest>,
) -> Result<Json<SessionState>, ApiError> {
    let mut session = state.session.lock().await;
    session.set_location(body.location)?;
    state.persist(&session);
    Ok(Json(session.state()))
}

/// POST /api/dishes/refresh
///
/// New dish options for the selected cuisine.
pub async fn refresh_dishes(
    State(state): State<AppState>,
) -> Result<Json<SessionState>, ApiError> {
    let mut session = state.session.lock().await;
    session.refresh_dishes()?;
    state.persist(&session);
    Ok(Json(session.state()))
}

/// POST /api/reset
pub async fn reset(State(state): State<AppState>) -> Result<Json<SessionState>, ApiError> {
    let mut session = state.session.lock().await;
    session.reset()?;
    state.persist(&session);
    Ok(Json(session.state()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! HTTP API for driving a roulette session.
//!
//! Serves a small JSON API over one shared session.
//! CORS enabled so a browser front end can call it from another origin.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

pub use routes::{AppState, RouletteState};

/// Bind `host:port` and serve the API until the task is dropped.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind API address {addr}"))?;
    info!(%addr, "API server listening on http://{addr}");

    axum::serve(listener, app).await.context("API server error")?;
    Ok(())
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("*"))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/state", get(routes::get_state))
        .route("/api/spin/cuisine", post(routes::spin_cuisine))
        .route("/api/spin/restaurant", post(routes::spin_restaurant))
        .route("/api/spin/dish", post(routes::spin_dish))
        .route("/api/restaurants", get(routes::get_restaurants))
        .route("/api/location", post(routes::set_location))
        .route("/api/dishes/refresh", post(routes::refresh_dishes))
        .route("/api/reset", post(routes::reset))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::random::ScriptedRandom;
    use crate::session::{RouletteSession, WheelKind};
    use crate::venues::VenueFinder;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let mut cfg = AppConfig::default();
        cfg.wheel.animation_pace = 0.0;
        let finder = Arc::new(VenueFinder::offline(Box::new(ScriptedRandom::constant(0.5))));
        let session = RouletteSession::new(&cfg, finder, Box::new(ScriptedRandom::new(vec![0.0, 0.5])));
        Arc::new(RouletteState::new(session, None))
    }

    async fn send(state: &AppState, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = build_router(state.clone())
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, _) = send(&test_state(), "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_state_endpoint() {
        let (status, json) = send(&test_state(), "GET", "/api/state").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["cuisine"]["labels"].as_array().unwrap().len(), 12);
        assert!(json["selected_cuisine"].is_null());
    }

    #[tokio::test]
    async fn test_spin_cuisine_endpoint() {
        let state = test_state();
        let (status, json) = send(&state, "POST", "/api/spin/cuisine").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["wheel"], "cuisine");
        assert_eq!(json["result"]["winner"]["label"], "Mediterranean");

        let (_, json) = send(&state, "GET", "/api/state").await;
        assert_eq!(json["selected_cuisine"], "Mediterranean");
        assert_eq!(json["dish"]["labels"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_spin_restaurant_requires_cuisine() {
        let (status, json) = send(&test_state(), "POST", "/api/spin/restaurant").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("cuisine"));
    }

    #[tokio::test]
    async fn test_spin_restaurant_loads_venues() {
        let state = test_state();
        send(&state, "POST", "/api/spin/cuisine").await;

        let (status, json) = send(&state, "POST", "/api/spin/restaurant").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["wheel"], "restaurant");
        assert_eq!(json["result"]["winner"]["item"]["cuisine"], "Mediterranean");
        assert_eq!(json["result"]["winner"]["item"]["source"], "static_catalog");
    }

    #[tokio::test]
    async fn test_spin_dish_endpoint() {
        let state = test_state();
        send(&state, "POST", "/api/spin/cuisine").await;
        let (status, json) = send(&state, "POST", "/api/spin/dish").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"]["winner"]["item"]["cuisine"], "Mediterranean");
    }

    #[tokio::test]
    async fn test_concurrent_spin_conflicts() {
        let state = test_state();
        state
            .session
            .lock()
            .await
            .begin_spin(WheelKind::Cuisine)
            .unwrap();

        let (status, _) = send(&state, "POST", "/api/spin/cuisine").await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_restaurants_by_city() {
        let (status, json) = send(
            &test_state(),
            "GET",
            "/api/restaurants?cuisine=Italian&city=San%20Francisco",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 3);
        assert_eq!(json["location"]["city"], "San Francisco");
        for venue in json["venues"].as_array().unwrap() {
            assert!(venue["rating"].as_f64().unwrap() >= 3.5);
        }
    }

    #[tokio::test]
    async fn test_restaurants_default_location() {
        let (status, json) = send(&test_state(), "GET", "/api/restaurants?cuisine=Thai").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["location"]["city"], "New York");
    }

    #[tokio::test]
    async fn test_restaurants_bad_query() {
        let state = test_state();
        let (status, _) = send(&state, "GET", "/api/restaurants?cuisine=Thai&lat=1.0").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&state, "GET", "/api/restaurants?cuisine=%20").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&state, "GET", "/api/restaurants").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_set_location_endpoint() {
        let state = test_state();
        let resp = build_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/location")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"location":{"lat":40.7,"lng":-74.0}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let (_, json) = send(&state, "GET", "/api/state").await;
        assert_eq!(json["location"]["lat"], 40.7);
    }

    #[tokio::test]
    async fn test_reset_endpoint() {
        let state = test_state();
        send(&state, "POST", "/api/spin/cuisine").await;
        let (status, json) = send(&state, "POST", "/api/reset").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["selected_cuisine"].is_null());
        assert_eq!(json["cuisine"]["history"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_mid_spin_conflicts() {
        let state = test_state();
        let pending = state
            .session
            .lock()
            .await
            .begin_spin(WheelKind::Cuisine)
            .unwrap()
            .unwrap();

        let (status, json) = send(&state, "POST", "/api/reset").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(json["error"].is_string());

        // The wheel is still in flight, so a second spin is refused too.
        let (status, _) = send(&state, "POST", "/api/spin/cuisine").await;
        assert_eq!(status, StatusCode::CONFLICT);

        let mut session = state.session.lock().await;
        let outcome = session.complete_spin(WheelKind::Cuisine, pending.id).unwrap();
        assert_eq!(outcome.plan(), pending.plan);
    }

    #[tokio::test]
    async fn test_refresh_dishes_endpoint() {
        let state = test_state();
        let (status, json) = send(&state, "POST", "/api/dishes/refresh").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("cuisine"));

        send(&state, "POST", "/api/spin/cuisine").await;
        send(&state, "POST", "/api/spin/dish").await;

        let (status, json) = send(&state, "POST", "/api/dishes/refresh").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["selected_cuisine"], "Mediterranean");
        assert_eq!(json["dish"]["labels"].as_array().unwrap().len(), 8);
        assert_eq!(json["dish"]["rotation"], 0.0);
        assert!(json["dish"]["winner"].is_null());
        assert_eq!(json["dish"]["history"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let resp = build_router(test_state())
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/spin/cuisine")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            HeaderValue::from_static("*")
        );
    }
}

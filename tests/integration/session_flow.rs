//! Full rounds through `RouletteSession`, persistence and the HTTP API.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use roulette::config::AppConfig;
use roulette::dashboard::{build_router, RouletteState};
use roulette::random::{ScriptedRandom, SeededRandom};
use roulette::session::RouletteSession;
use roulette::storage;
use roulette::types::{Location, VenueSource};
use roulette::venues::VenueFinder;

use crate::providers::{google, yelp, yelp_ok_body};

fn instant_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.wheel.animation_pace = 0.0;
    cfg
}

fn temp_path() -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("roulette_it_state_{}.json", uuid::Uuid::new_v4()));
    p.to_string_lossy().to_string()
}

async fn yelp_only_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/api/place/textsearch/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/businesses/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(yelp_ok_body()))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn round_with_failing_google_lands_on_yelp_venue() {
    let server = yelp_only_server().await;
    let finder = Arc::new(VenueFinder::new(
        vec![Box::new(google(&server)), Box::new(yelp(&server))],
        Box::new(ScriptedRandom::constant(0.5)),
    ));
    let mut session = RouletteSession::new(
        &instant_config(),
        finder,
        Box::new(SeededRandom::with_seed(99)),
    );
    session
        .set_location(Some(Location::city("San Francisco")))
        .unwrap();

    let round = session.play_round().await.unwrap();

    assert_eq!(round.venues_found, 1);
    let pick = round.restaurant.expect("one venue should be picked");
    assert_eq!(pick.winner.item.source, VenueSource::Yelp);
    // Yelp venues are tagged with the cuisine that was searched for.
    assert_eq!(pick.winner.item.cuisine, round.cuisine.winner.label);
}

#[tokio::test]
async fn seeded_sessions_are_reproducible() {
    let play = || async {
        let finder = Arc::new(VenueFinder::offline(Box::new(SeededRandom::with_seed(5))));
        let mut session = RouletteSession::new(
            &instant_config(),
            finder,
            Box::new(SeededRandom::with_seed(5)),
        );
        let round = session.play_round().await.unwrap();
        let dish = session.spin_dish().await.unwrap().unwrap();
        (
            round.cuisine.winner.label,
            round.restaurant.map(|r| r.winner.id),
            dish.winner.id,
        )
    };

    assert_eq!(play().await, play().await);
}

#[tokio::test]
async fn snapshot_survives_a_restart() {
    let path = temp_path();

    let finder = Arc::new(VenueFinder::offline(Box::new(SeededRandom::with_seed(1))));
    let mut first = RouletteSession::new(
        &instant_config(),
        finder.clone(),
        Box::new(SeededRandom::with_seed(1)),
    );
    first
        .set_location(Some(Location::coordinates(47.6062, -122.3321)))
        .unwrap();
    first.play_round().await.unwrap();
    storage::save_snapshot(&first.snapshot(), Some(&path)).unwrap();

    let snapshot = storage::load_snapshot(Some(&path)).unwrap().unwrap();
    let mut second = RouletteSession::new(
        &instant_config(),
        finder,
        Box::new(SeededRandom::with_seed(2)),
    );
    second.restore(snapshot).unwrap();

    assert_eq!(second.selected_cuisine(), first.selected_cuisine());
    assert_eq!(second.venues(), first.venues());
    assert_eq!(second.location(), first.location());
    assert_eq!(second.restaurant_wheel().history().count(), 1);

    // The restored restaurant wheel can be spun straight away.
    assert!(second.spin_restaurant().await.unwrap().is_some());

    storage::delete_snapshot(Some(&path)).unwrap();
}

#[tokio::test]
async fn api_round_trip_persists_state() {
    let server = yelp_only_server().await;
    let path = temp_path();

    let finder = Arc::new(VenueFinder::new(
        vec![Box::new(google(&server)), Box::new(yelp(&server))],
        Box::new(ScriptedRandom::constant(0.5)),
    ));
    let session = RouletteSession::new(
        &instant_config(),
        finder,
        Box::new(ScriptedRandom::new(vec![0.0, 0.5])),
    );
    let state = Arc::new(RouletteState::new(session, Some(path.clone())));

    for uri in ["/api/spin/cuisine", "/api/spin/restaurant"] {
        let resp = build_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    }

    let saved = storage::load_snapshot(Some(&path)).unwrap().unwrap();
    assert_eq!(saved.selected_cuisine.as_deref(), Some("Mediterranean"));
    assert_eq!(saved.venues.len(), 1);
    assert_eq!(saved.venues[0].source, VenueSource::Yelp);
    assert_eq!(saved.restaurant_history.len(), 1);

    storage::delete_snapshot(Some(&path)).unwrap();
}

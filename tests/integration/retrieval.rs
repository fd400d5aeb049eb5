//! Tier fallback through `VenueFinder`.

use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use roulette::config::ProvidersConfig;
use roulette::random::{ScriptedRandom, SeededRandom};
use roulette::types::{Location, VenueSource};
use roulette::venues::catalog::{StaticCatalog, MIN_RATING};
use roulette::venues::VenueFinder;

use crate::providers::{google, google_ok_body, yelp, yelp_ok_body};

const GOOGLE_PATH: &str = "/maps/api/place/textsearch/json";
const YELP_PATH: &str = "/v3/businesses/search";

fn finder_for(server: &MockServer) -> VenueFinder {
    VenueFinder::new(
        vec![Box::new(google(server)), Box::new(yelp(server))],
        Box::new(ScriptedRandom::constant(0.5)),
    )
}

#[tokio::test]
async fn first_tier_success_skips_the_rest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_ok_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(YELP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(yelp_ok_body()))
        .expect(0)
        .mount(&server)
        .await;

    let venues = finder_for(&server)
        .fetch_venues("Italian", &Location::coordinates(37.7749, -122.4194))
        .await;
    assert!(venues.iter().all(|v| v.source == VenueSource::GooglePlaces));
}

#[tokio::test]
async fn google_failure_falls_through_to_yelp() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(YELP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(yelp_ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let venues = finder_for(&server)
        .fetch_venues("Italian", &Location::city("San Francisco"))
        .await;

    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].source, VenueSource::Yelp);
    assert_eq!(venues[0].name, "Nonna's Kitchen");
}

#[tokio::test]
async fn both_providers_down_uses_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let venues = finder_for(&server)
        .fetch_venues("Italian", &Location::city("San Francisco"))
        .await;

    assert_eq!(venues.len(), 3);
    assert!(venues.iter().all(|v| v.source == VenueSource::StaticCatalog));
}

#[tokio::test]
async fn slow_provider_times_out_and_falls_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(google_ok_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(YELP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(yelp_ok_body()))
        .mount(&server)
        .await;

    let slow_google = roulette::venues::google::GooglePlacesProvider::with_base_url(
        Some(secrecy::SecretString::new("g-key".into())),
        Duration::from_millis(200),
        &server.uri(),
    )
    .unwrap();
    let finder = VenueFinder::new(
        vec![Box::new(slow_google), Box::new(yelp(&server))],
        Box::new(ScriptedRandom::constant(0.5)),
    );

    let venues = finder.fetch_venues("Italian", &Location::city("Boston")).await;
    assert_eq!(venues[0].source, VenueSource::Yelp);
    assert!(!finder.is_fetching());
}

#[tokio::test]
async fn no_credentials_italian_san_francisco_returns_catalog() {
    let cfg = ProvidersConfig {
        google_api_key_env: Some("ROULETTE_IT_UNSET_GOOGLE_KEY".into()),
        yelp_api_key_env: Some("ROULETTE_IT_UNSET_YELP_KEY".into()),
        ..ProvidersConfig::default()
    };
    let finder = VenueFinder::from_config(&cfg, Box::new(SeededRandom::with_seed(11))).unwrap();
    assert_eq!(finder.tier_names(), vec!["google_places", "yelp"]);

    let venues = finder
        .fetch_venues("Italian", &Location::city("San Francisco"))
        .await;

    assert!((2..=3).contains(&venues.len()));
    for v in &venues {
        assert_eq!(v.cuisine, "Italian");
        assert_eq!(v.source, VenueSource::StaticCatalog);
        assert!(v.rating >= MIN_RATING, "{} rated {}", v.name, v.rating);
    }
}

#[tokio::test]
async fn configured_keys_come_from_named_env_vars() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(YELP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(yelp_ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    std::env::set_var("ROULETTE_IT_YELP_KEY_SET", "y-key");
    let cfg = ProvidersConfig {
        google_api_key_env: None,
        yelp_api_key_env: Some("ROULETTE_IT_YELP_KEY_SET".into()),
        google_base_url: Some(server.uri()),
        yelp_base_url: Some(server.uri()),
        request_timeout_secs: 5,
    };
    let finder = VenueFinder::from_config(&cfg, Box::new(SeededRandom::with_seed(3))).unwrap();

    let venues = finder.fetch_venues("Italian", &Location::city("Boston")).await;
    assert_eq!(venues[0].source, VenueSource::Yelp);
}

async fn assert_fetches_within_jitter(cuisine: &str, here: Location) {
    let finder = VenueFinder::offline(Box::new(SeededRandom::with_seed(2024)));
    let catalog = StaticCatalog::new();

    for _ in 0..2 {
        let venues = finder.fetch_venues(cuisine, &here).await;
        assert_eq!(venues.len(), catalog.base_entries(cuisine).count());

        for (venue, base) in venues.iter().zip(catalog.base_entries(cuisine)) {
            assert_eq!(venue.id, base.id);
            assert_eq!(venue.cuisine, cuisine);
            assert!(venue.rating >= MIN_RATING);
            assert!((venue.rating - base.rating).abs() <= 0.2 + 1e-9);

            let miles = venue.distance.miles().expect("catalog distances are known");
            assert!(miles >= 0.1);
            // ±0.25 jitter, then rounded to a tenth.
            assert!((miles - base.distance_miles).abs() <= 0.3 + 1e-9);
        }
    }
}

#[tokio::test]
async fn consecutive_coordinate_fetches_stay_within_jitter() {
    assert_fetches_within_jitter("Thai", Location::coordinates(40.7128, -74.0060)).await;
}

#[tokio::test]
async fn italian_at_san_francisco_coordinates_stays_within_jitter() {
    assert_fetches_within_jitter("Italian", Location::coordinates(37.7749, -122.4194)).await;
}

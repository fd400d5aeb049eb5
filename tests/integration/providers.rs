//! Google Places and Yelp providers against a mock HTTP server.

use secrecy::SecretString;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use roulette::types::{Distance, Location, ProviderError, VenueSource};
use roulette::venues::google::GooglePlacesProvider;
use roulette::venues::yelp::YelpProvider;
use roulette::venues::VenueProvider;

const GOOGLE_PATH: &str = "/maps/api/place/textsearch/json";
const YELP_PATH: &str = "/v3/businesses/search";

fn key(value: &str) -> Option<SecretString> {
    Some(SecretString::new(value.to_string()))
}

pub fn google(server: &MockServer) -> GooglePlacesProvider {
    GooglePlacesProvider::with_base_url(key("g-key"), Duration::from_secs(5), &server.uri())
        .expect("failed to build Google provider")
}

pub fn yelp(server: &MockServer) -> YelpProvider {
    YelpProvider::with_base_url(key("y-key"), Duration::from_secs(5), &server.uri())
        .expect("failed to build Yelp provider")
}

pub fn google_ok_body() -> serde_json::Value {
    json!({
        "status": "OK",
        "results": [
            {
                "place_id": "g-1",
                "name": "Trattoria Nord",
                "rating": 4.7,
                "price_level": 2,
                "geometry": { "location": { "lat": 37.7849, "lng": -122.4194 } },
                "formatted_address": "10 North Beach Ave",
                "opening_hours": { "open_now": true }
            },
            {
                "name": "Pasta Corner",
                "vicinity": "Corner of 3rd and Main"
            }
        ]
    })
}

pub fn yelp_ok_body() -> serde_json::Value {
    json!({
        "businesses": [
            {
                "id": "y-1",
                "name": "Nonna's Kitchen",
                "rating": 4.4,
                "price": "$$",
                "distance": 804.67,
                "location": { "address1": "5 Elm St", "city": "San Francisco" },
                "phone": "+14155550100",
                "url": "https://yelp.example/nonna",
                "is_closed": false,
                "categories": [ { "title": "Italian" } ]
            }
        ]
    })
}

// ---------------------------------------------------------------------------
// Google Places
// ---------------------------------------------------------------------------

#[tokio::test]
async fn google_maps_results_and_computes_distance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .and(query_param("query", "Italian restaurants"))
        .and(query_param("location", "37.7749,-122.4194"))
        .and(query_param("radius", "5000"))
        .and(query_param("key", "g-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let venues = google(&server)
        .search("Italian", &Location::coordinates(37.7749, -122.4194))
        .await
        .expect("search should succeed");

    assert_eq!(venues.len(), 2);
    assert_eq!(venues[0].id, "g-1");
    assert_eq!(venues[0].distance, Distance::Miles(0.7));
    assert_eq!(venues[0].source, VenueSource::GooglePlaces);
    assert_eq!(venues[1].id, "google-1");
    assert_eq!(venues[1].rating, 4.0);
    assert_eq!(venues[1].price_tier, 2);
    assert_eq!(venues[1].distance, Distance::Unknown);
}

#[tokio::test]
async fn google_city_search_puts_city_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .and(query_param("query", "Thai restaurants in Portland"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let venues = google(&server)
        .search("Thai", &Location::city("Portland"))
        .await
        .expect("search should succeed");
    assert_eq!(venues.len(), 2);
}

#[tokio::test]
async fn google_zero_results_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;

    let err = google(&server)
        .search("Thai", &Location::city("Nowhere"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Api { .. }), "got {err:?}");
}

#[tokio::test]
async fn google_http_error_is_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = google(&server)
        .search("Thai", &Location::city("Portland"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ProviderError::Status { status: 500, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn google_caps_results_at_ten() {
    let server = MockServer::start().await;
    let results: Vec<_> = (0..15)
        .map(|i| json!({ "place_id": format!("p{i}"), "name": format!("Place {i}") }))
        .collect();
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "OK", "results": results })),
        )
        .mount(&server)
        .await;

    let venues = google(&server)
        .search("Pizza", &Location::city("Chicago"))
        .await
        .expect("search should succeed");
    assert_eq!(venues.len(), 10);
}

// ---------------------------------------------------------------------------
// Yelp
// ---------------------------------------------------------------------------

#[tokio::test]
async fn yelp_sends_bearer_and_maps_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(YELP_PATH))
        .and(header("authorization", "Bearer y-key"))
        .and(query_param("term", "Italian restaurants"))
        .and(query_param("location", "San Francisco"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(yelp_ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let venues = yelp(&server)
        .search("Italian", &Location::city("San Francisco"))
        .await
        .expect("search should succeed");

    assert_eq!(venues.len(), 1);
    let v = &venues[0];
    assert_eq!(v.name, "Nonna's Kitchen");
    assert_eq!(v.price_tier, 2);
    assert_eq!(v.distance, Distance::Miles(0.5));
    assert_eq!(v.address, "5 Elm St, San Francisco");
    assert_eq!(v.source, VenueSource::Yelp);
}

#[tokio::test]
async fn yelp_malformed_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(YELP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = yelp(&server)
        .search("Thai", &Location::city("Austin"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Malformed { .. }), "got {err:?}");
}

#[tokio::test]
async fn yelp_unauthorized_is_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(YELP_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = yelp(&server)
        .search("Thai", &Location::city("Austin"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ProviderError::Status { status: 401, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn provider_without_key_never_calls_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider =
        YelpProvider::with_base_url(None, Duration::from_secs(5), &server.uri()).unwrap();
    assert!(!provider.is_configured());
    let err = provider
        .search("Thai", &Location::city("Austin"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Unconfigured("yelp")));
}

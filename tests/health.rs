//! Composite health aggregation tests against mocked probe endpoints.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bepelias::health::{self, HealthStatus};
use bepelias::pelias::PeliasClient;

fn client(server: &MockServer) -> PeliasClient {
    PeliasClient::new(&server.uri(), &server.uri()).expect("client construction should not fail")
}

fn mock_geocode_ok() -> Mock {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "FeatureCollection",
            "features": [{ "type": "Feature" }]
        })))
}

#[tokio::test]
async fn up_when_both_probes_answer_well() {
    let server = MockServer::start().await;

    mock_geocode_ok().mount(&server).await;

    Mock::given(method("GET"))
        .and(path("/search/geojson"))
        .and(query_param("number", "20"))
        .and(query_param("street", "Avenue Fonsny"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [4.33844, 50.83582] }
        })))
        .mount(&server)
        .await;

    let report = health::check(&client(&server)).await;
    assert_eq!(report.status, HealthStatus::Up);
    assert!(report.details.is_none());
}

#[tokio::test]
async fn down_when_geocoder_does_not_answer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    // The interpolation probe must not even be consulted.
    Mock::given(method("GET"))
        .and(path("/search/geojson"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"geometry": {}})))
        .expect(0)
        .mount(&server)
        .await;

    let report = health::check(&client(&server)).await;
    assert_eq!(report.status, HealthStatus::Down);
    assert_eq!(
        report.details.unwrap().error_message,
        "Pelias server does not answer"
    );
}

#[tokio::test]
async fn down_when_geocoder_answer_is_not_a_geocode_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "hello"})))
        .mount(&server)
        .await;

    let report = health::check(&client(&server)).await;
    assert_eq!(report.status, HealthStatus::Down);
    assert_eq!(
        report.details.unwrap().error_message,
        "Pelias server answers, but gives an unexpected answer"
    );
}

#[tokio::test]
async fn degraded_when_interpolation_does_not_answer() {
    let server = MockServer::start().await;

    mock_geocode_ok().mount(&server).await;

    Mock::given(method("GET"))
        .and(path("/search/geojson"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let report = health::check(&client(&server)).await;
    assert_eq!(report.status, HealthStatus::Degraded);
    assert_eq!(
        report.details.unwrap().error_message,
        "Interpolation server does not answer"
    );
}

#[tokio::test]
async fn degraded_when_interpolation_answer_lacks_geometry() {
    let server = MockServer::start().await;

    mock_geocode_ok().mount(&server).await;

    Mock::given(method("GET"))
        .and(path("/search/geojson"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"type": "Feature"})))
        .mount(&server)
        .await;

    let report = health::check(&client(&server)).await;
    assert_eq!(report.status, HealthStatus::Degraded);
    assert_eq!(
        report.details.unwrap().error_message,
        "Interpolation server answers, but gives an unexpected answer"
    );
}

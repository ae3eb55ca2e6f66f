//! BeSt-id and city resolution tests against a mocked Elasticsearch index.

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bepelias::elasticsearch::EsClient;
use bepelias::resolve;
use bepelias::GatewayError;

fn client(server: &MockServer) -> EsClient {
    EsClient::new(&server.uri(), "pelias").expect("client construction should not fail")
}

fn es_response(hits: Vec<Value>) -> Value {
    json!({
        "took": 3,
        "hits": {
            "total": { "value": hits.len() },
            "hits": hits
        }
    })
}

fn locality_hit(best: &Value, name: &str) -> Value {
    json!({
        "_index": "pelias",
        "_source": {
            "layer": "locality",
            "addendum": { "best": best.to_string() },
            "center_point": { "lat": 50.8358677, "lon": 4.3385087 },
            "name": { "default": name }
        }
    })
}

#[tokio::test]
async fn resolve_by_id_issues_a_layer_and_prefix_query() {
    let server = MockServer::start().await;

    let best = json!({
        "best_id": "https://databrussels.be/id/address/219307/4",
        "status": "current"
    });

    Mock::given(method("POST"))
        .and(path("/pelias/_search"))
        .and(body_partial_json(json!({
            "query": {
                "bool": {
                    "must": [
                        { "term": { "layer": "address" } },
                        { "prefix": { "source_id": {
                            "value": "https://databrussels.be/id/address/219307/4"
                        } } }
                    ]
                }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(es_response(vec![json!({
                "_index": "pelias",
                "_source": {
                    "layer": "address",
                    "addendum": { "best": best.to_string() },
                    "center_point": { "lat": 50.8358677, "lon": 4.3385087 },
                    "name": { "default": "Avenue Fonsny 20" }
                }
            })])),
        )
        .expect(1)
        .mount(&server)
        .await;

    // URL-encoded form, as received on the wire.
    let records = resolve::resolve_by_id(
        &client(&server),
        "https%3A%2F%2Fdatabrussels.be%2Fid%2Faddress%2F219307%2F4",
    )
    .await
    .expect("id resolution should succeed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].properties.addendum.best, best);
    assert_eq!(records[0].name["default"], "Avenue Fonsny 20");
}

#[tokio::test]
async fn resolve_by_id_with_no_hits_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pelias/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(es_response(vec![])))
        .mount(&server)
        .await;

    let records =
        resolve::resolve_by_id(&client(&server), "https://databrussels.be/id/address/1/1")
            .await
            .expect("zero hits is a normal outcome");

    assert!(records.is_empty());
}

#[tokio::test]
async fn malformed_id_is_rejected_before_any_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(es_response(vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let err = resolve::resolve_by_id(&client(&server), "219307")
        .await
        .expect_err("malformed ids must never silently return empty");

    assert!(matches!(err, GatewayError::MalformedIdentifier(_)));
}

#[tokio::test]
async fn search_city_deduplicates_identical_documents() {
    let server = MockServer::start().await;

    let best = json!({"postal_info": {"postal_code": "1060"}});

    Mock::given(method("POST"))
        .and(path("/pelias/_search"))
        .and(body_partial_json(json!({
            "query": { "bool": { "must": [
                { "term": { "layer": "locality" } },
                { "term": { "address_parts.zip": "1060" } }
            ] } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(es_response(vec![
            locality_hit(&best, "Saint-Gilles"),
            locality_hit(&best, "Saint-Gilles"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let records = resolve::search_city(&client(&server), Some("1060"), None)
        .await
        .expect("city search should succeed");

    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn search_city_skips_hits_without_a_best_payload() {
    let server = MockServer::start().await;

    let best = json!({"postal_info": {"postal_code": "1060"}});
    let bare_hit = json!({
        "_index": "pelias",
        "_source": { "layer": "locality", "name": { "default": "Saint-Gilles" } }
    });

    Mock::given(method("POST"))
        .and(path("/pelias/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(es_response(vec![
            bare_hit,
            locality_hit(&best, "Saint-Gilles"),
        ])))
        .mount(&server)
        .await;

    let records = resolve::search_city(&client(&server), Some("1060"), Some("Saint-Gilles"))
        .await
        .expect("city search should succeed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].properties.addendum.best, best);
}

#[tokio::test]
async fn missing_index_is_an_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pelias/_search"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "type": "index_not_found_exception" }
        })))
        .mount(&server)
        .await;

    let records = resolve::search_city(&client(&server), Some("1060"), None)
        .await
        .expect("a missing index is not a failure");

    assert!(records.is_empty());
}

#[tokio::test]
async fn unreachable_index_is_a_connection_failure() {
    // Nothing listens on this port.
    let es = EsClient::new("http://127.0.0.1:9", "pelias").expect("client construction");

    let err = resolve::search_city(&es, Some("1060"), None)
        .await
        .expect_err("connection failure must surface");

    assert!(matches!(err, GatewayError::SearchIndexUnavailable(_)));
}

//! Integration tests for `DeliveryClient` using wiremock HTTP mocks.

use std::sync::atomic::AtomicBool;

use relaypick_client::{failure_action, ClientError, DeliveryClient, FailureAction, FeeRequest};
use relaypick_core::{CartItem, Location, ModeId};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> DeliveryClient {
    DeliveryClient::with_base_url(base_url, 5, "relaypick-test/0.1", Some("test-token"))
        .expect("client construction should not fail")
}

fn relay_point(id: i64) -> Location {
    Location {
        id,
        name: format!("Relais {id}"),
        address: None,
        city: Some("Tunis".to_owned()),
        region: Some("Tunis".to_owned()),
        latitude: Some(36.8),
        longitude: Some(10.18),
    }
}

fn fee_request(store_id: i64) -> FeeRequest {
    FeeRequest::for_location(
        &relay_point(store_id),
        Decimal::new(505, 1),
        ModeId::Number(3),
        &[CartItem {
            article_id: 12,
            quantity: 2,
        }],
    )
}

// ---------------------------------------------------------------------------
// Directory endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_relay_points_returns_parsed_locations() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/relay-points"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": 1, "name": "Relais Lac", "city": "Tunis", "gouvernorat": "Tunis",
                 "latitude": "36.84", "longitude": "10.27"},
                {"id": 2, "name": "Relais Sousse", "latitude": null, "longitude": null}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let points = client
        .list_relay_points()
        .await
        .expect("should parse relay points");

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].name, "Relais Lac");
    assert_eq!(points[0].latitude, Some(36.84));
    assert!(points[1].city.is_none());
}

#[tokio::test]
async fn non_numeric_coordinates_do_not_drop_the_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/relay-points"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": 1, "name": "Relais Lac", "latitude": true, "longitude": {"lng": 10.2}},
                {"id": 2, "name": "Relais Sfax", "latitude": [34.7], "longitude": "10.76"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let points = test_client(&server.uri())
        .list_relay_points()
        .await
        .expect("bad coordinates should not fail the list");
    assert_eq!(points.len(), 2);
    assert!(points[0].latitude.is_none());
    assert!(points[0].longitude.is_none());
    assert!(points[1].latitude.is_none());
    assert_eq!(points[1].longitude, Some(10.76));
}

#[tokio::test]
async fn list_stores_uses_stores_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": 10, "name": "Magasin Centre Ville"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stores = test_client(&server.uri())
        .list_stores()
        .await
        .expect("should parse stores");
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].id, 10);
}

#[tokio::test]
async fn unsuccessful_envelope_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "data": []
        })))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).list_stores().await;
    assert!(
        matches!(result, Err(ClientError::Unsuccessful(_))),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn non_2xx_directory_response_carries_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/relay-points"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .list_relay_points()
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn list_delivery_modes_accepts_nom_labels() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/delivery-modes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": 1, "nom": "Livraison à domicile"},
                {"id": 4, "code": "point_relais", "nom": "Point Relais"}
            ]
        })))
        .mount(&server)
        .await;

    let modes = test_client(&server.uri())
        .list_delivery_modes()
        .await
        .expect("should parse modes");
    assert_eq!(modes.len(), 2);
    assert_eq!(relaypick_core::relay_pricing_mode(&modes), ModeId::Number(4));
}

// ---------------------------------------------------------------------------
// Fee endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn calculate_fee_posts_wire_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/delivery-fees/calculate"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "delivery_address": {"ville": "Tunis", "gouvernorat": "Tunis"},
            "cart_total": 50.5,
            "mode_livraison_id": 3,
            "store_id": 7,
            "total_weight": 0,
            "cart_items": [{"article_id": 12, "quantity": 2}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"frais_livraison": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let response = test_client(&server.uri())
        .calculate_fee(&fee_request(7))
        .await
        .expect("fee call should succeed");
    assert_eq!(response.fee(), Some(Decimal::from(7)));
}

#[tokio::test]
async fn calculate_fee_reads_unparseable_success_body_as_no_fee() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/delivery-fees/calculate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/delivery-fees/calculate"))
        .and(body_partial_json(json!({"store_id": 8})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["not", "an", "object"])))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let empty = client
        .calculate_fee(&fee_request(7))
        .await
        .expect("empty 2xx body should not be an error");
    assert_eq!(empty.fee(), None);
    let array = client
        .calculate_fee(&fee_request(8))
        .await
        .expect("non-object 2xx body should not be an error");
    assert_eq!(array.fee(), None);
}

#[tokio::test]
async fn calculate_fee_without_token_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"frais_livraison": 7})))
        .expect(0)
        .mount(&server)
        .await;

    let client = DeliveryClient::with_base_url(&server.uri(), 5, "relaypick-test/0.1", None)
        .expect("client construction should not fail");
    let err = client.calculate_fee(&fee_request(7)).await.unwrap_err();
    assert!(matches!(err, ClientError::MissingToken));
    assert_eq!(failure_action(&err), FailureAction::FailSession);
}

#[tokio::test]
async fn quote_fee_retries_without_store_on_422() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/delivery-fees/calculate"))
        .and(body_partial_json(json!({"store_id": 7})))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"message": "no rule"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/delivery-fees/calculate"))
        .and(body_partial_json(json!({"store_id": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"frais_livraison": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let quote = test_client(&server.uri())
        .quote_fee(&fee_request(7), &AtomicBool::new(false))
        .await
        .expect("fallback should succeed");
    assert_eq!(quote.fee, Some(Decimal::ZERO));
    assert!(quote.used_fallback);

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
    let mut first: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(second["store_id"], serde_json::Value::Null);
    first["store_id"] = serde_json::Value::Null;
    assert_eq!(first, second, "fallback must repeat every other field");
}

#[tokio::test]
async fn quote_fee_retries_on_400_and_reads_legacy_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"store_id": 7})))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"store_id": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"delivery_fee": 8.5})))
        .expect(1)
        .mount(&server)
        .await;

    let quote = test_client(&server.uri())
        .quote_fee(&fee_request(7), &AtomicBool::new(false))
        .await
        .expect("fallback should succeed");
    assert_eq!(quote.fee, Some(Decimal::new(85, 1)));
}

#[tokio::test]
async fn quote_fee_does_not_retry_401() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .quote_fee(&fee_request(7), &AtomicBool::new(false))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(failure_action(&err), FailureAction::FailSession);
}

#[tokio::test]
async fn quote_fee_does_not_retry_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .quote_fee(&fee_request(7), &AtomicBool::new(false))
        .await
        .unwrap_err();
    assert_eq!(failure_action(&err), FailureAction::FailPermanent);
}

#[tokio::test]
async fn quote_fee_skips_fallback_once_halted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .quote_fee(&fee_request(7), &AtomicBool::new(true))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn fallback_failure_is_returned() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"store_id": 7})))
        .respond_with(ResponseTemplate::new(422))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"store_id": null})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .quote_fee(&fee_request(7), &AtomicBool::new(false))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
}

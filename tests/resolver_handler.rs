//! Resolver handler behaviour against mock geocoding and weather providers.

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use cep_relay::http::ErrorBody;
use cep_relay::{NormalizedWeatherResponse, RelayConfig, RelayServer};

mod common;

use common::{MockUpstream, TRACEPARENT, TRACE_ID};

const GUARULHOS: &str = r#"{"cep": "07096-240", "logradouro": "Rua Um", "localidade": "Guarulhos", "uf": "SP"}"#;
const NOT_FOUND: &str = r#"{"erro": true}"#;
const CURRENT: &str = r#"{"location": {"name": "Guarulhos"}, "current": {"temp_C": 27.8, "temp_F": 82}}"#;

fn resolver(config: &RelayConfig) -> axum::Router {
    RelayServer::resolver(config, common::telemetry())
        .unwrap()
        .router()
}

async fn providers(geocoding: &'static str, weather: &'static str) -> (MockUpstream, MockUpstream) {
    (
        MockUpstream::start(200, geocoding).await,
        MockUpstream::start(200, weather).await,
    )
}

#[tokio::test]
async fn test_resolves_and_converts() {
    let (geo, wx) = providers(GUARULHOS, CURRENT).await;
    let router = resolver(&common::resolver_config(geo.addr, wx.addr));

    let (status, headers, bytes) =
        common::send(router, common::post_json("/", r#"{"cep": "07096240"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[CONTENT_TYPE], "application/json");
    let weather: NormalizedWeatherResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        weather,
        NormalizedWeatherResponse {
            temp_c: 27.8,
            temp_f: 82.0,
            temp_k: 300.8,
        }
    );

    assert_eq!(geo.calls()[0].uri, "/ws/07096240/json/");
    assert_eq!(geo.calls()[0].method, "GET");
    assert_eq!(
        wx.calls()[0].uri,
        "/v1/current.json?key=test-key&q=Guarulhos&aqi=no"
    );
}

#[tokio::test]
async fn test_query_binding_matches_post() {
    let (geo, wx) = providers(GUARULHOS, CURRENT).await;
    let router = resolver(&common::resolver_config(geo.addr, wx.addr));

    let request = Request::builder()
        .uri("/weather?cep=07096240")
        .body(Body::empty())
        .unwrap();
    let (status, _, bytes) = common::send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    let weather: NormalizedWeatherResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(weather.temp_k, 300.8);
}

#[tokio::test]
async fn test_empty_locality_is_not_found() {
    let (geo, wx) = providers(NOT_FOUND, CURRENT).await;
    let router = resolver(&common::resolver_config(geo.addr, wx.addr));

    let (status, headers, bytes) =
        common::send(router, common::post_json("/", r#"{"cep": "00000000"}"#)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(headers[CONTENT_TYPE], "application/json");
    assert!(serde_json::from_slice::<NormalizedWeatherResponse>(&bytes).is_err());
    let error: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error.message, "can not find zipcode");
    assert_eq!(wx.call_count(), 0);
}

#[tokio::test]
async fn test_unreachable_weather_is_internal_error() {
    let geo = MockUpstream::start(200, GUARULHOS).await;
    let router = resolver(&common::resolver_config(geo.addr, common::closed_addr()));

    let (status, _, bytes) =
        common::send(router, common::post_json("/", r#"{"cep": "07096240"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(serde_json::from_slice::<NormalizedWeatherResponse>(&bytes).is_err());
}

#[tokio::test]
async fn test_weather_error_payload_is_internal_error() {
    let (geo, wx) = providers(
        GUARULHOS,
        r#"{"error": {"code": 2006, "message": "API key is invalid."}}"#,
    )
    .await;
    let router = resolver(&common::resolver_config(geo.addr, wx.addr));

    let (status, _, bytes) =
        common::send(router, common::post_json("/", r#"{"cep": "07096240"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error.message, "can not find current weather for the given location");
    assert_eq!(wx.call_count(), 1);
}

#[tokio::test]
async fn test_unreachable_geocoding_is_not_found() {
    let wx = MockUpstream::start(200, CURRENT).await;
    let router = resolver(&common::resolver_config(common::closed_addr(), wx.addr));

    let (status, _, _) =
        common::send(router, common::post_json("/", r#"{"cep": "07096240"}"#)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(wx.call_count(), 0);
}

#[tokio::test]
async fn test_undecodable_geocoding_is_internal_error() {
    let (geo, wx) = providers("<html>Bad Request</html>", CURRENT).await;
    let router = resolver(&common::resolver_config(geo.addr, wx.addr));

    let (status, _, bytes) =
        common::send(router, common::post_json("/", r#"{"cep": "07096240"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error.message, "internal error");
    assert_eq!(wx.call_count(), 0);
}

#[tokio::test]
async fn test_trace_context_reaches_both_providers() {
    let (geo, wx) = providers(GUARULHOS, CURRENT).await;
    let router = resolver(&common::resolver_config(geo.addr, wx.addr));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("traceparent", TRACEPARENT)
        .body(Body::from(r#"{"cep": "07096240"}"#))
        .unwrap();
    let (status, _, _) = common::send(router, request).await;
    assert_eq!(status, StatusCode::OK);

    let prefix = format!("00-{TRACE_ID}-");
    for call in geo.calls().iter().chain(wx.calls().iter()) {
        let traceparent = call.headers["traceparent"].to_str().unwrap();
        assert!(traceparent.starts_with(&prefix), "got {traceparent}");
    }
    // Both calls sit under the same handler span.
    assert_eq!(geo.calls()[0].headers["traceparent"], wx.calls()[0].headers["traceparent"]);
}

#[tokio::test]
async fn test_locality_is_escaped() {
    let (geo, wx) = providers(r#"{"localidade": "São Paulo"}"#, CURRENT).await;
    let router = resolver(&common::resolver_config(geo.addr, wx.addr));

    let (status, _, _) =
        common::send(router, common::post_json("/", r#"{"cep": "01001000"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(wx.calls()[0].uri.contains("q=S%C3%A3o+Paulo&"));
}

#[tokio::test]
async fn test_missing_cep_is_forwarded_empty() {
    let (geo, wx) = providers(NOT_FOUND, CURRENT).await;
    let router = resolver(&common::resolver_config(geo.addr, wx.addr));

    let (status, _, _) = common::send(router, common::post_json("/", "{}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(geo.calls()[0].uri, "/ws//json/");
}

#[tokio::test]
async fn test_non_json_body_is_unprocessable() {
    let (geo, wx) = providers(GUARULHOS, CURRENT).await;
    let router = resolver(&common::resolver_config(geo.addr, wx.addr));

    let (status, _, _) = common::send(router, common::post_json("/", "cep=07096240")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(geo.call_count(), 0);
    assert_eq!(wx.call_count(), 0);
}

#[tokio::test]
async fn test_undecodable_query_is_unprocessable() {
    let (geo, wx) = providers(GUARULHOS, CURRENT).await;
    let router = resolver(&common::resolver_config(geo.addr, wx.addr));

    let request = Request::builder()
        .uri("/weather?cep=1&cep=2")
        .body(Body::empty())
        .unwrap();
    let (status, headers, bytes) = common::send(router, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(headers[CONTENT_TYPE], "application/json");
    let error: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error.message, "invalid zipcode");
    assert_eq!(geo.call_count(), 0);
}

#[tokio::test]
async fn test_blank_locality_is_still_looked_up() {
    let (geo, wx) = providers(r#"{"localidade": " "}"#, CURRENT).await;
    let router = resolver(&common::resolver_config(geo.addr, wx.addr));

    let (status, _, _) =
        common::send(router, common::post_json("/", r#"{"cep": "07096240"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(wx.call_count(), 1);
    assert!(wx.calls()[0].uri.contains("q=+&"));
}

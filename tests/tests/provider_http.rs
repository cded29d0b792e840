//! ipstack provider against a local canned-response HTTP stub.

use enricher_core::Geolocation;
use geoip::{GeoConfig, IpstackProvider};
use integration_tests::fixtures::{serve_http_hang, serve_http_once};

fn config(addr: std::net::SocketAddr, timeout_secs: u64) -> GeoConfig {
    GeoConfig {
        provider: "ipstack".into(),
        api_key: "test-key".into(),
        base_url: format!("http://{}", addr),
        timeout_secs,
    }
}

#[tokio::test]
async fn successful_lookup_maps_payload_fields() {
    let addr = serve_http_once(
        "200 OK",
        r#"{"country_code":"US","region_code":"CA","city":"Mountain View","latitude":37.386,"longitude":-122.084}"#,
    )
    .await;

    let provider = IpstackProvider::new(&config(addr, 5)).unwrap();
    let geo = provider.lookup("8.8.8.8").await.unwrap();

    assert_eq!(
        geo,
        Geolocation::Ok {
            ip: "8.8.8.8".into(),
            country: Some("US".into()),
            region: Some("CA".into()),
            city: Some("Mountain View".into()),
            latitude: Some(37.386),
            longitude: Some(-122.084),
            provider: "ipstack".into(),
        }
    );
}

#[tokio::test]
async fn partial_payload_still_maps_to_ok() {
    let addr = serve_http_once("200 OK", r#"{"country_code":"DE"}"#).await;

    let provider = IpstackProvider::new(&config(addr, 5)).unwrap();
    let geo = provider.lookup("81.2.69.142").await.unwrap();

    match geo {
        Geolocation::Ok { country, city, .. } => {
            assert_eq!(country, Some("DE".into()));
            assert_eq!(city, None);
        }
        other => panic!("expected ok, got {:?}", other),
    }
}

#[tokio::test]
async fn non_2xx_status_becomes_error_state() {
    let addr = serve_http_once("404 Not Found", r#"{"detail":"not found"}"#).await;

    let provider = IpstackProvider::new(&config(addr, 5)).unwrap();
    let geo = provider.lookup("8.8.8.8").await.unwrap();

    match geo {
        Geolocation::Error { provider, error } => {
            assert_eq!(provider, "ipstack");
            assert!(error.contains("404"), "unexpected cause: {}", error);
        }
        other => panic!("expected error state, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_payload_becomes_error_state() {
    let addr = serve_http_once("200 OK", "this is not json").await;

    let provider = IpstackProvider::new(&config(addr, 5)).unwrap();
    let geo = provider.lookup("8.8.8.8").await.unwrap();

    match geo {
        Geolocation::Error { error, .. } => {
            assert!(error.contains("malformed"), "unexpected cause: {}", error);
        }
        other => panic!("expected error state, got {:?}", other),
    }
}

#[tokio::test]
async fn unresponsive_endpoint_fails_within_the_timeout() {
    let addr = serve_http_hang().await;

    let provider = IpstackProvider::new(&config(addr, 1)).unwrap();

    let start = std::time::Instant::now();
    let geo = provider.lookup("8.8.8.8").await.unwrap();
    let elapsed = start.elapsed();

    match geo {
        Geolocation::Error { error, .. } => {
            assert!(error.contains("timed out"), "unexpected cause: {}", error);
        }
        other => panic!("expected error state, got {:?}", other),
    }

    // Bounded by the configured timeout, not the server's stall
    assert!(elapsed < std::time::Duration::from_secs(5));
}

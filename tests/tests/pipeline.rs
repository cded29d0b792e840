//! End-to-end pipeline tests: source → processor → enricher → sink,
//! with in-memory collaborators.

use std::sync::Arc;

use serde_json::json;

use enricher_core::Geolocation;
use geoip::{ConfiguredProvider, GeoConfig, GeoProvider};
use integration_tests::fixtures::{ip_record, record};
use integration_tests::mocks::{MockProvider, MockSink, MockSource};
use worker::{BatchProcessor, ConsumerLoop, RecordEnricher};

fn processor(provider: Arc<dyn GeoProvider>, sink: MockSink) -> BatchProcessor {
    BatchProcessor::new(RecordEnricher::new(provider), Arc::new(sink))
}

#[tokio::test]
async fn mixed_batch_drops_invalid_record_and_forwards_the_rest() {
    let provider = Arc::new(MockProvider::new());
    let sink = MockSink::new();
    let processor = processor(provider.clone(), sink.clone());

    let batch = vec![ip_record("8.8.8.8"), record(json!({"foo": "bar"}))];
    processor.process(batch).await;

    let forwarded = sink.captured_records();
    assert_eq!(forwarded.len(), 1);
    assert_eq!(forwarded[0].ip_address(), Some("8.8.8.8"));

    match forwarded[0].geolocation().unwrap() {
        Geolocation::Ok { ip, provider, .. } => {
            assert_eq!(ip, "8.8.8.8");
            assert_eq!(provider, "mock");
        }
        other => panic!("expected ok, got {:?}", other),
    }

    // Only the valid record reached the provider
    assert_eq!(provider.lookup_count(), 1);
}

#[tokio::test]
async fn unknown_provider_forwards_records_with_unsupported_state() {
    let config = GeoConfig {
        provider: "unknown-provider".into(),
        // Unroutable: any network attempt would fail the test by timeout
        base_url: "http://192.0.2.1".into(),
        ..GeoConfig::default()
    };
    let provider = Arc::new(ConfiguredProvider::from_config(&config).unwrap());
    let sink = MockSink::new();
    let processor = processor(provider, sink.clone());

    processor
        .process(vec![record(json!({"ip_address": "8.8.8.8", "symbol": "AAPL"}))])
        .await;

    let forwarded = sink.captured_records();
    assert_eq!(forwarded.len(), 1);
    assert_eq!(
        forwarded[0].geolocation().unwrap(),
        Geolocation::unsupported("unknown-provider")
    );
    // Passthrough fields survive enrichment
    assert_eq!(forwarded[0].get("symbol"), Some(&json!("AAPL")));
}

#[tokio::test]
async fn provider_error_records_are_forwarded_not_dropped() {
    let provider = Arc::new(MockProvider::new().with_error_ip("203.0.113.9"));
    let sink = MockSink::new();
    let processor = processor(provider, sink.clone());

    let batch = vec![ip_record("203.0.113.9"), ip_record("8.8.8.8")];
    processor.process(batch).await;

    let forwarded = sink.captured_records();
    assert_eq!(forwarded.len(), 2);
    assert_eq!(forwarded[0].geolocation().unwrap().status(), "error");
    assert_eq!(forwarded[1].geolocation().unwrap().status(), "ok");
}

#[tokio::test]
async fn empty_batch_touches_neither_provider_nor_sink() {
    let provider = Arc::new(MockProvider::new());
    let sink = MockSink::new();
    let processor = processor(provider.clone(), sink.clone());

    processor.process(Vec::new()).await;

    assert_eq!(provider.lookup_count(), 0);
    assert_eq!(sink.send_count(), 0);
}

#[tokio::test]
async fn sink_failure_does_not_escape_the_processor() {
    let provider = Arc::new(MockProvider::new());
    let sink = MockSink::new();
    sink.set_should_fail(true);
    let processor = processor(provider, sink.clone());

    // Must return normally despite the sink refusing the batch
    processor.process(vec![ip_record("8.8.8.8")]).await;

    assert_eq!(sink.send_count(), 0);
}

#[tokio::test]
async fn consumer_loop_delivers_every_batch_in_order() {
    let provider = Arc::new(MockProvider::new());
    let sink = MockSink::new();
    let processor = Arc::new(processor(provider, sink.clone()));

    let source = Arc::new(MockSource::new(vec![
        vec![ip_record("1.1.1.1")],
        vec![ip_record("8.8.8.8"), ip_record("9.9.9.9")],
    ]));
    let consumer_loop = ConsumerLoop::new(source.clone(), processor);

    // The mock transport fails once its script is exhausted
    let result = consumer_loop.run().await;
    assert!(result.is_err());

    let batches = sink.captured_batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].len(), 1);
    assert_eq!(batches[1].len(), 2);
    assert_eq!(batches[0][0].ip_address(), Some("1.1.1.1"));
}

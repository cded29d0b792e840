//! Supervisor behavior over a mock transport: restart counting, backoff,
//! shutdown precedence, and process exit status.

use std::sync::Arc;
use std::time::Duration;

use integration_tests::fixtures::ip_record;
use integration_tests::mocks::{MockProvider, MockSink, MockSource};
use worker::{
    BatchProcessor, ConsumerLoop, ExitStatus, RecordEnricher, ShutdownToken, Supervisor,
    SupervisorConfig,
};

fn fast_config() -> SupervisorConfig {
    SupervisorConfig {
        backoff: Duration::from_millis(1),
        max_failures: 5,
    }
}

fn build(source: Arc<MockSource>, sink: MockSink, shutdown: ShutdownToken) -> Supervisor {
    let processor = Arc::new(BatchProcessor::new(
        RecordEnricher::new(Arc::new(MockProvider::new())),
        Arc::new(sink),
    ));
    let consumer_loop = ConsumerLoop::new(source, processor);
    Supervisor::with_config(consumer_loop, shutdown, fast_config())
}

#[tokio::test]
async fn repeated_transport_failures_exit_with_status_one() {
    // Empty script: every consume call fails immediately
    let source = Arc::new(MockSource::new(Vec::new()));
    let supervisor = build(source.clone(), MockSink::new(), ShutdownToken::new());

    let status = supervisor.run().await;

    assert_eq!(status, ExitStatus::Fatal);
    assert_eq!(status.code(), 1);
    assert_eq!(source.consume_calls(), 5);
}

#[tokio::test]
async fn shutdown_after_processing_exits_clean_with_work_done() {
    let shutdown = ShutdownToken::new();
    let sink = MockSink::new();

    let source = Arc::new(MockSource::new(vec![
        vec![ip_record("8.8.8.8")],
        vec![ip_record("1.1.1.1")],
    ]));
    // Shutdown requested once the queue runs dry; the transport error that
    // follows must not push the supervisor into another restart
    source.trigger_on_exhaust(shutdown.clone());

    let supervisor = build(source.clone(), sink.clone(), shutdown);
    let status = supervisor.run().await;

    assert_eq!(status, ExitStatus::Clean);
    assert_eq!(status.code(), 0);
    assert_eq!(source.consume_calls(), 1);
    // Both delivered batches were fully processed before shutdown took effect
    assert_eq!(sink.send_count(), 2);
}

#[tokio::test]
async fn normal_loop_exit_restarts_without_backoff_or_counting() {
    let shutdown = ShutdownToken::new();

    let source = Arc::new(MockSource::new(vec![vec![ip_record("8.8.8.8")]]));
    source.exit_normally_on_exhaust();
    source.trigger_on_exhaust(shutdown.clone());

    let sink = MockSink::new();
    let supervisor = build(source.clone(), sink.clone(), shutdown);

    let status = supervisor.run().await;

    // One normal exit, then the shutdown check terminates cleanly
    assert_eq!(status, ExitStatus::Clean);
    assert_eq!(source.consume_calls(), 1);
    assert_eq!(sink.send_count(), 1);
}

#[tokio::test]
async fn shutdown_set_before_start_never_consumes() {
    let shutdown = ShutdownToken::new();
    shutdown.trigger();

    let source = Arc::new(MockSource::new(vec![vec![ip_record("8.8.8.8")]]));
    let sink = MockSink::new();
    let supervisor = build(source.clone(), sink.clone(), shutdown);

    let status = supervisor.run().await;

    assert_eq!(status, ExitStatus::Clean);
    assert_eq!(source.consume_calls(), 0);
    assert_eq!(sink.send_count(), 0);
}

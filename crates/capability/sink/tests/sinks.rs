use coha_sink::{InMemorySink, InfluxConfig, InfluxSink, PointSink, SinkError};
use domain::Point;
use std::time::Duration;

fn sample_point(id: &str, value: f64) -> Point {
    let mut point = Point::new("power");
    point.add_field(id, value).set_time(1);
    point
}

fn unreachable_config() -> InfluxConfig {
    InfluxConfig {
        // 端口 1 上没有服务，连接会被立即拒绝。
        url: "http://127.0.0.1:1".to_string(),
        token: "token".to_string(),
        org: "org".to_string(),
        bucket: "bucket".to_string(),
        timeout: Duration::from_secs(2),
    }
}

#[tokio::test]
async fn in_memory_sink_tracks_writes_and_flushes() {
    let sink = InMemorySink::new();
    sink.write(sample_point("a", 1.0)).await.expect("write a");
    sink.write(sample_point("b", 2.0)).await.expect("write b");
    assert_eq!(sink.pending().await, 2);

    let flushed = sink.flush().await.expect("flush");
    assert_eq!(flushed, 2);
    assert_eq!(sink.pending().await, 0);
    assert_eq!(sink.flush_count().await, 1);
    assert_eq!(sink.written().await.len(), 2);
}

#[tokio::test]
async fn point_without_fields_is_rejected() {
    let sink = InMemorySink::new();
    let err = sink
        .write(Point::new("power"))
        .await
        .expect_err("no fields");
    assert!(matches!(err, SinkError::InvalidPoint(_)));
    assert_eq!(sink.pending().await, 0);
}

#[tokio::test]
async fn influx_empty_flush_sends_nothing() {
    let sink = InfluxSink::new(unreachable_config()).expect("client");
    let flushed = sink.flush().await.expect("empty flush");
    assert_eq!(flushed, 0);
}

#[tokio::test]
async fn influx_failed_flush_drops_points() {
    let sink = InfluxSink::new(unreachable_config()).expect("client");
    sink.write(sample_point("a", 1.0)).await.expect("write");
    assert_eq!(sink.buffered().await, 1);

    let err = sink.flush().await.expect_err("unreachable");
    assert!(matches!(err, SinkError::Http(_)));
    assert_eq!(sink.buffered().await, 0);
}

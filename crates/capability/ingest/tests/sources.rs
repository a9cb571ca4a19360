use coha_ingest::{BatchSource, IngestError, MqttSource, MqttSourceConfig, ZmqSource, ZmqSourceConfig};
use std::time::Duration;
use zeromq::{Socket, SocketSend, ZmqMessage};

#[tokio::test]
async fn zmq_source_receives_published_batch() {
    let mut publisher = zeromq::PubSocket::new();
    let endpoint = publisher
        .bind("tcp://127.0.0.1:0")
        .await
        .expect("bind publisher");

    let mut source = ZmqSource::connect(ZmqSourceConfig {
        endpoint: endpoint.to_string(),
        subscribe: String::new(),
    })
    .await
    .expect("connect");

    // SUB 端订阅生效前发布的消息会被丢弃，持续发布直到收到为止。
    let payload = r#"[{"id":"temp1","type":"number","value":21.5}]"#;
    let publish = tokio::spawn(async move {
        loop {
            let message = ZmqMessage::from(payload.to_string());
            if publisher.send(message).await.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    });

    let batch = tokio::time::timeout(Duration::from_secs(5), source.recv())
        .await
        .expect("recv timeout")
        .expect("recv");
    publish.abort();
    assert_eq!(batch, payload.as_bytes());
}

#[tokio::test]
async fn mqtt_source_reports_unreachable_broker() {
    let mut source = MqttSource::new(MqttSourceConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        username: None,
        password: None,
        topic: "coha/#".to_string(),
        reconnect_delay: Duration::from_millis(10),
    });

    let err = tokio::time::timeout(Duration::from_secs(5), source.recv())
        .await
        .expect("recv timeout")
        .expect_err("unreachable broker");
    assert!(matches!(err, IngestError::Source(_)));
}

use crate::{BatchSource, IngestError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// MQTT 采集源配置。
#[derive(Debug, Clone)]
pub struct MqttSourceConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub topic: String,
    /// 连接失败后下一次 `recv` 之前的等待时间。
    pub reconnect_delay: Duration,
}

/// MQTT 采集源：每条 PUBLISH 的 payload 即一个批次。
pub struct MqttSource {
    client: rumqttc::AsyncClient,
    eventloop: rumqttc::EventLoop,
    config: MqttSourceConfig,
    failed: bool,
}

impl MqttSource {
    /// 创建客户端。实际连接在第一次 `recv` 时建立，每次 CONNACK 后重新订阅。
    pub fn new(config: MqttSourceConfig) -> Self {
        let client_id = format!("coha-bridge-{}", now_epoch_ms());
        let mut options = rumqttc::MqttOptions::new(client_id, config.host.clone(), config.port);
        options.set_keep_alive(Duration::from_secs(30));
        if let (Some(username), Some(password)) =
            (config.username.as_ref(), config.password.as_ref())
        {
            options.set_credentials(username, password);
        }

        let (client, eventloop) = rumqttc::AsyncClient::new(options, 10);
        Self {
            client,
            eventloop,
            config,
            failed: false,
        }
    }

    pub fn config(&self) -> &MqttSourceConfig {
        &self.config
    }
}

#[async_trait]
impl BatchSource for MqttSource {
    async fn recv(&mut self) -> Result<Vec<u8>, IngestError> {
        if self.failed {
            tokio::time::sleep(self.config.reconnect_delay).await;
            self.failed = false;
        }
        loop {
            match self.eventloop.poll().await {
                Ok(rumqttc::Event::Incoming(rumqttc::Packet::Publish(publish))) => {
                    return Ok(publish.payload.to_vec());
                }
                Ok(rumqttc::Event::Incoming(rumqttc::Packet::ConnAck(_))) => {
                    self.client
                        .subscribe(self.config.topic.clone(), rumqttc::QoS::AtMostOnce)
                        .await
                        .map_err(|err| IngestError::Source(err.to_string()))?;
                    info!(
                        target: "coha.ingest",
                        host = %self.config.host,
                        port = self.config.port,
                        topic = %self.config.topic,
                        "mqtt_subscribed"
                    );
                }
                Ok(_) => {}
                Err(err) => {
                    self.failed = true;
                    return Err(IngestError::Source(err.to_string()));
                }
            }
        }
    }
}

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    let duration = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_millis() as i64
}

//! 采集源与写入端装配。

use coha_config::{AppConfig, Transport};
use coha_ingest::{
    BatchSource, IngestError, MqttSource, MqttSourceConfig, ZmqSource, ZmqSourceConfig,
};
use coha_sink::InfluxConfig;
use std::time::Duration;
use tracing::info;

/// 按配置选择采集源：ZeroMQ SUB（默认）或 MQTT。
pub async fn connect_source(config: &AppConfig) -> Result<Box<dyn BatchSource>, IngestError> {
    match config.transport {
        Transport::Zmq => {
            let zmq_config = zmq_config(config);
            info!("ingest source: zmq {}", zmq_config.endpoint);
            Ok(Box::new(ZmqSource::connect(zmq_config).await?))
        }
        Transport::Mqtt => {
            let mqtt_config = mqtt_config(config);
            info!(
                "ingest source: mqtt {}:{} topic={}",
                mqtt_config.host, mqtt_config.port, mqtt_config.topic
            );
            Ok(Box::new(MqttSource::new(mqtt_config)))
        }
    }
}

fn zmq_config(config: &AppConfig) -> ZmqSourceConfig {
    ZmqSourceConfig {
        endpoint: config.zmq_socket.clone(),
        subscribe: config.zmq_subscribe.clone(),
    }
}

fn mqtt_config(config: &AppConfig) -> MqttSourceConfig {
    MqttSourceConfig {
        host: config.mqtt_host.clone(),
        port: config.mqtt_port,
        username: config.mqtt_username.clone(),
        password: config.mqtt_password.clone(),
        topic: config.mqtt_topic.clone(),
        reconnect_delay: Duration::from_secs(1),
    }
}

pub fn influx_config(config: &AppConfig) -> InfluxConfig {
    InfluxConfig {
        url: config.influx_url.clone(),
        token: config.influx_token.clone(),
        org: config.influx_organisation.clone(),
        bucket: config.influx_bucket.clone(),
        timeout: Duration::from_secs(config.influx_timeout_seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coha_config::FileConfig;

    fn sample_config(transport: &str) -> AppConfig {
        let transport = transport.to_string();
        AppConfig::resolve(FileConfig::default(), move |key| {
            let value = match key {
                "COHA_TRANSPORT" => transport.as_str(),
                "COHA_ZMQ_SOCKET" => "tcp://127.0.0.1:5556",
                "COHA_ZMQ_SUBSCRIBE" => "site-a",
                "COHA_MQTT_HOST" => "broker",
                "COHA_MQTT_USERNAME" => "user",
                "COHA_INFLUX_URL" => "http://localhost:8086",
                "COHA_INFLUX_TOKEN" => "token",
                "COHA_INFLUX_ORGANISATION" => "home",
                "COHA_INFLUX_BUCKET" => "energy",
                "COHA_INFLUX_TIMEOUT_SECONDS" => "5",
                _ => return None,
            };
            Some(value.to_string())
        })
        .expect("config")
    }

    #[test]
    fn zmq_config_from_app_config() {
        let config = zmq_config(&sample_config("zmq"));
        assert_eq!(config.endpoint, "tcp://127.0.0.1:5556");
        assert_eq!(config.subscribe, "site-a");
    }

    #[test]
    fn mqtt_config_from_app_config() {
        let config = mqtt_config(&sample_config("mqtt"));
        assert_eq!(config.host, "broker");
        assert_eq!(config.port, 1883);
        assert_eq!(config.username.as_deref(), Some("user"));
        assert!(config.password.is_none());
    }

    #[test]
    fn influx_config_from_app_config() {
        let config = influx_config(&sample_config("zmq"));
        assert_eq!(config.org, "home");
        assert_eq!(config.bucket, "energy");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}

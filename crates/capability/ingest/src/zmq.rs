use crate::{BatchSource, IngestError, payload_from_frames};
use async_trait::async_trait;
use tracing::info;
use zeromq::{Socket, SocketRecv, SubSocket};

/// ZeroMQ SUB 采集源配置。
#[derive(Debug, Clone)]
pub struct ZmqSourceConfig {
    /// 例如 `tcp://127.0.0.1:5556`。
    pub endpoint: String,
    /// 订阅前缀，空串表示接收全部消息。
    pub subscribe: String,
}

/// ZeroMQ SUB 采集源。
pub struct ZmqSource {
    socket: SubSocket,
    config: ZmqSourceConfig,
}

impl ZmqSource {
    /// 连接并订阅。断线重连由 socket 自行处理。
    pub async fn connect(config: ZmqSourceConfig) -> Result<Self, IngestError> {
        let mut socket = SubSocket::new();
        socket
            .connect(&config.endpoint)
            .await
            .map_err(|err| IngestError::Connect(err.to_string()))?;
        socket
            .subscribe(&config.subscribe)
            .await
            .map_err(|err| IngestError::Connect(err.to_string()))?;
        info!(
            target: "coha.ingest",
            endpoint = %config.endpoint,
            subscribe = %config.subscribe,
            "zmq_subscribed"
        );
        Ok(Self { socket, config })
    }

    pub fn config(&self) -> &ZmqSourceConfig {
        &self.config
    }
}

#[async_trait]
impl BatchSource for ZmqSource {
    async fn recv(&mut self) -> Result<Vec<u8>, IngestError> {
        let message = self
            .socket
            .recv()
            .await
            .map_err(|err| IngestError::Source(err.to_string()))?;
        Ok(payload_from_frames(message.into_vec()))
    }
}

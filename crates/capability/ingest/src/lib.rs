//! 批次接入：从订阅通道接收原始报文。
//!
//! 每次 `recv` 返回一个完整批次（一条 JSON 数组报文），不解析内容。

mod mqtt;
mod zmq;

pub use mqtt::{MqttSource, MqttSourceConfig};
pub use zmq::{ZmqSource, ZmqSourceConfig};

use async_trait::async_trait;

/// 接入错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("connect error: {0}")]
    Connect(String),
    #[error("source error: {0}")]
    Source(String),
}

/// 批次来源抽象。
#[async_trait]
pub trait BatchSource: Send {
    /// 阻塞等待下一个批次。
    async fn recv(&mut self) -> Result<Vec<u8>, IngestError>;
}

/// 多帧消息只取最后一帧作为报文（前面的帧视为 topic 信封）。
pub fn payload_from_frames<F: AsRef<[u8]>>(frames: Vec<F>) -> Vec<u8> {
    frames
        .last()
        .map(|frame| frame.as_ref().to_vec())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::payload_from_frames;

    #[test]
    fn single_frame_is_payload() {
        let frames = vec![b"[1,2]".to_vec()];
        assert_eq!(payload_from_frames(frames), b"[1,2]".to_vec());
    }

    #[test]
    fn envelope_frame_is_skipped() {
        let frames = vec![b"sensors".to_vec(), b"[]".to_vec()];
        assert_eq!(payload_from_frames(frames), b"[]".to_vec());
    }

    #[test]
    fn no_frames_is_empty_payload() {
        let frames: Vec<Vec<u8>> = Vec::new();
        assert!(payload_from_frames(frames).is_empty());
    }
}

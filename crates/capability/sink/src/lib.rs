//! 时序写入端。
//!
//! `write` 只进入缓冲区，`flush` 才真正发送；流水线在每个批次结束时调用一次 `flush`。

mod in_memory;
mod influx;
pub mod line_protocol;

pub use in_memory::InMemorySink;
pub use influx::{InfluxConfig, InfluxSink};

use async_trait::async_trait;
use domain::Point;

/// 写入端错误。
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("invalid point: {0}")]
    InvalidPoint(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("write rejected ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// 数据点写入端抽象。
#[async_trait]
pub trait PointSink: Send + Sync {
    /// 缓冲一个数据点，不做网络 I/O。
    async fn write(&self, point: Point) -> Result<(), SinkError>;

    /// 发送并清空缓冲区，返回本次发送的点数。
    async fn flush(&self) -> Result<usize, SinkError>;
}

pub(crate) fn ensure_writable(point: &Point) -> Result<(), SinkError> {
    if point.fields.is_empty() {
        return Err(SinkError::InvalidPoint(format!(
            "measurement {} has no fields",
            point.measurement
        )));
    }
    Ok(())
}

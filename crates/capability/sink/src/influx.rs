//! InfluxDB v2 写入端。
//!
//! 数据点先进入内存缓冲区，`flush` 时编码为 line protocol 一次性提交到
//! `/api/v2/write`。发送失败的数据点直接丢弃，不重试。

use crate::line_protocol::encode_points;
use crate::{PointSink, SinkError, ensure_writable};
use async_trait::async_trait;
use domain::Point;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// InfluxDB 连接配置。
#[derive(Debug, Clone)]
pub struct InfluxConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
    pub timeout: Duration,
}

/// InfluxDB v2 写入端。
pub struct InfluxSink {
    client: reqwest::Client,
    config: InfluxConfig,
    buffer: Mutex<Vec<Point>>,
}

impl InfluxSink {
    pub fn new(config: InfluxConfig) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            buffer: Mutex::new(Vec::new()),
        })
    }

    pub fn config(&self) -> &InfluxConfig {
        &self.config
    }

    /// 当前缓冲的数据点数量。
    pub async fn buffered(&self) -> usize {
        self.buffer.lock().await.len()
    }

    fn write_url(&self) -> String {
        format!("{}/api/v2/write", self.config.url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PointSink for InfluxSink {
    async fn write(&self, point: Point) -> Result<(), SinkError> {
        ensure_writable(&point)?;
        self.buffer.lock().await.push(point);
        Ok(())
    }

    async fn flush(&self) -> Result<usize, SinkError> {
        let points = std::mem::take(&mut *self.buffer.lock().await);
        if points.is_empty() {
            return Ok(0);
        }

        let body = encode_points(&points);
        let response = self
            .client
            .post(self.write_url())
            .query(&[
                ("org", self.config.org.as_str()),
                ("bucket", self.config.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", self.config.token),
            )
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        debug!(target: "coha.sink", points = points.len(), "influx_flushed");
        Ok(points.len())
    }
}

//! 采集流水线：接收 → 解码 → 过滤 → 按类型解码 → 写入 → 刷盘。
//!
//! 一次只处理一个批次。单条记录失败只记日志并跳过，不影响同批次其他记录；
//! 批次结构解码成功后固定 flush 一次。

mod emitter;

pub use emitter::Emitter;

use coha_decode::{DecodeError, decode_batch, decode_header, decode_reading};
use coha_ingest::BatchSource;
use coha_sink::PointSink;
use coha_telemetry::new_batch_id;
use domain::AllowList;
use serde_json::value::RawValue;
use std::sync::Arc;
use tracing::{Instrument, debug, info, warn};

/// 单个批次的处理结果统计。
///
/// 除 `records`、`written` 外，每个计数都对应一类记录级日志事件，见各字段注释。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub records: usize,
    pub written: usize,
    /// `record_filtered`
    pub filtered: usize,
    /// `unknown_type`
    pub unknown_type: usize,
    /// `record_header_invalid` 或 `record_decode_failed`
    pub invalid: usize,
    /// `point_write_failed`
    pub write_failed: usize,
    /// flush 实际发送的点数；flush 失败（`sink_flush_failed`）时为 None。
    pub flushed: Option<usize>,
}

/// 流水线入口，持有白名单与写入端。
pub struct Pipeline {
    allow_list: AllowList,
    emitter: Emitter,
}

impl Pipeline {
    pub fn new(
        allow_list: AllowList,
        sink: Arc<dyn PointSink>,
        measurement: impl Into<String>,
    ) -> Self {
        Self {
            allow_list,
            emitter: Emitter::new(sink, measurement),
        }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// 持续接收并处理批次，永不返回。
    pub async fn run(&self, source: &mut dyn BatchSource) {
        loop {
            self.step(source).await;
        }
    }

    /// 接收并处理一个批次。接收失败或批次结构无效时返回 None。
    pub async fn step(&self, source: &mut dyn BatchSource) -> Option<BatchReport> {
        let payload = match source.recv().await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(target: "coha.pipeline", error = %err, "receive_failed");
                return None;
            }
        };

        let span = tracing::info_span!(
            "batch",
            batch_id = %new_batch_id(),
            bytes = payload.len()
        );
        async {
            match self.process_batch(&payload).await {
                Ok(report) => {
                    info!(
                        target: "coha.pipeline",
                        records = report.records,
                        written = report.written,
                        filtered = report.filtered,
                        unknown_type = report.unknown_type,
                        invalid = report.invalid,
                        write_failed = report.write_failed,
                        flushed = ?report.flushed,
                        "batch_processed"
                    );
                    Some(report)
                }
                Err(err) => {
                    warn!(target: "coha.pipeline", error = %err, "batch_decode_failed");
                    None
                }
            }
        }
        .instrument(span)
        .await
    }

    /// 处理一个批次的全部记录，然后 flush 一次。
    ///
    /// 只有批次本身不是 JSON 数组时返回错误（此时不写入也不 flush）。
    pub async fn process_batch(&self, payload: &[u8]) -> Result<BatchReport, DecodeError> {
        let records = decode_batch(payload)?;
        let mut report = BatchReport {
            records: records.len(),
            ..BatchReport::default()
        };

        for record in records {
            self.process_record(record, &mut report).await;
        }

        report.flushed = match self.emitter.flush().await {
            Ok(count) => Some(count),
            Err(err) => {
                warn!(target: "coha.sink", error = %err, "sink_flush_failed");
                None
            }
        };
        Ok(report)
    }

    async fn process_record(&self, record: &RawValue, report: &mut BatchReport) {
        let header = match decode_header(record) {
            Ok(header) => header,
            Err(err) => {
                report.invalid += 1;
                warn!(target: "coha.decode", error = %err, "record_header_invalid");
                return;
            }
        };
        debug!(target: "coha.pipeline", id = %header.id, kind = %header.kind, "record_received");

        if !self.allow_list.accepts(&header.id) {
            report.filtered += 1;
            info!(target: "coha.pipeline", id = %header.id, "record_filtered");
            return;
        }

        let reading = match decode_reading(record, &header) {
            Ok(reading) => reading,
            Err(DecodeError::UnknownType(kind)) => {
                report.unknown_type += 1;
                warn!(target: "coha.decode", id = %header.id, kind = %kind, "unknown_type");
                return;
            }
            Err(err) => {
                report.invalid += 1;
                warn!(target: "coha.decode", id = %header.id, error = %err, "record_decode_failed");
                return;
            }
        };
        debug!(target: "coha.pipeline", id = %reading.id, value = ?reading.value, "record_decoded");

        match self.emitter.emit(&reading).await {
            Ok(()) => report.written += 1,
            Err(err) => {
                report.write_failed += 1;
                warn!(target: "coha.sink", id = %reading.id, error = %err, "point_write_failed");
            }
        }
    }
}

use coha_sink::{PointSink, SinkError};
use domain::{Point, Reading, ReadingValue, UNIT_TAG};
use std::sync::Arc;

/// 把解码后的读数转换为数据点并交给写入端。
#[derive(Clone)]
pub struct Emitter {
    sink: Arc<dyn PointSink>,
    measurement: String,
}

impl Emitter {
    pub fn new(sink: Arc<dyn PointSink>, measurement: impl Into<String>) -> Self {
        Self {
            sink,
            measurement: measurement.into(),
        }
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    /// 读数 → 数据点：field 以读数 ID 命名；只有数值类读数带 `unit` tag。
    pub fn to_point(&self, reading: &Reading, ts_ns: i64) -> Point {
        let mut point = Point::new(self.measurement.clone());
        match &reading.value {
            ReadingValue::OctetString(value) => {
                point.add_field(&reading.id, value.clone());
            }
            ReadingValue::Boolean(value) => {
                point.add_field(&reading.id, *value);
            }
            ReadingValue::Number { value, unit, .. } => {
                point.add_tag(UNIT_TAG, unit.clone());
                point.add_field(&reading.id, *value);
            }
        }
        point.set_time(ts_ns);
        point
    }

    /// 以当前时间为时间戳写入（缓冲，不等待网络）。
    pub async fn emit(&self, reading: &Reading) -> Result<(), SinkError> {
        self.sink.write(self.to_point(reading, now_epoch_ns())).await
    }

    pub async fn flush(&self) -> Result<usize, SinkError> {
        self.sink.flush().await
    }
}

fn now_epoch_ns() -> i64 {
    let now = std::time::SystemTime::now();
    let duration = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_nanos() as i64
}

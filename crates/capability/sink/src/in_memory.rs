use crate::{PointSink, SinkError, ensure_writable};
use async_trait::async_trait;
use domain::Point;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct InMemoryState {
    written: Vec<Point>,
    pending: usize,
    flushes: usize,
}

/// 内存写入端（用于测试与空跑）。
#[derive(Debug, Default)]
pub struct InMemorySink {
    state: Mutex<InMemoryState>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有写入过的数据点（含未 flush 的）。
    pub async fn written(&self) -> Vec<Point> {
        self.state.lock().await.written.clone()
    }

    pub async fn pending(&self) -> usize {
        self.state.lock().await.pending
    }

    pub async fn flush_count(&self) -> usize {
        self.state.lock().await.flushes
    }
}

#[async_trait]
impl PointSink for InMemorySink {
    async fn write(&self, point: Point) -> Result<(), SinkError> {
        ensure_writable(&point)?;
        let mut state = self.state.lock().await;
        state.written.push(point);
        state.pending += 1;
        Ok(())
    }

    async fn flush(&self) -> Result<usize, SinkError> {
        let mut state = self.state.lock().await;
        state.flushes += 1;
        Ok(std::mem::take(&mut state.pending))
    }
}

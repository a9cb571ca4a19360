//! 日志初始化与批次 ID 生成。

use tracing_subscriber::{EnvFilter, fmt};

/// 初始化 tracing（默认 info，可用 RUST_LOG 覆盖）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 batch_id，用于关联同一批次内的所有日志。
pub fn new_batch_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

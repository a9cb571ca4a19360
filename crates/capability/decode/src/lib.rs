//! 读数报文解码。
//!
//! 两阶段解析：先把批次拆成原始记录并只读取 `id`/`type`，
//! 通过白名单后再按 `type` 选择具体结构做第二次解码。

mod envelope;
mod typed;

pub use envelope::{ReadingHeader, decode_batch, decode_header};
pub use typed::{decode_reading, decode_value};

/// 解码错误。
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("batch is not a json array: {0}")]
    Batch(#[source] serde_json::Error),
    #[error("record has no valid id/type: {0}")]
    Header(#[source] serde_json::Error),
    #[error("unknown type: {0}")]
    UnknownType(String),
    #[error("invalid {kind} record: {source}")]
    Typed {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

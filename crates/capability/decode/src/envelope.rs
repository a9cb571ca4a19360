use crate::DecodeError;
use serde::Deserialize;
use serde_json::value::RawValue;

/// 记录的通用部分：仅包含 `id` 与 `type`，不触碰 `value`。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReadingHeader {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// 将一次接收的报文解析为原始记录序列（保持顺序，借用输入）。
pub fn decode_batch(payload: &[u8]) -> Result<Vec<&RawValue>, DecodeError> {
    serde_json::from_slice(payload).map_err(DecodeError::Batch)
}

/// 从单条原始记录中读取 `id` 与 `type`。
pub fn decode_header(record: &RawValue) -> Result<ReadingHeader, DecodeError> {
    serde_json::from_str(record.get()).map_err(DecodeError::Header)
}

use crate::DecodeError;
use crate::envelope::ReadingHeader;
use domain::{Reading, ReadingType, ReadingValue};
use serde::Deserialize;
use serde_json::value::RawValue;

// value、precision、unit 缺失或为 null 时取零值（false、0、空串），类型不符才算解码失败。
#[derive(Deserialize)]
struct OctetStringRecord {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Deserialize)]
struct BooleanRecord {
    #[serde(default)]
    value: Option<bool>,
}

#[derive(Deserialize)]
struct NumberRecord {
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    precision: Option<i64>,
    #[serde(default)]
    unit: Option<String>,
}

/// 按记录头中的类型标签把原始记录解码为 [`Reading`]。
///
/// 未知标签返回 [`DecodeError::UnknownType`]，不会尝试解码 `value`。
pub fn decode_reading(record: &RawValue, header: &ReadingHeader) -> Result<Reading, DecodeError> {
    let kind = ReadingType::from_tag(&header.kind)
        .ok_or_else(|| DecodeError::UnknownType(header.kind.clone()))?;
    let value = decode_value(record, kind)?;
    Ok(Reading::new(header.id.clone(), value))
}

/// 按给定类型解码记录的值部分。
pub fn decode_value(record: &RawValue, kind: ReadingType) -> Result<ReadingValue, DecodeError> {
    let raw = record.get();
    let typed_error = |source| DecodeError::Typed {
        kind: kind.as_tag(),
        source,
    };
    let value = match kind {
        ReadingType::OctetString => {
            let record: OctetStringRecord = serde_json::from_str(raw).map_err(typed_error)?;
            ReadingValue::OctetString(record.value.unwrap_or_default())
        }
        ReadingType::Boolean => {
            let record: BooleanRecord = serde_json::from_str(raw).map_err(typed_error)?;
            ReadingValue::Boolean(record.value.unwrap_or_default())
        }
        ReadingType::Number => {
            let record: NumberRecord = serde_json::from_str(raw).map_err(typed_error)?;
            ReadingValue::Number {
                value: record.value.unwrap_or_default(),
                precision: record.precision.unwrap_or_default(),
                unit: record.unit.unwrap_or_default(),
            }
        }
    };
    Ok(value)
}

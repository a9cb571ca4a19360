/// 报文声明的值类型（`type` 字段）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingType {
    OctetString,
    Boolean,
    Number,
}

impl ReadingType {
    /// 按报文中的类型标签查找；未知标签返回 None。
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "octetstring" => Some(Self::OctetString),
            "boolean" => Some(Self::Boolean),
            "number" => Some(Self::Number),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::OctetString => "octetstring",
            Self::Boolean => "boolean",
            Self::Number => "number",
        }
    }
}

/// 按类型解码后的读数值。
#[derive(Debug, Clone, PartialEq)]
pub enum ReadingValue {
    OctetString(String),
    Boolean(bool),
    /// `precision` 仅保留在模型中，写入时不使用。
    Number {
        value: f64,
        precision: i64,
        unit: String,
    },
}

impl ReadingValue {
    pub fn reading_type(&self) -> ReadingType {
        match self {
            Self::OctetString(_) => ReadingType::OctetString,
            Self::Boolean(_) => ReadingType::Boolean,
            Self::Number { .. } => ReadingType::Number,
        }
    }
}

/// 已通过过滤并完成类型解码的读数。
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub id: String,
    pub value: ReadingValue,
}

impl Reading {
    pub fn new(id: impl Into<String>, value: ReadingValue) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }

    pub fn reading_type(&self) -> ReadingType {
        self.value.reading_type()
    }
}

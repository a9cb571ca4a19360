pub mod allow_list;
pub mod data;
pub mod point;

pub use allow_list::AllowList;
pub use data::{Reading, ReadingType, ReadingValue};
pub use point::{FieldValue, Point};

/// 写入时序库时使用的默认 measurement 名称。
pub const DEFAULT_MEASUREMENT: &str = "power";

/// 数值类读数携带单位时使用的 tag 名称。
pub const UNIT_TAG: &str = "unit";

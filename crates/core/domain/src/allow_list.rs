//! 读数 ID 白名单。

/// 允许写入时序库的读数 ID 列表。
///
/// 启动时加载一次，此后只读。匹配规则为逐字节相等（区分大小写），
/// 与条目顺序无关，重复条目不影响结果。
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    ids: Vec<String>,
}

impl AllowList {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    /// 判断 ID 是否在白名单内。
    pub fn accepts(&self, id: &str) -> bool {
        self.ids.iter().any(|allowed| allowed == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

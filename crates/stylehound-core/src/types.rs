//! 公共类型（对外暴露）：输出的问题记录
use serde::Serialize;

/// 固定分类标签
pub const CATEGORY_STYLE: &str = "Style";
/// 固定类型标签
pub const ISSUE_TYPE: &str = "issue";

/// 输出项结构（每条违规对应一条，写出后不保留）
/// 字段顺序即 JSON 输出顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    pub categories: Vec<&'static str>,
    pub check_name: String,
    pub description: String,
    pub contents: Contents,
    pub location: Location,
    pub fingerprint: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contents {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub positions: Positions,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Positions {
    pub begin: Position,
    pub end: Position,
}

/// 位置；列号缺失时不输出 column 字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl IssueRecord {
    /// 序列化为紧凑 JSON 并追加 NUL 结束符
    pub fn to_wire(&self) -> serde_json::Result<String> {
        let mut s = serde_json::to_string(self)?;
        s.push('\0');
        Ok(s)
    }
}

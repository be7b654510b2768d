//! 单文件检查：读取内容 → 调用规则引擎 → 转换为问题记录（含稳定指纹）
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::error::{EngineError, Result};
use crate::findings::{RuleEngine, Violation};
use crate::options::REMEDIATION_URL;
use crate::types::{Contents, IssueRecord, Location, Position, Positions, CATEGORY_STYLE, ISSUE_TYPE};

/// 单文件检查器（只读，可跨线程共享）
pub struct CheckRunner<'a> {
    engine: &'a dyn RuleEngine,
    strip_prefix: Option<&'a str>,
}

impl<'a> CheckRunner<'a> {
    pub fn new(engine: &'a dyn RuleEngine, strip_prefix: Option<&'a str>) -> Self {
        Self { engine, strip_prefix }
    }

    /// 检查单个文件，按引擎上报顺序返回问题记录
    /// - 读取失败 → FileAccess；引擎失败 → RuleEngine
    /// - 无违规 → 空列表（非错误）
    pub fn check(&self, path: &Path) -> Result<Vec<IssueRecord>> {
        let content = std::fs::read(path)
            .map_err(|source| EngineError::FileAccess { path: path.to_path_buf(), source })?;
        let violations = self
            .engine
            .analyze(path, &content)
            .map_err(|e| EngineError::RuleEngine { path: path.to_path_buf(), message: format!("{:#}", e) })?;
        Ok(violations.iter().map(|v| self.to_issue(v)).collect())
    }

    fn to_issue(&self, v: &Violation) -> IssueRecord {
        let path = clean_path(&v.file, self.strip_prefix);
        let pos = Position { line: v.line, column: v.column };
        IssueRecord {
            categories: vec![CATEGORY_STYLE],
            check_name: v.rule.clone(),
            description: v.message.clone(),
            contents: Contents { body: remediation_link(&v.rule) },
            fingerprint: fingerprint(&path, &v.rule, v.line, v.column),
            location: Location { positions: Positions { begin: pos, end: pos }, path },
            kind: ISSUE_TYPE,
        }
    }
}

/// 去掉根前缀，使输出路径相对于分析根目录
pub(crate) fn clean_path(path: &Path, strip_prefix: Option<&str>) -> String {
    let s = path.to_string_lossy();
    match strip_prefix {
        Some(prefix) if !prefix.is_empty() => s.strip_prefix(prefix).unwrap_or(&*s).to_string(),
        _ => s.into_owned(),
    }
}

pub(crate) fn remediation_link(rule: &str) -> String {
    format!("{}{}", REMEDIATION_URL, rule)
}

/// 唯一标识：路径|规则|行|列（列缺失时为空）
pub(crate) fn issue_identifier(path: &str, rule: &str, line: u32, column: Option<u32>) -> String {
    let column = column.map(|c| c.to_string()).unwrap_or_default();
    format!("{}|{}|{}|{}", path, rule, line, column)
}

/// 指纹：唯一标识的 SHA-256，64 位小写十六进制
pub fn fingerprint(path: &str, rule: &str, line: u32, column: Option<u32>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(issue_identifier(path, rule, line, column).as_bytes());
    format!("{:x}", hasher.finalize())
}

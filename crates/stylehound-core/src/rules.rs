//! 规则文件加载（TOML）
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// 单条规则的配置（支持 pattern 或 regex 字段）
#[derive(Debug, Clone, Deserialize)]
struct RuleEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub regex: Option<String>,
}

/// 顶层规则文件结构
#[derive(Debug, Clone, Deserialize)]
struct RuleFile {
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

/// 归一化后的规则规格
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub id: String,
    pub message: String,
    pub pat: String,
}

/// 从 TOML 规则文件加载并归一化为 RuleSpec 列表
pub fn load_rule_specs(path: &Path) -> Result<Vec<RuleSpec>> {
    let txt = std::fs::read_to_string(path).with_context(|| format!("read rules file {}", path.display()))?;
    parse_rule_specs(&txt).with_context(|| format!("parse rules file {}", path.display()))
}

pub fn parse_rule_specs(txt: &str) -> Result<Vec<RuleSpec>> {
    let parsed: RuleFile = toml::from_str(txt)?;
    let mut out = Vec::new();

    for e in parsed.rules {
        // 兼容两种字段名：pattern 或 regex
        let pat = match (e.pattern, e.regex) {
            (Some(p), _) => p,
            (None, Some(r)) => r,
            _ => continue,
        };
        // 未给出 message 时退回 name，再退回 id
        let message = e.message.or(e.name).unwrap_or_else(|| e.id.clone());
        out.push(RuleSpec { id: e.id, message, pat });
    }

    Ok(out)
}

//! 基于正则的规则引擎（规则由外部 TOML 文件提供）
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;

use crate::findings::{RuleEngine, Violation};
use crate::rules::RuleSpec;

struct Detector {
    id: String,
    message: String,
    pattern: Regex,
}

/// 逐行匹配的检测器集合
/// 上报顺序：行号升序；同一行内按规则文件中的顺序，每条规则每行最多一条
pub struct RegexRuleEngine {
    detectors: Vec<Detector>,
}

impl RegexRuleEngine {
    /// 从规则条目构建；任一正则编译失败即报错（规则文件属于配置）
    pub fn from_specs(specs: &[RuleSpec]) -> Result<Self> {
        let mut detectors = Vec::with_capacity(specs.len());
        for r in specs {
            let pattern = Regex::new(&r.pat).with_context(|| format!("rule {} has invalid pattern", r.id))?;
            detectors.push(Detector { id: r.id.clone(), message: r.message.clone(), pattern });
        }
        Ok(Self { detectors })
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

impl RuleEngine for RegexRuleEngine {
    fn analyze(&self, path: &Path, content: &[u8]) -> Result<Vec<Violation>> {
        // 有损转换：个别非法字节不应让整份文件失败
        let text = String::from_utf8_lossy(content);
        let mut out = Vec::new();

        for (idx, raw) in text.split('\n').enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            for d in &self.detectors {
                if let Some(m) = d.pattern.find(line) {
                    // 列号按字符计数，从 1 开始
                    let column = line[..m.start()].chars().count() as u32 + 1;
                    out.push(Violation {
                        rule: d.id.clone(),
                        message: d.message.clone(),
                        line: idx as u32 + 1,
                        column: Some(column),
                        file: path.to_path_buf(),
                    });
                }
            }
        }

        Ok(out)
    }
}

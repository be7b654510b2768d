//! 规则引擎接口与原始违规项

use anyhow::Result;
use std::path::{Path, PathBuf};

/// 规则引擎上报的单条违规（行列均从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: String,
    pub message: String,
    pub line: u32,
    pub column: Option<u32>,
    pub file: PathBuf,
}

/// 外部风格规则引擎
/// - 输入文件路径与完整字节内容，按引擎自身顺序返回违规列表
/// - 调度器在多个工作线程上共享同一实例，因此要求 Send + Sync
pub trait RuleEngine: Send + Sync {
    fn analyze(&self, path: &Path, content: &[u8]) -> Result<Vec<Violation>>;
}

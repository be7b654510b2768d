//! 运行配置与统计信息（模块）
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

/// 默认排除标记（子串匹配，非通配）
pub const DEFAULT_EXCLUDE_PATHS: [&str; 3] = ["node_modules/", "bower_components/", "vendor/"];
/// 默认并发上限（同时在检的文件数）
pub const DEFAULT_CONCURRENCY: usize = 10;
/// 默认源码根目录；输出路径会去掉该前缀
pub const DEFAULT_SOURCE_ROOT: &str = "/code/";
/// 修复建议链接模板（后接规则 id）
pub const REMEDIATION_URL: &str = "https://github.com/jedmao/eclint#";

/// 引擎配置（对应 config.json）
/// - 单次运行期间只读，可跨线程共享
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// 包含路径（文件或目录），按配置顺序处理
    #[serde(default)]
    pub include_paths: Vec<PathBuf>,
    /// 排除标记：路径中出现任一子串即排除
    #[serde(default = "default_exclude_paths")]
    pub exclude_paths: Vec<String>,
    /// 并发上限
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// 输出路径需去掉的根前缀（None 表示原样输出）
    #[serde(default = "default_strip_prefix")]
    pub strip_prefix: Option<String>,
}

fn default_exclude_paths() -> Vec<String> {
    DEFAULT_EXCLUDE_PATHS.iter().map(|s| s.to_string()).collect()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_strip_prefix() -> Option<String> {
    Some(DEFAULT_SOURCE_ROOT.to_string())
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            include_paths: Vec::new(),
            exclude_paths: default_exclude_paths(),
            concurrency: default_concurrency(),
            strip_prefix: default_strip_prefix(),
        }
    }
}

impl EngineConfig {
    /// 以给定包含路径构造，其余取默认值
    pub fn with_includes<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { include_paths: paths.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    /// 从 JSON 配置文件加载
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let txt = std::fs::read_to_string(path)
            .map_err(|e| EngineError::config(format!("read {}: {}", path.display(), e)))?;
        Self::from_json_str(&txt)
    }

    pub fn from_json_str(txt: &str) -> Result<Self> {
        serde_json::from_str(txt).map_err(|e| EngineError::config(format!("parse config: {}", e)))
    }

    /// 将相对包含路径解析到源码根目录下
    pub fn resolve_against(mut self, root: &Path) -> Self {
        self.include_paths = self
            .include_paths
            .into_iter()
            .map(|p| if p.is_relative() { root.join(p) } else { p })
            .collect();
        self
    }

    /// 调度前校验；失败即为致命的配置错误
    pub fn validate(&self) -> Result<()> {
        if self.include_paths.is_empty() {
            return Err(EngineError::config("include_paths is empty"));
        }
        if self.include_paths.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(EngineError::config("include_paths contains an empty entry"));
        }
        if self.concurrency == 0 {
            return Err(EngineError::config("concurrency must be at least 1"));
        }
        Ok(())
    }
}

/// 单个文件的失败记录
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: EngineError,
}

/// 运行统计（便于 CLI 打印）
/// - 失败文件与“零问题”文件可区分：前者进入 failures，后者只计入 files_checked
#[derive(Debug, Default)]
pub struct RunReport {
    pub files_checked: usize,
    pub issues_emitted: usize,
    pub failures: Vec<FileFailure>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

//! 错误类型（配置错误 / 文件访问错误 / 规则引擎错误）
use std::path::PathBuf;
use thiserror::Error;

/// 引擎错误分类
/// - Configuration：致命，在调度开始前抛出
/// - FileAccess / RuleEngine / Output：仅影响单个文件，调度继续处理其余文件
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cannot read {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rule engine failed on {path}: {message}")]
    RuleEngine { path: PathBuf, message: String },

    #[error("write issue: {0}")]
    Output(#[source] std::io::Error),
}

impl EngineError {
    pub fn config(msg: impl Into<String>) -> Self {
        EngineError::Configuration(msg.into())
    }

    /// 是否为单文件级错误（不会中断整个运行）
    pub fn is_per_file(&self) -> bool {
        !matches!(self, EngineError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

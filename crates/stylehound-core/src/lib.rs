//! 代码风格分析适配器核心库
//!
//! 设计要点：
//! - 文件选择：按配置顺序展开包含路径，先剪除符号链接（含链接之下的路径），再按排除标记/目录/二进制过滤。
//! - 选择阶段的文件系统错误一律跳过该路径（fail closed），不会中断整个运行。
//! - 并发检查：固定数量 worker 从任务队列取文件，单文件失败相互隔离。
//! - 输出：每条违规一条紧凑 JSON + NUL，指纹为 (路径, 规则, 行, 列) 的 SHA-256，跨运行稳定。

mod error;
mod options;
mod types;
mod findings;
mod filter;
mod symlinks;
mod fileset;
mod rules;
mod detectors;
mod check;
mod sink;
mod scan;

pub use error::{EngineError, Result};
pub use options::{EngineConfig, FileFailure, RunReport, DEFAULT_CONCURRENCY, DEFAULT_EXCLUDE_PATHS, DEFAULT_SOURCE_ROOT};
pub use types::{Contents, IssueRecord, Location, Position, Positions};
pub use findings::{RuleEngine, Violation};
pub use filter::{BinaryProbe, PathFilter, SniffBinary};
pub use symlinks::prune_symlinked;
pub use fileset::build_file_set;
pub use rules::{load_rule_specs, parse_rule_specs, RuleSpec};
pub use detectors::RegexRuleEngine;
pub use check::{fingerprint, CheckRunner};
pub use sink::{IssueSink, MemorySink, StdoutSink, WriterSink};
pub use scan::{analyze, analyze_with_probe, Scheduler};

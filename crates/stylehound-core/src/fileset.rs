//! 待检文件集合构建：展开包含路径 → 符号链接剪枝 → 路径过滤
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::filter::PathFilter;
use crate::options::EngineConfig;
use crate::symlinks::{lstat_form, prune_symlinked};

/// 按配置顺序展开所有包含路径，返回可分析文件列表
/// 稳定性保证：
/// - 包含路径之间保持配置顺序
/// - 目录内为深度优先、同级按文件名排序，文件系统不变时结果可复现
/// 已知限制：包含路径之间不去重，重叠的条目会产生重复文件（进而重复问题）
pub fn build_file_set(config: &EngineConfig, filter: &PathFilter) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in &config.include_paths {
        let expanded = expand_entry(entry);
        let before = expanded.len();
        let survivors: Vec<PathBuf> = prune_symlinked(expanded)
            .into_iter()
            .filter(|p| !filter.is_excluded(p))
            .collect();
        debug!(entry = %entry.display(), candidates = before, selected = survivors.len(), "include entry expanded");
        files.extend(survivors);
    }
    files
}

/// 展开单个包含路径
/// - 目录：包含目录自身及全部后代（不跟随链接，深度不限）
/// - 其他（含指向目录的链接，即使写成 `lib/`）：单元素列表，交由剪枝阶段处理
fn expand_entry(entry: &Path) -> Vec<PathBuf> {
    let is_dir = std::fs::symlink_metadata(lstat_form(entry)).map(|md| md.is_dir()).unwrap_or(false);
    if !is_dir {
        return vec![entry.to_path_buf()];
    }

    let mut out = Vec::new();
    for item in WalkDir::new(entry).follow_links(false).sort_by_file_name() {
        match item {
            Ok(e) => out.push(e.into_path()),
            Err(err) => {
                let path = err.path().map(|p| p.display().to_string()).unwrap_or_default();
                warn!(path = %path, error = %err, "walk failed, skipping");
            }
        }
    }
    out
}

//! 分析主流程与并发调度
use crossbeam_channel as channel;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::check::CheckRunner;
use crate::error::{EngineError, Result};
use crate::fileset::build_file_set;
use crate::filter::{BinaryProbe, PathFilter, SniffBinary};
use crate::findings::RuleEngine;
use crate::options::{EngineConfig, FileFailure, RunReport};
use crate::sink::IssueSink;

/// 完整运行：校验配置 → 构建文件集 → 并发检查 → 写出问题记录
pub fn analyze(config: &EngineConfig, engine: &dyn RuleEngine, sink: &dyn IssueSink) -> Result<RunReport> {
    analyze_with_probe(config, engine, Box::new(SniffBinary), sink)
}

/// 同 `analyze`，可注入二进制判定实现
pub fn analyze_with_probe(
    config: &EngineConfig,
    engine: &dyn RuleEngine,
    probe: Box<dyn BinaryProbe>,
    sink: &dyn IssueSink,
) -> Result<RunReport> {
    config.validate()?;
    let filter = PathFilter::new(&config.exclude_paths, probe)?;

    let files = build_file_set(config, &filter);
    info!(files = files.len(), concurrency = config.concurrency, "file set built");

    let runner = CheckRunner::new(engine, config.strip_prefix.as_deref());
    let report = Scheduler::new(config.concurrency).run(files, &runner, sink)?;

    info!(
        files_checked = report.files_checked,
        issues_emitted = report.issues_emitted,
        failures = report.failures.len(),
        "analysis finished"
    );
    Ok(report)
}

/// 单个文件的处理结果（worker → 汇总线程）
enum Outcome {
    Checked { issues: usize },
    Failed(FileFailure),
}

/// 有界并发调度器
/// - 待检文件进入任务队列，固定数量的 worker 空闲即取下一个
/// - 所有 worker 排空队列后才返回（rayon scope 作为汇合点）
/// - 单文件失败只记录，不影响其余文件
/// - 同一文件的问题按引擎顺序写出；文件之间不保证顺序
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    concurrency: usize,
}

impl Scheduler {
    pub fn new(concurrency: usize) -> Self {
        Self { concurrency: concurrency.max(1) }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn run(&self, files: Vec<PathBuf>, runner: &CheckRunner<'_>, sink: &dyn IssueSink) -> Result<RunReport> {
        let mut report = RunReport::default();
        if files.is_empty() {
            return Ok(report);
        }

        let workers = self.concurrency.min(files.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("stylehound-worker-{}", i))
            .build()
            .map_err(|e| EngineError::config(format!("build worker pool: {}", e)))?;

        let (job_tx, job_rx) = channel::unbounded::<PathBuf>();
        for f in files {
            // 接收端仍在本函数中持有，发送不会失败
            let _ = job_tx.send(f);
        }
        drop(job_tx);

        let (out_tx, out_rx) = channel::unbounded::<Outcome>();
        pool.scope(|s| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let out_tx = out_tx.clone();
                s.spawn(move |_| {
                    while let Ok(path) = job_rx.recv() {
                        let _ = out_tx.send(process_file(runner, sink, &path));
                    }
                });
            }
        });
        drop(out_tx);

        for outcome in out_rx.iter() {
            match outcome {
                Outcome::Checked { issues } => {
                    report.files_checked += 1;
                    report.issues_emitted += issues;
                }
                Outcome::Failed(failure) => report.failures.push(failure),
            }
        }
        Ok(report)
    }
}

/// 检查单个文件并立即写出其全部问题
/// 规则引擎内部 panic 视为该文件的 RuleEngine 错误，不波及其他文件
fn process_file(runner: &CheckRunner<'_>, sink: &dyn IssueSink, path: &Path) -> Outcome {
    let checked = panic::catch_unwind(AssertUnwindSafe(|| runner.check(path))).unwrap_or_else(|p| {
        Err(EngineError::RuleEngine { path: path.to_path_buf(), message: format!("panicked: {}", panic_message(&*p)) })
    });
    let result = checked.and_then(|issues| {
        for issue in &issues {
            let wire = issue
                .to_wire()
                .map_err(|e| EngineError::Output(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
            sink.emit(&wire).map_err(EngineError::Output)?;
        }
        Ok(issues.len())
    });

    match result {
        Ok(issues) => {
            debug!(path = %path.display(), issues, "file checked");
            Outcome::Checked { issues }
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "file check failed");
            Outcome::Failed(FileFailure { path: path.to_path_buf(), error })
        }
    }
}

fn panic_message(p: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = p.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = p.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use stylehound_core::{analyze, load_rule_specs, EngineConfig, RegexRuleEngine, StdoutSink};
use tracing::{error, info, warn};

const DEFAULT_CONFIG_PATH: &str = "/config.json";

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "stylehound", version, about = "代码风格检查适配器（问题以 JSON + NUL 写到标准输出）")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 分析源码目录并输出问题记录
    Run {
        /// 引擎配置文件（JSON，含 include_paths / exclude_paths）；缺省为 /config.json
        #[arg(long)]
        config: Option<PathBuf>,

        /// 源码根目录；相对包含路径据此解析，输出路径去掉该前缀
        #[arg(long, default_value = "/code")]
        root: PathBuf,

        /// 规则文件路径（TOML）
        #[arg(long, default_value = "./rules/default.toml")]
        rules: PathBuf,

        /// 并发数（"auto"=CPU 核心数；缺省取配置文件或 10）
        #[arg(long)]
        concurrency: Option<String>,
    },
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, root, rules, concurrency } => {
            info!(?config, ?root, ?rules, "starting analysis");

            let explicit = config.is_some();
            let config = config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
            let mut cfg = load_config(&config, explicit, &root)?;
            if let Some(c) = concurrency.as_deref() {
                cfg.concurrency = parse_concurrency(c)?;
            }

            let specs = load_rule_specs(&rules)?;
            let engine = RegexRuleEngine::from_specs(&specs).context("compile rules")?;
            info!(rules = engine.len(), "rules loaded");

            let report = analyze(&cfg, &engine, &StdoutSink).context("analysis failed")?;
            for f in &report.failures {
                error!(path = %f.path.display(), error = %f.error, "file not analyzed");
            }
            if !report.is_clean() {
                bail!("{} of {} files failed", report.failures.len(), report.failures.len() + report.files_checked);
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 标准输出留给问题记录，日志写到标准错误
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 加载配置
/// - 默认位置不存在时分析整个源码根目录
/// - 显式指定的配置文件必须存在，否则为配置错误
fn load_config(path: &Path, explicit: bool, root: &Path) -> Result<EngineConfig> {
    let cfg = if explicit || path.exists() {
        EngineConfig::from_json_file(path)?
    } else {
        warn!(?path, "config not found, analyzing the whole source root");
        EngineConfig::with_includes([root])
    };
    let mut cfg = cfg.resolve_against(root);
    cfg.strip_prefix = Some(root_prefix(root));
    Ok(cfg)
}

/// 输出路径需去掉的前缀（以分隔符结尾）
fn root_prefix(root: &Path) -> String {
    let s = root.to_string_lossy();
    if s.ends_with('/') { s.into_owned() } else { format!("{}/", s) }
}

/// 解析并发参数
fn parse_concurrency(s: &str) -> Result<usize> {
    if s.eq_ignore_ascii_case("auto") { return Ok(num_cpus::get()); }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => bail!("invalid --concurrency value: {}", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylehound_core::EngineError;

    #[test]
    fn concurrency_values() {
        assert_eq!(parse_concurrency("4").unwrap(), 4);
        assert!(parse_concurrency("auto").unwrap() >= 1);
        assert!(parse_concurrency("0").is_err());
        assert!(parse_concurrency("many").is_err());
    }

    #[test]
    fn root_prefix_always_ends_with_separator() {
        assert_eq!(root_prefix(Path::new("/code")), "/code/");
        assert_eq!(root_prefix(Path::new("/code/")), "/code/");
    }

    #[test]
    fn missing_config_falls_back_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("config.json"), false, dir.path()).unwrap();
        assert_eq!(cfg.include_paths, vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("custom.json"), true, dir.path()).unwrap_err();
        let err = err.downcast::<EngineError>().unwrap();
        assert!(matches!(err, EngineError::Configuration(_)));
    }

    #[test]
    fn config_file_entries_resolve_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("config.json");
        std::fs::write(&cfg_path, r#"{"include_paths": ["src/", "README.md"], "exclude_paths": ["dist/"]}"#).unwrap();
        let cfg = load_config(&cfg_path, true, Path::new("/code")).unwrap();
        assert_eq!(cfg.include_paths, vec![PathBuf::from("/code/src/"), PathBuf::from("/code/README.md")]);
        assert_eq!(cfg.exclude_paths, vec!["dist/"]);
        assert_eq!(cfg.strip_prefix.as_deref(), Some("/code/"));
    }
}

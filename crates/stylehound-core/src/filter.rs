//! 路径过滤：排除标记（字面子串）、目录、二进制文件
use aho_corasick::AhoCorasick;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};

/// 二进制嗅探抽样长度
pub(crate) const SNIFF_LEN: usize = 8192;

/// 二进制判定接口（外部协作者）
pub trait BinaryProbe: Send + Sync {
    fn is_binary(&self, path: &Path) -> std::io::Result<bool>;
}

/// 默认实现：读取文件头部抽样后按内容判定
#[derive(Debug, Default, Clone, Copy)]
pub struct SniffBinary;

impl BinaryProbe for SniffBinary {
    fn is_binary(&self, path: &Path) -> std::io::Result<bool> {
        let mut buf = Vec::with_capacity(SNIFF_LEN);
        File::open(path)?.take(SNIFF_LEN as u64).read_to_end(&mut buf)?;
        Ok(is_probably_binary(&buf))
    }
}

/// 判定缓冲区是否“明显是二进制”
/// 策略（保守，尽量不误杀文本）：
/// - 只要包含任何 NUL 字节（0x00）即认为二进制；
/// - 合法 UTF-8（允许抽样末尾截断半个字符）视为文本；
/// - 否则计算可打印 ASCII 比例（包含 tab/CR/LF），低于 25% 则认为二进制。
pub(crate) fn is_probably_binary(buf: &[u8]) -> bool {
    if buf.is_empty() { return false; }
    if buf.iter().any(|&b| b == 0) { return true; }
    match std::str::from_utf8(buf) {
        Ok(_) => return false,
        Err(e) if e.error_len().is_none() => return false,
        Err(_) => {}
    }
    let printable = buf.iter().filter(|&&b| matches!(b, 0x09 | 0x0A | 0x0D) || (0x20..=0x7E).contains(&b)).count();
    let ratio = printable as f32 / (buf.len() as f32);
    ratio < 0.25
}

/// 路径级过滤器（只读，可跨线程共享）
pub struct PathFilter {
    /// 排除标记自动机；任一标记出现在路径中即命中
    markers: AhoCorasick,
    probe: Box<dyn BinaryProbe>,
}

impl PathFilter {
    pub fn new<S: AsRef<str>>(exclude_markers: &[S], probe: Box<dyn BinaryProbe>) -> Result<Self> {
        let pats: Vec<&str> = exclude_markers.iter().map(|m| m.as_ref()).collect();
        let markers = AhoCorasick::new(&pats)
            .map_err(|e| EngineError::config(format!("exclude_paths: {}", e)))?;
        Ok(Self { markers, probe })
    }

    /// 使用默认二进制嗅探构造
    pub fn with_markers<S: AsRef<str>>(exclude_markers: &[S]) -> Result<Self> {
        Self::new(exclude_markers, Box::new(SniffBinary))
    }

    /// 仅检查排除标记（纯字符串判断，不访问文件系统）
    pub fn matches_marker(&self, path: &Path) -> bool {
        self.markers.is_match(normalized(path).as_str())
    }

    /// 是否排除：命中排除标记、为目录、或为二进制文件
    /// stat/嗅探失败一律视为排除（fail closed），并记录警告
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.matches_marker(path) {
            debug!(path = %path.display(), "excluded by marker");
            return true;
        }
        let md = match std::fs::metadata(path) {
            Ok(md) => md,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "stat failed, skipping");
                return true;
            }
        };
        if md.is_dir() {
            return true;
        }
        match self.probe.is_binary(path) {
            Ok(true) => {
                debug!(path = %path.display(), "excluded as binary");
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "binary check failed, skipping");
                true
            }
        }
    }
}

/// 统一路径分隔符为 '/'，使子串标记与平台无关
fn normalized(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' { s.into_owned() } else { s.replace(std::path::MAIN_SEPARATOR, "/") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_EXCLUDE_PATHS;
    use std::fs;

    fn default_filter() -> PathFilter {
        PathFilter::with_markers(&DEFAULT_EXCLUDE_PATHS).unwrap()
    }

    #[test]
    fn excludes_dependency_directories_by_substring() {
        let f = default_filter();
        assert!(f.is_excluded(Path::new("/myproject/node_modules/foo")));
        assert!(f.is_excluded(Path::new("/myproject/vendor/foo")));
        assert!(f.is_excluded(Path::new("/a/bower_components/b/c.js")));
        // 子串语义：标记出现在任意位置都算
        assert!(f.matches_marker(Path::new("/srv/myvendor/x.js")));
        assert!(!f.matches_marker(Path::new("/srv/vendor.js")));
    }

    #[test]
    fn directories_and_binaries_are_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("test.js");
        let bin = dir.path().join("binary.dat");
        fs::write(&text, "var a = 1;\n").unwrap();
        fs::write(&bin, [0u8, 159, 146, 150, 0, 1, 2]).unwrap();

        let f = default_filter();
        assert!(f.is_excluded(dir.path()));
        assert!(f.is_excluded(&bin));
        assert!(!f.is_excluded(&text));
    }

    #[test]
    fn missing_path_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(default_filter().is_excluded(&dir.path().join("gone.js")));
    }

    #[test]
    fn custom_probe_is_consulted() {
        struct Always;
        impl BinaryProbe for Always {
            fn is_binary(&self, _: &Path) -> std::io::Result<bool> { Ok(true) }
        }
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("a.txt");
        fs::write(&text, "hello\n").unwrap();
        let f = PathFilter::new(&["nothing-matches"], Box::new(Always)).unwrap();
        assert!(f.is_excluded(&text));
    }

    #[test]
    fn sniff_heuristics() {
        assert!(!is_probably_binary(b""));
        assert!(!is_probably_binary("plain text\n\tindent\r\n".as_bytes()));
        assert!(!is_probably_binary("中文注释".as_bytes()));
        assert!(is_probably_binary(b"ab\0cd"));
        assert!(is_probably_binary(&[0xff, 0xfe, 0x80, 0x81, 0x90, 0x91, b'a']));
    }
}

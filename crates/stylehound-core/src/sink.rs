//! 输出汇：多工作线程共享，单条记录整写，保证记录之间不交错
use std::io::{self, Write};
use std::sync::Mutex;

/// 注入式输出接口
/// `line` 已包含 NUL 结束符；实现必须保证一次 emit 原子写出
pub trait IssueSink: Send + Sync {
    fn emit(&self, line: &str) -> io::Result<()>;
}

/// 标准输出：持有 stdout 锁写完一整条（记录 + 换行）后再释放
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl IssueSink for StdoutSink {
    fn emit(&self, line: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(line.as_bytes())?;
        lock.write_all(b"\n")?;
        lock.flush()
    }
}

/// 任意 Writer 包装（例如文件），以互斥锁串行化写入
pub struct WriterSink<W: Write + Send> {
    inner: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner: Mutex::new(inner) }
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> IssueSink for WriterSink<W> {
    fn emit(&self, line: &str) -> io::Result<()> {
        let mut w = self.inner.lock().map_err(|_| io::Error::new(io::ErrorKind::Other, "sink poisoned"))?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")
    }
}

/// 内存汇（测试与嵌入使用）
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出目前收到的全部记录
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl IssueSink for MemorySink {
    fn emit(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "sink poisoned"))?
            .push(line.to_string());
        Ok(())
    }
}

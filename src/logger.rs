use std::fmt::Display;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// 서버 이벤트 로그
///
/// 여러 세션이 동시에 기록하므로 한 줄을 먼저 완성한 뒤
/// 잠금 안에서 한 번의 `write_all`로 내보냅니다.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Logger {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }

    pub fn discard() -> Self {
        Self::new(std::io::sink())
    }

    /// 한 줄 기록 (개행은 자동으로 붙음)
    pub fn log(&self, message: impl Display) {
        let line = format!("{}\n", message);
        tracing::debug!(target: "spysh::log", "{}", line.trim_end());

        let mut sink = match self.sink.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = sink.write_all(line.as_bytes()).and_then(|_| sink.flush()) {
            tracing::warn!("event log write failed: {}", e);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::discard()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

use crate::error::{Result, ShellError};
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::AsyncWrite;

/// 트랜스크립트를 남기지 않는 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// 처음부터 요청하지 않음
    NotRequested,
    /// 파일 생성 실패
    Unavailable,
}

/// 세션 하나의 기록 대상 (파일 또는 버림)
pub enum TranscriptSink {
    File { path: PathBuf, file: File },
    Discard(DiscardReason),
}

impl TranscriptSink {
    /// 파일 생성 (기존 파일은 덮어씀)
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        match File::create(&path).await {
            Ok(file) => Ok(Self::File { path, file }),
            Err(source) => Err(ShellError::TranscriptCreateError { path, source }),
        }
    }

    pub fn discard() -> Self {
        Self::Discard(DiscardReason::NotRequested)
    }

    /// 생성에 실패했을 때의 대체 sink
    pub fn unavailable() -> Self {
        Self::Discard(DiscardReason::Unavailable)
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Discard(_) => None,
        }
    }

    /// 사용자에게 보여줄 안내 문구 (기록이 남지 않을 때만)
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Discard(DiscardReason::NotRequested) => Some("No transcript requested"),
            Self::Discard(DiscardReason::Unavailable) => {
                Some("WARNING No transcript will be available for this session!")
            }
            Self::File { .. } => None,
        }
    }
}

impl AsyncWrite for TranscriptSink {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::File { file, .. } => Pin::new(file).poll_write(cx, buf),
            Self::Discard(_) => Poll::Ready(Ok(buf.len())),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::File { file, .. } => Pin::new(file).poll_flush(cx),
            Self::Discard(_) => Poll::Ready(Ok(())),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::File { file, .. } => Pin::new(file).poll_shutdown(cx),
            Self::Discard(_) => Poll::Ready(Ok(())),
        }
    }
}

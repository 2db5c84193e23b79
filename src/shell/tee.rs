use tokio::io::{AsyncWrite, AsyncWriteExt};

/// 터미널과 트랜스크립트에 같은 바이트를 쓰는 fan-out writer
///
/// 항상 터미널 → 트랜스크립트 순서로 쓰며, 한쪽이 실패해도
/// 다른 쪽에는 계속 씁니다.
pub struct CombinedSink<'a, T: ?Sized, R: ?Sized> {
    terminal: &'a mut T,
    transcript: &'a mut R,
}

impl<'a, T, R> CombinedSink<'a, T, R>
where
    T: AsyncWrite + Unpin + ?Sized,
    R: AsyncWrite + Unpin + ?Sized,
{
    pub fn new(terminal: &'a mut T, transcript: &'a mut R) -> Self {
        Self {
            terminal,
            transcript,
        }
    }

    pub async fn write_all(&mut self, buf: &[u8]) {
        if let Err(e) = write_and_flush(&mut *self.terminal, buf).await {
            tracing::debug!("terminal write failed: {}", e);
        }
        if let Err(e) = write_and_flush(&mut *self.transcript, buf).await {
            tracing::warn!("transcript write failed: {}", e);
        }
    }

    /// 메시지 한 줄 (개행 포함)
    pub async fn write_line(&mut self, message: &str) {
        self.write_all(format!("{}\n", message).as_bytes()).await;
    }
}

async fn write_and_flush<W>(writer: &mut W, buf: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(buf).await?;
    writer.flush().await
}

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const PASSWORD_PROMPT: &str = "Enter Password: ";
pub const INCORRECT_PASSWORD: &str = "Incorrect Password: Closing connection";

/// 서버 비밀번호 설정
#[derive(Clone, PartialEq, Eq)]
pub enum Secret {
    /// 이 값과 정확히 일치해야 통과
    Required(String),
    /// 인증 없음 (로컬 세션)
    None,
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required(_) => f.write_str("Secret::Required(***)"),
            Self::None => f.write_str("Secret::None"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Granted,
    Denied,
}

/// 비밀번호 한 번 묻고 확인 (재시도 없음)
///
/// 틀리거나 읽지 못하면 안내 문구를 쓰고 `Denied`를 반환합니다.
/// 연결을 닫는 것은 호출자가 합니다.
pub async fn challenge<R, W>(secret: &Secret, reader: &mut R, writer: &mut W) -> AuthOutcome
where
    R: AsyncBufRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let expected = match secret {
        Secret::None => return AuthOutcome::Granted,
        Secret::Required(expected) => expected,
    };

    if let Err(e) = send_line(writer, PASSWORD_PROMPT).await {
        tracing::debug!("failed to send password prompt: {}", e);
        return AuthOutcome::Denied;
    }

    let mut attempt = Vec::new();
    let granted = match reader.read_until(b'\n', &mut attempt).await {
        Ok(0) => false,
        Ok(_) => strip_terminator(&attempt) == expected.as_bytes(),
        Err(e) => {
            tracing::debug!("failed to read password: {}", e);
            false
        }
    };

    if granted {
        return AuthOutcome::Granted;
    }

    let _ = send_line(writer, INCORRECT_PASSWORD).await;
    AuthOutcome::Denied
}

async fn send_line<W>(writer: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(format!("{}\n", text).as_bytes()).await?;
    writer.flush().await
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

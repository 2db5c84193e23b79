use crate::error::{Result, ShellError};
use crate::shell::parser::ParsedCommand;
use crate::shell::tee::CombinedSink;
use std::os::fd::OwnedFd;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncReadExt, AsyncWrite};
use tokio::net::unix::pipe;
use tokio::process::Command;

const CHUNK_SIZE: usize = 4096;

pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    /// 명령어를 실행하고 출력을 그대로 `sink`로 보냄
    ///
    /// stdout과 stderr는 같은 파이프를 공유하므로 프로세스가 쓴 순서가
    /// 유지됩니다. 프로세스가 끝날 때까지 기다립니다. 시작하지 못하면
    /// `SpawnError`, 0이 아닌 코드로 끝나면 `CommandFailed`.
    pub async fn execute<T, R>(
        &self,
        command: &ParsedCommand,
        sink: &mut CombinedSink<'_, T, R>,
    ) -> Result<()>
    where
        T: AsyncWrite + Unpin + ?Sized,
        R: AsyncWrite + Unpin + ?Sized,
    {
        let program = command.program.to_string_lossy().into_owned();
        tracing::debug!(%program, args = ?command.args, "spawning");

        let spawn_error = |source| ShellError::SpawnError {
            program: program.clone(),
            source,
        };

        let (reader, writer) = std::io::pipe().map_err(spawn_error)?;
        let output = pipe::Receiver::from_owned_fd(OwnedFd::from(reader)).map_err(spawn_error)?;

        // Command가 쓰기 끝을 들고 있으면 EOF가 오지 않으므로 블록 안에서 해제
        let mut child = {
            let stderr = writer.try_clone().map_err(spawn_error)?;
            Command::new(&command.program)
                .args(&command.args)
                .stdin(Stdio::null())
                .stdout(Stdio::from(writer))
                .stderr(Stdio::from(stderr))
                .spawn()
                .map_err(spawn_error)?
        };

        forward(output, sink).await;

        let status = child.wait().await?;
        tracing::debug!(%program, %status, "exited");

        if !status.success() {
            return Err(ShellError::CommandFailed(describe(status)));
        }

        Ok(())
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// 파이프가 닫힐 때까지 읽은 조각을 바로 전달
async fn forward<T, R>(mut output: pipe::Receiver, sink: &mut CombinedSink<'_, T, R>)
where
    T: AsyncWrite + Unpin + ?Sized,
    R: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        match output.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => sink.write_all(&buf[..n]).await,
            Err(e) => {
                tracing::warn!("failed to read command output: {}", e);
                break;
            }
        }
    }
}

/// `exit status 3` 형식 (시그널로 끝나면 ExitStatus 그대로)
fn describe(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {}", code),
        None => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(line: &str) -> ParsedCommand {
        ParsedCommand::parse(line).unwrap().unwrap()
    }

    async fn run(line: &str) -> (Result<()>, Vec<u8>, Vec<u8>) {
        let mut terminal = Vec::new();
        let mut transcript = Vec::new();
        let mut sink = CombinedSink::new(&mut terminal, &mut transcript);
        let result = CommandRunner::new().execute(&command(line), &mut sink).await;
        (result, terminal, transcript)
    }

    #[tokio::test]
    async fn test_output_reaches_both_sinks() {
        let (result, terminal, transcript) = run("echo hello world").await;
        result.unwrap();
        assert_eq!(terminal, b"hello world\n");
        assert_eq!(transcript, b"hello world\n");
    }

    #[tokio::test]
    async fn test_stderr_is_captured() {
        let (result, terminal, transcript) = run("sh -c 'echo oops >&2'").await;
        result.unwrap();
        assert_eq!(terminal, b"oops\n");
        assert_eq!(transcript, b"oops\n");
    }

    #[tokio::test]
    async fn test_stdout_and_stderr_keep_write_order() {
        for _ in 0..20 {
            let (result, terminal, transcript) =
                run("sh -c 'echo a; echo b >&2; echo c; echo d >&2'").await;
            result.unwrap();
            assert_eq!(String::from_utf8(terminal).unwrap(), "a\nb\nc\nd\n");
            assert_eq!(String::from_utf8(transcript).unwrap(), "a\nb\nc\nd\n");
        }
    }

    #[tokio::test]
    async fn test_missing_program() {
        let (result, terminal, _) = run("definitely-not-a-real-program-42").await;
        let err = result.unwrap_err();

        assert!(matches!(err, ShellError::SpawnError { .. }));
        assert!(err
            .to_string()
            .starts_with("failed to execute \"definitely-not-a-real-program-42\""));
        assert!(terminal.is_empty());
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let (result, _, _) = run("sh -c 'exit 3'").await;
        match result.unwrap_err() {
            ShellError::CommandFailed(status) => assert_eq!(status, "exit status 3"),
            other => panic!("unexpected error: {}", other),
        }
    }
}

use crate::logger::Logger;
use crate::shell::parser::ParsedCommand;
use crate::shell::runner::CommandRunner;
use crate::shell::tee::CombinedSink;
use crate::shell::transcript::TranscriptSink;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const PROMPT: &str = "$ ";
pub const WELCOME: &str = "Welcome to the remote shell!";
pub const GOODBYE: &str = "Goodbye!";
const EXIT_COMMAND: &[u8] = b"exit";

/// 세션 설정 (세션 시작 전에 한 번 구성)
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// 환영 메시지 출력 여부 (네트워크 세션)
    pub welcome: bool,
    /// 로그에 쓸 식별자 (예: 원격 주소)
    pub identity: Option<String>,
    pub logger: Logger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingFirstPrompt,
    Running,
    Terminated,
}

/// 세션이 끝난 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// `exit` 입력
    Exit,
    /// 입력 스트림 종료
    EndOfInput,
    /// 복구할 수 없는 읽기 에러
    ReadError,
}

enum Flow {
    Continue,
    Exit,
}

/// 연결 하나의 명령 루프
///
/// 입력/터미널/트랜스크립트는 호출자가 소유하며 세션은 빌려서 씁니다.
/// 닫는 것도 호출자의 몫입니다.
pub struct Session<'a, R: ?Sized, W: ?Sized> {
    input: &'a mut R,
    terminal: &'a mut W,
    transcript: &'a mut TranscriptSink,
    config: SessionConfig,
    runner: CommandRunner,
    state: SessionState,
}

impl<'a, R, W> Session<'a, R, W>
where
    R: AsyncBufRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    pub fn new(
        input: &'a mut R,
        terminal: &'a mut W,
        transcript: &'a mut TranscriptSink,
        config: SessionConfig,
    ) -> Self {
        Self {
            input,
            terminal,
            transcript,
            config,
            runner: CommandRunner::new(),
            state: SessionState::AwaitingFirstPrompt,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 입력이 끝나거나 `exit`가 들어올 때까지 명령을 읽고 실행
    pub async fn run(&mut self) -> SessionEnd {
        if self.config.welcome {
            self.write_terminal(format!("{}\n", WELCOME).as_bytes()).await;
        }
        if let Some(notice) = self.transcript.notice() {
            self.write_terminal(format!("{}\n", notice).as_bytes()).await;
        }
        self.prompt().await;
        self.state = SessionState::Running;

        let mut buf = Vec::new();
        let end = loop {
            buf.clear();
            match self.input.read_until(b'\n', &mut buf).await {
                Ok(0) => break SessionEnd::EndOfInput,
                Ok(_) => {}
                Err(e) => {
                    self.config
                        .logger
                        .log(format_args!("{}: read error: {}", self.identity(), e));
                    break SessionEnd::ReadError;
                }
            }

            let line = trim_line_ending(&buf);
            if let Flow::Exit = self.process_line(line).await {
                break SessionEnd::Exit;
            }
        };

        self.state = SessionState::Terminated;
        if end == SessionEnd::Exit {
            self.write_terminal(format!("{}\n", GOODBYE).as_bytes()).await;
        }
        if let Err(e) = self.transcript.flush().await {
            tracing::warn!("transcript flush failed: {}", e);
        }

        tracing::debug!(identity = %self.identity(), ?end, "session finished");
        end
    }

    /// 받은 바이트를 그대로 기록하고 실행 (UTF-8로 바꾸지 않음)
    async fn process_line(&mut self, line: &[u8]) -> Flow {
        if line == EXIT_COMMAND {
            self.write_transcript(b"exit\n").await;
            return Flow::Exit;
        }

        let mut echo = Vec::with_capacity(PROMPT.len() + line.len() + 1);
        echo.extend_from_slice(PROMPT.as_bytes());
        echo.extend_from_slice(line);
        echo.push(b'\n');
        self.write_transcript(&echo).await;

        let mut sink = CombinedSink::new(&mut *self.terminal, &mut *self.transcript);
        match ParsedCommand::parse(line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                if let Err(e) = self.runner.execute(&command, &mut sink).await {
                    sink.write_line(&e.to_string()).await;
                }
            }
            Err(e) => sink.write_line(&e.to_string()).await,
        }

        self.prompt().await;
        Flow::Continue
    }

    async fn prompt(&mut self) {
        self.write_terminal(PROMPT.as_bytes()).await;
    }

    async fn write_terminal(&mut self, bytes: &[u8]) {
        let result = async {
            self.terminal.write_all(bytes).await?;
            self.terminal.flush().await
        }
        .await;
        if let Err(e) = result {
            tracing::debug!(identity = %self.identity(), "terminal write failed: {}", e);
        }
    }

    async fn write_transcript(&mut self, bytes: &[u8]) {
        let result = async {
            self.transcript.write_all(bytes).await?;
            self.transcript.flush().await
        }
        .await;
        if let Err(e) = result {
            tracing::warn!(identity = %self.identity(), "transcript write failed: {}", e);
        }
    }

    fn identity(&self) -> &str {
        self.config.identity.as_deref().unwrap_or("local")
    }
}

/// 줄 끝의 `\n`, `\r\n`만 제거
fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    line.strip_suffix(b"\r").unwrap_or(line)
}

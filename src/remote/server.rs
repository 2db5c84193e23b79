use crate::error::{Result, ShellError};
use crate::logger::Logger;
use crate::remote::auth::{self, AuthOutcome, Secret};
use crate::shell::session::{Session, SessionConfig, SessionEnd, GOODBYE};
use crate::shell::transcript::TranscriptSink;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// 서버 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 바인딩 주소 (예: 0.0.0.0:8080)
    pub address: String,
    pub secret: Secret,
    /// 트랜스크립트 저장 디렉토리 (이미 존재해야 함)
    pub transcript_dir: PathBuf,
}

/// 원격 셸 서버
///
/// 연결마다 별도 태스크에서 인증 후 세션을 실행합니다.
/// 동시 연결 수에는 제한이 없습니다.
pub struct Server {
    config: ServerConfig,
    logger: Logger,
    /// 마지막으로 발급한 트랜스크립트 번호
    transcript_counter: AtomicU64,
}

impl Server {
    pub fn new(config: ServerConfig, logger: Logger) -> Self {
        Self {
            config,
            logger,
            transcript_counter: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// 다음 트랜스크립트 번호 (1부터 시작, 중복 없음)
    pub fn next_transcript_number(&self) -> u64 {
        self.transcript_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn transcript_path(&self, number: u64) -> PathBuf {
        self.config
            .transcript_dir
            .join(format!("transcript-{}.txt", number))
    }

    /// 리스너 생성
    pub async fn bind(&self) -> Result<TcpListener> {
        self.logger
            .log(format_args!("Starting listener on {}", self.config.address));

        let listener = TcpListener::bind(&self.config.address)
            .await
            .map_err(|source| ShellError::BindError {
                address: self.config.address.clone(),
                source,
            });
        match listener {
            Ok(listener) => {
                self.logger.log("Listener created.");
                Ok(listener)
            }
            Err(e) => {
                self.logger.log(&e);
                Err(e)
            }
        }
    }

    /// 연결 수락 루프 (수락 실패 시에만 반환)
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> Result<()> {
        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    let err = ShellError::AcceptError(e);
                    self.logger.log(&err);
                    return Err(err);
                }
            };
            self.logger
                .log(format_args!("Accepting connection from {}", peer));

            // 각 연결을 별도 태스크로 처리
            let server = Arc::clone(&self);
            tokio::spawn(async move {
                server.handle(stream, peer).await;
            });
        }
    }

    pub async fn listen_and_serve(self: Arc<Self>) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// 연결 하나 처리: 인증 → 트랜스크립트 → 세션 → 종료
    async fn handle(&self, stream: TcpStream, peer: SocketAddr) {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        if auth::challenge(&self.config.secret, &mut reader, &mut writer).await
            == AuthOutcome::Denied
        {
            self.logger.log(format_args!("FAILED LOGIN from {}", peer));
            return;
        }
        self.logger
            .log(format_args!("SUCCESSFUL LOGIN from {}", peer));

        let mut transcript = self.open_transcript().await;

        let config = SessionConfig {
            welcome: true,
            identity: Some(peer.to_string()),
            logger: self.logger.clone(),
        };
        let end = Session::new(&mut reader, &mut writer, &mut transcript, config)
            .run()
            .await;

        if end != SessionEnd::Exit {
            let _ = writer
                .write_all(format!("{}\n", GOODBYE).as_bytes())
                .await;
        }
        if let Err(e) = transcript.shutdown().await {
            tracing::warn!(%peer, "failed to close transcript: {}", e);
        }
        let _ = writer.shutdown().await;
    }

    async fn open_transcript(&self) -> TranscriptSink {
        let path = self.transcript_path(self.next_transcript_number());
        match TranscriptSink::create(&path).await {
            Ok(transcript) => {
                self.logger.log(format_args!(
                    "Transcript for new session available at {}",
                    path.display()
                ));
                transcript
            }
            Err(e) => {
                self.logger.log(&e);
                TranscriptSink::unavailable()
            }
        }
    }
}

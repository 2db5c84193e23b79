use crate::cli::LocalArgs;
use colored::*;
use spysh::remote::auth::{self, AuthOutcome, Secret};
use spysh::shell::{Session, SessionConfig, TranscriptSink};
use spysh::Logger;
use tokio::io::{self, AsyncWriteExt, BufReader};

/// 현재 터미널(stdin/stdout)에서 세션 실행
pub async fn run_local(args: LocalArgs) -> spysh::Result<()> {
    let mut input = BufReader::new(io::stdin());
    let mut terminal = io::stdout();

    // 로컬 세션은 인증 없음
    if auth::challenge(&Secret::None, &mut input, &mut terminal).await == AuthOutcome::Denied {
        return Ok(());
    }

    let logger = Logger::stderr();
    let mut transcript = match TranscriptSink::create(&args.transcript).await {
        Ok(transcript) => {
            eprintln!(
                "{} Transcript: {}",
                "[OK]".green(),
                args.transcript.display()
            );
            transcript
        }
        Err(e) => {
            logger.log(&e);
            TranscriptSink::unavailable()
        }
    };

    let config = SessionConfig {
        welcome: false,
        identity: None,
        logger,
    };
    Session::new(&mut input, &mut terminal, &mut transcript, config)
        .run()
        .await;

    transcript.shutdown().await?;
    terminal.flush().await?;
    Ok(())
}

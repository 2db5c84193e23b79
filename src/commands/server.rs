use crate::cli::ServerArgs;
use colored::*;
use spysh::config::{ensure_directory, Settings};
use spysh::error::{Result, ShellError};
use spysh::remote::{Secret, Server};
use spysh::Logger;
use std::fs::OpenOptions;
use std::sync::Arc;

/// 서버 실행 (리스너 에러 전까지 반환하지 않음)
pub async fn run_server(args: ServerArgs) -> Result<()> {
    let settings = resolve_settings(&args)?;
    if settings.transcript_dir.is_none() {
        eprintln!(
            "{} Transcript directory not set, defaulting to {}",
            "[!]".yellow(),
            Settings::default_transcript_dir()?.display()
        );
    }

    let config = settings.server_config()?;
    ensure_directory(&config.transcript_dir)?;
    if config.secret == Secret::None {
        eprintln!(
            "{} Authentication disabled: anyone who can connect gets a shell",
            "[!]".yellow()
        );
    }

    let logger = match &args.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    ShellError::ConfigError(format!(
                        "Failed to open log file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            Logger::new(file)
        }
        None => Logger::stderr(),
    };

    eprintln!(
        "{} Starting spysh on {}",
        "[>>]".cyan().bold(),
        config.address
    );
    eprintln!("  Transcripts: {}", config.transcript_dir.display());

    let server = Arc::new(Server::new(config, logger));
    server.listen_and_serve().await
}

/// 설정 파일 → 환경 변수/플래그 순으로 덮어씀
fn resolve_settings(args: &ServerArgs) -> Result<Settings> {
    let mut settings = match args.config.clone().or_else(Settings::default_path) {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };

    if let Some(host) = &args.host {
        settings.host = host.clone();
    }
    if let Some(port) = args.port {
        settings.port = Some(port);
    }
    if let Some(password) = &args.password {
        settings.password = Some(password.clone());
    }
    if args.no_auth {
        settings.no_auth = true;
    }
    if let Some(dir) = &args.transcript_dir {
        settings.transcript_dir = Some(dir.clone());
    }

    Ok(settings)
}

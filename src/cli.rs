use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spysh")]
#[command(version)]
#[command(about = "Password-protected remote shell that records every session", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// TCP 서버 실행
    Server(ServerArgs),
    /// 현재 터미널에서 세션 하나 실행
    Local(LocalArgs),
}

#[derive(Args, Debug)]
pub struct ServerArgs {
    /// 바인딩 호스트 (기본값 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// 포트
    #[arg(short = 'p', long, env = "PORT")]
    pub port: Option<u16>,

    /// 접속 비밀번호
    #[arg(long, env = "PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// 비밀번호 없이 접속 허용 (비밀번호가 지정되면 무시됨)
    #[arg(long)]
    pub no_auth: bool,

    /// 트랜스크립트 디렉토리 (기본값 ./transcripts)
    #[arg(long, env = "LOG_DIR")]
    pub transcript_dir: Option<PathBuf>,

    /// 설정 파일 경로 (기본값 ~/.spysh/config.toml)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// 서버 로그를 stderr 대신 이 파일에 추가
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct LocalArgs {
    /// 트랜스크립트 파일
    #[arg(short = 't', long, default_value = "transcript.txt")]
    pub transcript: PathBuf,
}

use crate::error::{Result, ShellError};
use crate::remote::{Secret, ServerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// spysh 서버 설정
///
/// 설정 파일은 기본적으로 ~/.spysh/config.toml에 있으며,
/// CLI 플래그와 환경 변수가 파일 값보다 우선합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// 바인딩 호스트
    #[serde(default = "default_host")]
    pub host: String,

    /// 포트 (필수, 파일/환경 변수/플래그 중 하나로 지정)
    #[serde(default)]
    pub port: Option<u16>,

    /// 접속 비밀번호
    #[serde(default)]
    pub password: Option<String>,

    /// 비밀번호 없이 접속 허용
    #[serde(default)]
    pub no_auth: bool,

    /// 트랜스크립트 디렉토리 (미지정 시 ./transcripts)
    #[serde(default)]
    pub transcript_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            password: None,
            no_auth: false,
            transcript_dir: None,
        }
    }
}

impl Settings {
    /// 기본 설정 파일 경로
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".spysh").join("config.toml"))
    }

    /// 설정 파일에서 로드 (없으면 기본값 사용)
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            ShellError::ConfigError(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// 기본 트랜스크립트 디렉토리 (현재 디렉토리 아래 transcripts)
    pub fn default_transcript_dir() -> Result<PathBuf> {
        Ok(std::env::current_dir()?.join("transcripts"))
    }

    /// 검증 후 서버 설정으로 변환
    pub fn server_config(&self) -> Result<ServerConfig> {
        let port = self.port.ok_or_else(|| {
            ShellError::ConfigError(
                "PORT must be set (--port, PORT environment variable or config file)".to_string(),
            )
        })?;

        let secret = match self.password.as_deref() {
            Some(password) if !password.is_empty() => Secret::Required(password.to_string()),
            _ if self.no_auth => Secret::None,
            _ => {
                return Err(ShellError::ConfigError(
                    "PASSWORD must be set (--password, PASSWORD environment variable or config file), or pass --no-auth".to_string(),
                ))
            }
        };

        let transcript_dir = match &self.transcript_dir {
            Some(dir) => dir.clone(),
            None => Self::default_transcript_dir()?,
        };

        Ok(ServerConfig {
            address: format!("{}:{}", self.host, port),
            secret,
            transcript_dir,
        })
    }
}

/// 디렉토리가 없으면 생성, 디렉토리가 아닌 파일이면 에러
pub fn ensure_directory(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ShellError::ConfigError(format!(
            "path {} is not a directory",
            path.display()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(path)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// 리스너 바인딩 실패 (서버 종료)
    #[error("Failed to bind {address}: {source}")]
    BindError {
        address: String,
        source: std::io::Error,
    },

    /// 연결 수락 실패 (서버 종료)
    #[error("connection error: {0}")]
    AcceptError(std::io::Error),

    #[error("unbalanced quotes or backslashes in [{0}]")]
    UnbalancedQuotes(String),

    #[error("failed to execute \"{program}\": {source}")]
    SpawnError {
        program: String,
        source: std::io::Error,
    },

    /// 0이 아닌 종료 코드 (ExitStatus의 Display 그대로)
    #[error("{0}")]
    CommandFailed(String),

    #[error("open {}: {source}", path.display())]
    TranscriptCreateError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbalanced_message_keeps_line() {
        let err = ShellError::UnbalancedQuotes("'''".to_string());
        assert_eq!(err.to_string(), "unbalanced quotes or backslashes in [''']");
    }

    #[test]
    fn test_transcript_error_names_path() {
        let err = ShellError::TranscriptCreateError {
            path: PathBuf::from("/tmp/x/transcript-1.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().starts_with("open /tmp/x/transcript-1.txt: "));
    }
}

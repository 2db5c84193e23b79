//! 인증된 원격 셸 서버와 세션 트랜스크립트

pub mod config;
pub mod error;
pub mod logger;
pub mod remote;
pub mod shell;

pub use error::{Result, ShellError};
pub use logger::Logger;

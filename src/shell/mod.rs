pub mod parser;
pub mod runner;
pub mod session;
pub mod tee;
pub mod transcript;

pub use parser::ParsedCommand;
pub use session::{Session, SessionConfig, SessionEnd, SessionState};
pub use transcript::TranscriptSink;

pub mod auth;
pub mod server;

pub use auth::{AuthOutcome, Secret};
pub use server::{Server, ServerConfig};

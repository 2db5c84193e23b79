pub mod local;
pub mod server;

pub use local::run_local;
pub use server::run_server;

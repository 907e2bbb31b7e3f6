pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use routes::build_router;
pub use server::serve;

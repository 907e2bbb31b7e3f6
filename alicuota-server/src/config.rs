use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::error::{ServerError, ServerResult};

/// HTTP service answering tax-rate (alícuota) queries.
///
/// Loads the dataset once at startup and serves `/api/options` and
/// `/api/alicuota`. A dataset that fails to load is logged and replaced by an
/// empty one so the service stays reachable.
#[derive(Debug, Clone, Parser)]
#[command(name = "alicuota-server")]
#[command(version, about, long_about = None)]
pub struct ServerConfig {
    /// CSV file with the tax-rate dataset.
    #[arg(long, env = "ALICUOTA_DATA", default_value = "data/base_sellos.csv")]
    pub data: PathBuf,

    /// Interface to listen on.
    #[arg(long, env = "ALICUOTA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "ALICUOTA_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Log level or full filter directive; `RUST_LOG` takes precedence.
    #[arg(long, env = "ALICUOTA_LOG", default_value = "info")]
    pub log_level: String,

    /// Also append log output to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn bind_address(&self) -> ServerResult<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ServerError::InvalidAddress(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

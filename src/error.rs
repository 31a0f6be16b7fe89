use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PsshError {
    #[error("Error retrieving node list from master host: {host} ({detail})")]
    InventoryParse { host: String, detail: String },
    #[error("Could not connect to the puppet master host: {host} ({source})")]
    InventoryUnreachable {
        host: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(
        "parallel-ssh command not found in {}. Install it or use --pssh-path argument.",
        .0.display()
    )]
    ExecutorNotFound(PathBuf),
    #[error("Invalid match pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("Invalid nameserver address: {0}")]
    InvalidNameserver(String),
    #[error("Failed to access host list {}: {source}", path.display())]
    HostList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to execute local command: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
    #[error("Interrupted while parallel-ssh was running")]
    Interrupted,
}

//! The host list file handed to parallel-ssh.
//!
//! One address per line, no duplicates. With caching on, an existing file
//! is taken as-is and nothing gets resolved.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::PsshError;
use crate::log::Logger;
use crate::resolve::Resolver;

pub struct HostList {
    path: PathBuf,
    use_cache: bool,
}

impl HostList {
    pub fn new(path: impl Into<PathBuf>, use_cache: bool) -> Self {
        Self {
            path: path.into(),
            use_cache,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the addresses written to (or read from) `self.path()`.
    pub async fn build(
        &self,
        nodes: &[String],
        resolver: &(dyn Resolver + Send + Sync),
        log: &Logger,
    ) -> Result<Vec<String>, PsshError> {
        if self.use_cache && self.path.exists() {
            log.warn(format!("Using cached hostlist in {}", self.path.display()));
            return self.read();
        }

        log.info("Generating hostlist...");
        log.debug(format!("Hostlist path: {}", self.path.display()));
        self.remove()?;

        let mut resolved = Vec::with_capacity(nodes.len());
        for node in nodes {
            if let Some(address) = resolver.resolve(node, log).await? {
                log.debug(format!("Adding {}", address));
                resolved.push(address);
            }
        }
        let addresses: Vec<String> = resolved.into_iter().unique().collect();

        self.write(&addresses)?;
        Ok(addresses)
    }

    fn read(&self) -> Result<Vec<String>, PsshError> {
        let content = fs::read(&self.path).map_err(|e| self.io_error(e))?;
        Ok(String::from_utf8_lossy(&content)
            .lines()
            .map(str::to_string)
            .collect())
    }

    fn remove(&self) -> Result<(), PsshError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(self.io_error(e)),
            _ => Ok(()),
        }
    }

    fn write(&self, addresses: &[String]) -> Result<(), PsshError> {
        let mut file = fs::File::create(&self.path).map_err(|e| self.io_error(e))?;
        for address in addresses {
            writeln!(file, "{}", address).map_err(|e| self.io_error(e))?;
        }
        file.flush().map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> PsshError {
        PsshError::HostList {
            path: self.path.clone(),
            source,
        }
    }
}

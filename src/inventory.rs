//! PuppetDB client.
//!
//! Every call is a single GET; nothing is retried. A connection-level
//! failure becomes `InventoryUnreachable`, anything that doesn't decode to
//! the expected document (including non-2xx replies) becomes `InventoryParse`.

use std::collections::BTreeMap;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::config::InventoryArgs;
use crate::error::PsshError;
use crate::log::Logger;

/// Facts of a single node, sorted by name.
pub type Facts = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Active,
    Deactivated,
}

impl Activation {
    /// The `query` parameter selecting nodes in this state.
    pub fn query(self) -> String {
        let active = self == Activation::Active;
        serde_json::json!(["=", ["node", "active"], active]).to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NodeStatus {
    /// Deactivation time, `None` while the node is active.
    #[serde(default)]
    pub deactivated: Option<String>,
    #[serde(default)]
    pub catalog_timestamp: Option<String>,
    #[serde(default)]
    pub facts_timestamp: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeCount {
    pub active: usize,
    pub deactivated: usize,
}

impl NodeCount {
    pub fn total(&self) -> usize {
        self.active + self.deactivated
    }
}

#[derive(Deserialize)]
struct FactsResponse {
    facts: Facts,
}

#[derive(Clone)]
pub struct InventoryClient {
    host: String,
    base: Url,
    client: Client,
}

impl InventoryClient {
    pub fn new(host: &str, port: u16, use_ssl: bool) -> Result<Self, PsshError> {
        let scheme = if use_ssl { "https" } else { "http" };
        let base = Url::parse(&format!("{}://{}:{}/", scheme, host, port)).map_err(|e| {
            PsshError::InventoryParse {
                host: host.to_string(),
                detail: format!("invalid master url: {}", e),
            }
        })?;
        Ok(Self {
            host: host.to_string(),
            base,
            client: Client::new(),
        })
    }

    pub fn from_args(args: &InventoryArgs) -> Result<Self, PsshError> {
        Self::new(&args.puppetmaster, args.puppetmaster_port, args.use_ssl)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Names of the nodes in the given activation state, in server order.
    pub async fn nodes(&self, state: Activation) -> Result<Vec<String>, PsshError> {
        let mut url = self.url(&["nodes"])?;
        url.query_pairs_mut().append_pair("query", &state.query());
        self.get_json(url).await
    }

    /// Active nodes, followed by deactivated ones when asked for.
    pub async fn discover(
        &self,
        include_deactivated: bool,
        log: &Logger,
    ) -> Result<Vec<String>, PsshError> {
        log.debug(format!("Puppet master host: {}", self.host));
        log.debug(format!("Puppet master url: {}", self.base));
        let mut nodes = self.nodes(Activation::Active).await?;
        if include_deactivated {
            nodes.extend(self.nodes(Activation::Deactivated).await?);
        }
        log.debug(format!("{} nodes registered", nodes.len()));
        Ok(nodes)
    }

    pub async fn count(&self) -> Result<NodeCount, PsshError> {
        Ok(NodeCount {
            active: self.nodes(Activation::Active).await?.len(),
            deactivated: self.nodes(Activation::Deactivated).await?.len(),
        })
    }

    pub async fn facts(&self, node: &str) -> Result<Facts, PsshError> {
        let url = self.url(&["facts", node])?;
        let response: FactsResponse = self.get_json(url).await?;
        Ok(response.facts)
    }

    pub async fn status(&self, node: &str) -> Result<NodeStatus, PsshError> {
        let url = self.url(&["status", "nodes", node])?;
        self.get_json(url).await
    }

    fn url(&self, segments: &[&str]) -> Result<Url, PsshError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| self.parse_error("master url cannot take a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, PsshError> {
        let response = self.client.get(url.clone()).send().await.map_err(|source| {
            PsshError::InventoryUnreachable {
                host: self.host.clone(),
                source,
            }
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(self.parse_error(&format!("{} returned {}", url.path(), status)));
        }
        let body = response.text().await.map_err(|source| PsshError::InventoryUnreachable {
            host: self.host.clone(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|e| self.parse_error(&format!("{}: {}", url.path(), e)))
    }

    fn parse_error(&self, detail: &str) -> PsshError {
        PsshError::InventoryParse {
            host: self.host.clone(),
            detail: detail.to_string(),
        }
    }
}

//! Turning node names into addresses parallel-ssh can connect to.

use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use serde_json::Value;

use crate::error::PsshError;
use crate::inventory::InventoryClient;
use crate::log::Logger;

/// `Ok(None)` means the node is left out of the host list.
#[async_trait]
pub trait Resolver {
    async fn resolve(&self, node: &str, log: &Logger) -> Result<Option<String>, PsshError>;
}

/// The node name is the address.
pub struct IdentityResolver;

#[async_trait]
impl Resolver for IdentityResolver {
    async fn resolve(&self, node: &str, _log: &Logger) -> Result<Option<String>, PsshError> {
        Ok(Some(node.to_string()))
    }
}

/// Forward lookup against one specific nameserver.
pub struct DnsResolver {
    resolver: TokioAsyncResolver,
}

impl DnsResolver {
    /// `nameserver` is an IP address, optionally with a port.
    pub fn new(nameserver: &str) -> Result<Self, PsshError> {
        Self::with_opts(nameserver, ResolverOpts::default())
    }

    pub fn with_opts(nameserver: &str, opts: ResolverOpts) -> Result<Self, PsshError> {
        let addr = match nameserver.parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(_) => nameserver
                .parse::<IpAddr>()
                .map(|ip| SocketAddr::new(ip, 53))
                .map_err(|_| PsshError::InvalidNameserver(nameserver.to_string()))?,
        };
        let group = NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true);
        let config = ResolverConfig::from_parts(None, vec![], group);
        Ok(Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        })
    }
}

#[async_trait]
impl Resolver for DnsResolver {
    async fn resolve(&self, node: &str, log: &Logger) -> Result<Option<String>, PsshError> {
        match self.resolver.lookup_ip(node).await {
            Ok(lookup) => match lookup.iter().next() {
                Some(ip) => Ok(Some(ip.to_string())),
                None => {
                    log.debug(format!("No address for {}, skipping", node));
                    Ok(None)
                }
            },
            Err(e) => {
                log.debug(format!("Could not resolve {}: {}, skipping", node, e));
                Ok(None)
            }
        }
    }
}

/// Reads the address from a node fact, falling back to the node name.
pub struct FactResolver {
    client: InventoryClient,
    fact: String,
}

impl FactResolver {
    pub fn new(client: InventoryClient, fact: &str) -> Self {
        Self {
            client,
            fact: fact.to_string(),
        }
    }
}

#[async_trait]
impl Resolver for FactResolver {
    async fn resolve(&self, node: &str, log: &Logger) -> Result<Option<String>, PsshError> {
        let facts = self.client.facts(node).await?;
        match facts.get(&self.fact) {
            Some(value) => Ok(Some(fact_to_string(value))),
            None => {
                log.warn(format!(
                    "Fact {} not found for {}, using the node name",
                    self.fact, node
                ));
                Ok(Some(node.to_string()))
            }
        }
    }
}

/// Strings lose their quotes; everything else is printed as JSON.
pub fn fact_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

//! Printing what `list` and `count-nodes` found.

use std::io::Write;

use crate::config::ListArgs;
use crate::error::PsshError;
use crate::inventory::{InventoryClient, NodeCount, NodeStatus};
use crate::log::Logger;
use crate::resolve::fact_to_string;

/// Printed in place of a fact the node doesn't have.
pub const FACT_NOT_FOUND: &str = "fact_not_found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportMode {
    Plain,
    AllFacts,
    Fact(String),
    /// Nodes having at least one of these facts.
    WithFacts(Vec<String>),
    Status,
}

impl From<&ListArgs> for ReportMode {
    fn from(args: &ListArgs) -> Self {
        if args.status {
            ReportMode::Status
        } else if args.all_facts {
            ReportMode::AllFacts
        } else if let Some(fact) = &args.fact {
            ReportMode::Fact(fact.clone())
        } else if let Some(facts) = &args.with_facts {
            ReportMode::WithFacts(facts.iter().map(|f| f.trim().to_string()).collect())
        } else {
            ReportMode::Plain
        }
    }
}

pub struct Reporter<'a, W> {
    out: W,
    client: &'a InventoryClient,
}

impl<'a, W: Write> Reporter<'a, W> {
    pub fn new(out: W, client: &'a InventoryClient) -> Self {
        Self { out, client }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Non-plain modes query PuppetDB once per node, one node at a time.
    pub async fn report(
        &mut self,
        mode: &ReportMode,
        nodes: &[String],
        log: &Logger,
    ) -> Result<(), PsshError> {
        if !matches!(mode, ReportMode::Plain) {
            log.debug(format!("Querying {} nodes one by one", nodes.len()));
        }
        for node in nodes {
            match mode {
                ReportMode::Plain => self.line(node)?,
                ReportMode::AllFacts => {
                    let facts = self.client.facts(node).await?;
                    let pretty = serde_json::to_string_pretty(&facts).map_err(|e| {
                        PsshError::InventoryParse {
                            host: node.clone(),
                            detail: e.to_string(),
                        }
                    })?;
                    self.line(node)?;
                    self.line(&pretty)?;
                }
                ReportMode::Fact(name) => {
                    let facts = self.client.facts(node).await?;
                    let value = facts
                        .get(name)
                        .map(fact_to_string)
                        .unwrap_or_else(|| FACT_NOT_FOUND.to_string());
                    self.line(node)?;
                    self.line(&format!("  {}: {}", name, value))?;
                }
                ReportMode::WithFacts(wanted) => {
                    let facts = self.client.facts(node).await?;
                    if wanted.iter().any(|f| facts.contains_key(f)) {
                        self.line(node)?;
                    }
                }
                ReportMode::Status => {
                    let status = self.client.status(node).await?;
                    self.line(node)?;
                    self.line(&format_status(&status))?;
                }
            }
        }
        self.out.flush().map_err(PsshError::Output)
    }

    pub fn count(&mut self, count: &NodeCount) -> Result<(), PsshError> {
        self.line(&format!("active: {}", count.active))?;
        self.line(&format!("deactivated: {}", count.deactivated))?;
        self.line(&format!("total: {}", count.total()))
    }

    fn line(&mut self, text: &str) -> Result<(), PsshError> {
        writeln!(self.out, "{}", text).map_err(PsshError::Output)
    }
}

/// The labeled status lines printed under a node name.
pub fn format_status(status: &NodeStatus) -> String {
    let deactivated = match &status.deactivated {
        Some(when) => format!("yes ({})", when),
        None => "no".to_string(),
    };
    let never = "never";
    format!(
        "  deactivated: {}\n  catalog_timestamp: {}\n  facts_timestamp: {}",
        deactivated,
        status.catalog_timestamp.as_deref().unwrap_or(never),
        status.facts_timestamp.as_deref().unwrap_or(never),
    )
}

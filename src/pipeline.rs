//! The three subcommands, from PuppetDB query to output.

use std::io::Write;

use crate::config::{InventoryArgs, ListArgs, RunArgs};
use crate::error::PsshError;
use crate::executor::{Executor, RunOutcome, RunSpec};
use crate::filter::NodeFilter;
use crate::hostlist::HostList;
use crate::inventory::InventoryClient;
use crate::log::Logger;
use crate::report::{ReportMode, Reporter};
use crate::resolve::{DnsResolver, FactResolver, IdentityResolver, Resolver};

/// Registered nodes matching `--match`.
pub async fn matching_nodes(
    client: &InventoryClient,
    args: &InventoryArgs,
    log: &Logger,
) -> Result<Vec<String>, PsshError> {
    let filter = NodeFilter::new(&args.pattern)?;
    let nodes = client.discover(args.deactivated, log).await?;
    Ok(filter.filter(nodes))
}

pub fn resolver_for(
    args: &RunArgs,
    client: &InventoryClient,
    log: &Logger,
) -> Result<Box<dyn Resolver + Send + Sync>, PsshError> {
    if let Some(nameserver) = &args.nameserver {
        log.info(format!("DNS Server: {}", nameserver));
        log.info("Resolving node names... (may take a while)");
        Ok(Box::new(DnsResolver::new(nameserver)?))
    } else if args.use_ipaddress_fact {
        log.info(format!("Using the {} fact as node address", args.fact));
        Ok(Box::new(FactResolver::new(client.clone(), &args.fact)))
    } else {
        Ok(Box::new(IdentityResolver))
    }
}

impl From<&RunArgs> for RunSpec {
    fn from(args: &RunArgs) -> Self {
        Self {
            command: args.command.clone(),
            threads: args.threads,
            timeout: args.timeout,
            host_key_verify: args.host_key_verify,
            extra_args: args.extra_args.clone(),
            user: args.user.clone(),
            splay: args.splay,
            output_dir: args.node_output_path.clone(),
        }
    }
}

pub async fn run(args: &RunArgs, log: &Logger) -> Result<RunOutcome, PsshError> {
    // Checked before anything touches the network.
    let executor = Executor::locate(&args.pssh_path)?;

    let client = InventoryClient::from_args(&args.inventory)?;
    let nodes = matching_nodes(&client, &args.inventory, log).await?;
    let resolver = resolver_for(args, &client, log)?;

    let hostlist = HostList::new(&args.hostlist_path, args.cached_hostlist);
    let targets = hostlist.build(&nodes, resolver.as_ref(), log).await?;

    executor
        .run(&RunSpec::from(args), hostlist.path(), &targets, log)
        .await
}

pub async fn list<W: Write>(args: &ListArgs, out: W, log: &Logger) -> Result<W, PsshError> {
    let client = InventoryClient::from_args(&args.inventory)?;
    let nodes = matching_nodes(&client, &args.inventory, log).await?;
    let mut reporter = Reporter::new(out, &client);
    reporter.report(&ReportMode::from(args), &nodes, log).await?;
    Ok(reporter.into_inner())
}

/// Counts every registered node; `--match` does not apply.
pub async fn count_nodes<W: Write>(
    args: &InventoryArgs,
    out: W,
    log: &Logger,
) -> Result<W, PsshError> {
    let client = InventoryClient::from_args(args)?;
    log.debug(format!("Counting nodes on {}", client.base_url()));
    let count = client.count().await?;
    let mut reporter = Reporter::new(out, &client);
    reporter.count(&count)?;
    Ok(reporter.into_inner())
}

//! Configuration for puppet-pssh.
//!
//! Currently holds clap structs for command line arguments and flags.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run an arbitrary command against the nodes
    Run(RunArgs),
    /// List registered nodes
    List(ListArgs),
    /// Count active and deactivated nodes
    CountNodes(InventoryArgs),
}

impl Command {
    pub fn inventory(&self) -> &InventoryArgs {
        match self {
            Command::Run(args) => &args.inventory,
            Command::List(args) => &args.inventory,
            Command::CountNodes(args) => args,
        }
    }
}

/// Options shared by every subcommand that talks to PuppetDB.
#[derive(Args, Clone, Debug)]
pub struct InventoryArgs {
    /// Only the nodes matching the regex
    #[arg(long = "match", short = 'm', default_value = ".*")]
    pub pattern: String,

    /// Puppet master host
    #[arg(long, short = 'p', default_value = "puppet")]
    pub puppetmaster: String,

    /// Puppet master port
    #[arg(long, default_value = "8080")]
    pub puppetmaster_port: u16,

    /// Use SSL (https) to communicate with the puppetmaster
    #[arg(long)]
    pub use_ssl: bool,

    /// Include deactivated nodes
    #[arg(long)]
    pub deactivated: bool,

    /// Print debugging output
    #[arg(long)]
    pub debug: bool,
}

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub inventory: InventoryArgs,

    /// Resolve node names using the given nameserver (IP or IP:PORT)
    #[arg(long)]
    pub nameserver: Option<String>,

    /// Use a node fact as the address to connect to
    #[arg(long, conflicts_with = "nameserver")]
    pub use_ipaddress_fact: bool,

    /// Fact read by --use-ipaddress-fact
    #[arg(long, default_value = "ipaddress")]
    pub fact: String,

    /// Parallel-ssh command path
    #[arg(long, default_value = "/usr/bin/parallel-ssh")]
    pub pssh_path: PathBuf,

    /// Save host list to path
    #[arg(long, short = 'H', default_value = "/tmp/puppet-pssh-run-hostlist")]
    pub hostlist_path: PathBuf,

    /// Reuse the host list at --hostlist-path if it exists
    #[arg(long)]
    pub cached_hostlist: bool,

    /// Directory for per-node output
    #[arg(long, short = 'o', default_value = "/tmp/")]
    pub node_output_path: PathBuf,

    /// Don't verify SSH host keys
    #[arg(long = "no-host-key-verify", action = clap::ArgAction::SetFalse)]
    pub host_key_verify: bool,

    /// Maximum number of simultaneous connections
    #[arg(long, short, default_value = "40")]
    pub threads: usize,

    /// Per-host timeout in seconds
    #[arg(long, default_value = "300")]
    pub timeout: u64,

    /// Sleep a random number of seconds on each node before running the command
    #[arg(long)]
    pub splay: bool,

    /// Extra argument passed verbatim to parallel-ssh (repeatable)
    #[arg(long, short, allow_hyphen_values = true)]
    pub extra_args: Vec<String>,

    /// Remote user
    #[arg(long, short = 'l')]
    pub user: Option<String>,

    /// Command to run
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[derive(Args, Clone, Debug)]
#[command(group(
    ArgGroup::new("mode")
        .args(["all_facts", "fact", "with_facts", "status"])
        .multiple(false)
))]
pub struct ListArgs {
    #[command(flatten)]
    pub inventory: InventoryArgs,

    /// Print every fact of each node
    #[arg(long)]
    pub all_facts: bool,

    /// Print the given fact of each node
    #[arg(long)]
    pub fact: Option<String>,

    /// Only nodes having at least one of these facts (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub with_facts: Option<Vec<String>>,

    /// Print deactivation and last update times of each node
    #[arg(long)]
    pub status: bool,
}

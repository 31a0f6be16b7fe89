//! puppet-pssh: run a command with parallel-ssh on the nodes PuppetDB knows about.

// Command line arguments and configuration.
pub mod config;
// Error handling.
pub mod error;
// Leveled logging passed around explicitly.
pub mod log;
// PuppetDB queries.
pub mod inventory;
// Matching node names.
pub mod filter;
// Node name to address.
pub mod resolve;
// The host list file.
pub mod hostlist;
// Running parallel-ssh.
pub mod executor;
// Printing nodes, facts and status.
pub mod report;
// Subcommands wired end to end.
pub mod pipeline;

pub use config::{Command, Config, InventoryArgs, ListArgs, RunArgs};
pub use error::PsshError;
pub use executor::{Executor, RunOutcome, RunSpec};
pub use filter::NodeFilter;
pub use hostlist::HostList;
pub use inventory::{Activation, Facts, InventoryClient, NodeCount, NodeStatus};
pub use log::{Level, Logger};
pub use report::{ReportMode, Reporter};
pub use resolve::{DnsResolver, FactResolver, IdentityResolver, Resolver};

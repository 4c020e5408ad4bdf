// src/cli/commands.rs
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// GhostRider CLI - inspect chain orders, tuning tables and huge pages
#[derive(Parser, Debug)]
#[command(name = "ghostrider")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The action to perform
    #[command(subcommand)]
    pub action: Action,
}

/// Top-level commands of the ghostrider binary
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Derive the stage order and rotation of a header or block hash
    Order(OrderOptions),

    /// Print the tuning rows and scratch requirements
    Tuning(TuningOptions),

    /// Provision huge pages for a number of worker threads
    Hugepages(HugePagesOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Input of the `order` command, exactly one of the two
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct OrderSource {
    /// 80-byte block header, hex encoded
    #[arg(long)]
    pub header: Option<String>,

    /// 32-byte block hash, hex encoded
    #[arg(long)]
    pub block_hash: Option<String>,
}

/// Options for order inspection
#[derive(Parser, Debug)]
pub struct OrderOptions {
    /// Header or block hash to derive from
    #[command(flatten)]
    pub source: OrderSource,
}

/// Options for printing tuning tables
#[derive(Parser, Debug)]
pub struct TuningOptions {
    /// Only print rows for this lane count
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub lanes: Option<u8>,
}

/// Options for huge-page provisioning
///
/// Values not given on the command line come from the configuration file,
/// or from the configuration defaults without one.
#[derive(Parser, Debug)]
pub struct HugePagesOptions {
    /// Configuration file supplying `worker_threads` and `numa_node`
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of worker threads to provision for
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Pages per thread (default: worst-case scratch size in 2 MiB pages)
    #[arg(short, long)]
    pub pages_per_thread: Option<usize>,

    /// NUMA node
    #[arg(short, long)]
    pub node: Option<usize>,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "ghostrider.toml")]
    pub output: PathBuf,
}

//! Clap derive structures for the `meshgate` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// meshgate -- serve mesh network commands to a host application
#[derive(Debug, Parser)]
#[command(
    name = "meshgate",
    version,
    about = "Serve mesh network commands to a host application",
    long_about = "Loads provisioned mesh network documents and answers host method calls\n\
        (getId, groups, addGroupWithName, ...) with typed, validated replies.\n\
        Calls and replies travel as JSON lines on stdin/stdout.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, env = "MESHGATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer JSON-line method calls from stdin until EOF
    Serve(ServeArgs),

    /// Run a single method call and print its reply
    Call(CallArgs),

    /// Print the method and event channel names of each network
    Channels(NetworkArgs),
}

#[derive(Debug, Args)]
pub struct NetworkArgs {
    /// Network document(s) to load (JSON)
    #[arg(long, short = 'n', value_name = "FILE")]
    pub network: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub networks: NetworkArgs,
}

#[derive(Debug, Args)]
pub struct CallArgs {
    /// Method name, e.g. `groups` or `addGroupWithName`
    pub method: String,

    /// Argument map as a JSON object
    #[arg(long, short = 'a', value_name = "JSON")]
    pub args: Option<String>,

    /// Network document to call into (JSON)
    #[arg(long, short = 'n', value_name = "FILE")]
    pub network: Option<PathBuf>,

    /// Write the network back to its file after the call
    #[arg(long)]
    pub save: bool,
}

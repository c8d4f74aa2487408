//! CLI argument definitions for gopack.
//!
//! Uses `clap` derive macros to define the command surface. Anything that is
//! not a gopack command is handed to the `go` tool.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "gopack",
    version,
    about = "Vendoring dependency manager for Go",
    long_about = "gopack reads gopack.config, fetches every declared dependency (and the \
                  dependencies they declare) into a project-local GOPATH, pins them to the \
                  declared branch, commit or tag, and runs the go tool against that workspace."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Kill a version-control command that runs longer than this many seconds
    #[arg(long, global = true, env = "GOPACK_FETCH_TIMEOUT", value_name = "SECS")]
    pub fetch_timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved dependency tree
    #[command(name = "dependencytree")]
    DependencyTree {
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print statistics about the project's Go sources and their imports
    Stats {
        /// Leave out paths matching this glob (relative to the project root)
        #[arg(long, value_name = "GLOB")]
        exclude: Vec<String>,
    },

    /// Run `go install` for every top-level dependency
    #[command(name = "installdeps")]
    InstallDeps,

    /// Print the gopack version
    Version,

    /// Any other command is passed to `go` with GOPATH set to the vendor workspace
    #[command(external_subcommand)]
    External(Vec<String>),
}

pub fn parse() -> Cli {
    Cli::parse()
}

//! # terrafs entry point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   │
//!   ├─> convert: stderr-only logging, run the JSON to Parquet conversion
//!   │
//!   └─> anything else: file + stderr logging, then
//!       ├─> upload / delete / list: run one command and exit
//!       └─> no command or `repl`: interactive loop until `exit` or EOF
//! ```
//!
//! `terrafs convert` is what the Terraform configuration's provisioner runs
//! during `apply`, so it must not touch the operator's log directory.

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if cli.command.as_ref().is_some_and(cli::Commands::is_provisioner) {
        terrafs::logging::init_stderr()?;
    } else {
        terrafs::logging::init()?;
    }

    cli::run_command(cli)
}

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::io::Write as _;
use std::path::PathBuf;
use terrafs::config::AppConfig;
use terrafs::dataset::DatasetNaming;
use terrafs::repl::{Command, Session};
use terrafs::workspace::{LifecycleManager, TerraformDriver};

#[derive(Parser)]
#[command(
    name = "terrafs",
    version,
    about = "Manage JSON datasets as Terraform workspaces"
)]
pub struct Cli {
    /// Path to a JSON configuration file. Defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Terraform configuration directory; uploads are staged here.
    #[arg(long, global = true, env = "TERRAFS_STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive command loop (the default)
    Repl,
    /// Upload a JSON file and process it
    Upload {
        /// JSON file to upload
        file: String,
    },
    /// Delete an uploaded file, or `all` of them
    Delete {
        /// File name, or `all`
        target: String,
    },
    /// List uploaded files
    List,
    /// Convert a JSON array of objects into a Parquet file
    Convert {
        /// Input JSON file
        input: PathBuf,
        /// Output Parquet file
        output: PathBuf,
    },
}

impl Commands {
    /// True for commands that are invoked by Terraform rather than an operator.
    pub fn is_provisioner(&self) -> bool {
        matches!(self, Self::Convert { .. })
    }
}

pub fn run_command(cli: Cli) -> Result<()> {
    let one_shot = match cli.command.unwrap_or(Commands::Repl) {
        Commands::Convert { input, output } => return handle_convert(&input, &output),
        Commands::Repl => None,
        Commands::Upload { file } => Some(Command::Upload(file)),
        Commands::Delete { target } if target == "all" => Some(Command::DeleteAll),
        Commands::Delete { target } => Some(Command::Delete(target)),
        Commands::List => Some(Command::List),
    };

    let config = load_config(cli.config, cli.staging_dir)?;
    tracing::info!(
        "Using staging directory {} and terraform binary {}",
        config.staging_dir.display(),
        config.terraform_bin
    );
    let mut session = build_session(&config);

    match one_shot {
        None => session
            .run(std::io::stdin().lock(), std::io::stdout())
            .context("REPL I/O failed"),
        Some(command) => {
            let mut out = std::io::stdout().lock();
            session.execute(&command, &mut out)?;
            out.flush()?;
            Ok(())
        }
    }
}

fn load_config(path: Option<PathBuf>, staging_dir: Option<PathBuf>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => AppConfig::load_from(&p)?,
        None => AppConfig::load()?,
    };
    Ok(config.with_env_overrides().with_overrides(staging_dir, None))
}

fn build_session(config: &AppConfig) -> Session<TerraformDriver> {
    let manager = LifecycleManager::new(
        TerraformDriver::from_config(config),
        DatasetNaming::from_config(config),
    );
    Session::new(manager, &config.staging_dir)
}

#[expect(clippy::print_stdout)]
fn handle_convert(input: &std::path::Path, output: &std::path::Path) -> Result<()> {
    let report = terrafs::convert::convert_file(input, output)?;
    tracing::debug!("{} rows, {} columns", report.rows, report.columns);
    println!(
        "Converted {} to {} successfully",
        input.display(),
        report.output.display()
    );
    Ok(())
}

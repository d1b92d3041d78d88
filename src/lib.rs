//! # terrafs - datasets as Terraform resources
//!
//! terrafs treats "uploading a dataset" as an infrastructure lifecycle. A JSON
//! file is staged into a Terraform working directory, a per-file workspace is
//! created or selected, and `terraform apply` runs `terrafs convert` to turn
//! the JSON into a Parquet file. Deleting a dataset destroys its resources and
//! removes the workspace.
//!
//! ## Quick Start
//!
//! ```no_run
//! use terrafs::config::AppConfig;
//! use terrafs::dataset::DatasetNaming;
//! use terrafs::repl::Session;
//! use terrafs::workspace::{LifecycleManager, TerraformDriver};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = AppConfig::load()?.with_env_overrides();
//! let manager = LifecycleManager::new(
//!     TerraformDriver::from_config(&config),
//!     DatasetNaming::from_config(&config),
//! );
//! let mut session = Session::new(manager, &config.staging_dir);
//! session.run(std::io::stdin().lock(), std::io::stdout())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`convert`]: schema inference and JSON to Parquet encoding
//! - [`workspace`]: the per-dataset workspace state machine and the
//!   [`workspace::InfraDriver`] seam to Terraform
//! - [`repl`]: the operator command dispatcher
//! - [`staging`]: copying uploads into the Terraform working directory
//! - [`dataset`]: mapping file names to workspaces and artifacts
//! - [`config`], [`logging`], [`error`]: ambient plumbing
//!
//! ## Conversion Only
//!
//! ```no_run
//! use terrafs::convert::{Record, Value, records_to_batch};
//!
//! let records = vec![
//!     Record::new().with("a", Value::Text("x".to_owned())).with("b", Value::Number(1.5)),
//!     Record::new().with("a", Value::Text("y".to_owned())),
//! ];
//! let batch = records_to_batch(&records)?;
//! assert_eq!(batch.num_rows(), 2);
//! # Ok::<(), terrafs::error::TerrafsError>(())
//! ```

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod convert;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod repl;
pub mod staging;
pub mod workspace;

/// Written into Parquet footers as the producing application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Line-oriented operator commands.
//!
//! A [`Session`] reads one command per line, runs it to completion (including
//! every Terraform invocation it triggers) and prints the outcome before
//! reading the next. Errors are printed and the loop carries on; only `exit`
//! or end of input stops it.

use crate::dataset::DatasetNaming;
use crate::error::Result;
use crate::staging::StagingArea;
use crate::workspace::{InfraDriver, LifecycleManager, UpsertOutcome, WorkspaceRegistry};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

pub const USAGE: &str = "
Usage:
  upload <file>      - Upload a JSON file and process it.
  delete <file>      - Delete a specific uploaded file.
  delete all         - Delete all uploaded files.
  list               - List all uploaded files.
  exit               - Exit the REPL.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(String),
    Delete(String),
    DeleteAll,
    List,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Blank line
    Empty,
    /// Known command with the wrong number of arguments
    Usage(&'static str),
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> std::result::Result<Self, ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => Err(ParseError::Empty),
            ["list"] => Ok(Self::List),
            ["list", ..] => Err(ParseError::Usage("Usage: list")),
            ["upload", file] => Ok(Self::Upload((*file).to_owned())),
            ["upload", ..] => Err(ParseError::Usage("Usage: upload <file>")),
            ["delete", "all"] => Ok(Self::DeleteAll),
            ["delete", file] => Ok(Self::Delete((*file).to_owned())),
            ["delete", ..] => Err(ParseError::Usage("Usage: delete <file>|all")),
            ["exit", ..] => Ok(Self::Exit),
            [other, ..] => Err(ParseError::Unknown((*other).to_owned())),
        }
    }
}

/// Whether the loop should read another line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One operator session: the lifecycle manager, the workspace registry it
/// maintains, and the staging directory uploads go through.
pub struct Session<D> {
    manager: LifecycleManager<D>,
    registry: WorkspaceRegistry,
    staging_dir: PathBuf,
}

impl<D: InfraDriver> Session<D> {
    pub fn new(manager: LifecycleManager<D>, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            manager,
            registry: WorkspaceRegistry::new(),
            staging_dir: staging_dir.into(),
        }
    }

    pub fn registry(&self) -> &WorkspaceRegistry {
        &self.registry
    }

    pub fn manager(&self) -> &LifecycleManager<D> {
        &self.manager
    }

    /// Read commands until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> io::Result<()> {
        writeln!(out, "Starting Terraform FS REPL")?;
        writeln!(out, "{USAGE}")?;

        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            if self.handle_line(&line?, &mut out)? == Flow::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Parse and run a single line, printing its outcome.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(ParseError::Empty) => return Ok(Flow::Continue),
            Err(ParseError::Usage(usage)) => {
                writeln!(out, "{usage}")?;
                return Ok(Flow::Continue);
            }
            Err(ParseError::Unknown(cmd)) => {
                tracing::debug!("Unknown command: {cmd}");
                writeln!(out, "Unknown command.")?;
                writeln!(out, "{USAGE}")?;
                return Ok(Flow::Continue);
            }
        };

        if command == Command::Exit {
            writeln!(out, "Exiting REPL...")?;
            return Ok(Flow::Exit);
        }

        if let Err(e) = self.execute(&command, out) {
            if e.is_validation() {
                tracing::info!("{command:?} rejected: {e}");
            } else {
                tracing::error!("{command:?} failed: {e}");
            }
            writeln!(out, "{e}")?;
        }
        Ok(Flow::Continue)
    }

    /// Run one command. At most one lifecycle operation is performed.
    pub fn execute<W: Write>(&mut self, command: &Command, out: &mut W) -> Result<()> {
        match command {
            Command::Upload(file) => self.upload(file, out),
            Command::Delete(file) => self.delete(file, out),
            Command::DeleteAll => self.delete_all(out),
            Command::List => self.list(out),
            Command::Exit => Ok(()),
        }
    }

    fn staging(&self) -> Result<StagingArea> {
        StagingArea::open(&self.staging_dir)
    }

    fn naming(&self) -> &DatasetNaming {
        self.manager.naming()
    }

    fn upload<W: Write>(&mut self, file: &str, out: &mut W) -> Result<()> {
        let staging = self.staging()?;
        let files = self.naming().for_file(file)?;

        let staged = staging.stage(Path::new(file), &files.file_name)?;

        let outcome = self.manager.upsert(&mut self.registry, &files.workspace)?;
        if outcome == UpsertOutcome::Rewritten {
            writeln!(
                out,
                "Warning: file {} already exists, rewriting",
                files.workspace
            )?;
        }

        self.manager.apply(&self.registry, &files)?;

        // An input that was already in the staging dir belongs to the operator.
        let produced: &[&str] = if staged.copied {
            &[&files.file_name, &files.columnar_file_name]
        } else {
            &[&files.columnar_file_name]
        };
        for warning in staging.cleanup(produced) {
            writeln!(out, "{warning}")?;
        }

        writeln!(
            out,
            "Successfully created {} and {}",
            files.file_name, files.columnar_file_name
        )?;
        Ok(())
    }

    fn delete<W: Write>(&mut self, file: &str, out: &mut W) -> Result<()> {
        self.staging()?;
        let files = self.naming().for_file(file)?;

        self.manager.destroy(&mut self.registry, &files)?;

        writeln!(
            out,
            "Successfully deleted {} and {}",
            files.file_name, files.columnar_file_name
        )?;
        Ok(())
    }

    fn delete_all<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.staging()?;

        let mut destroyed = Vec::new();
        let result = self
            .manager
            .destroy_all_with(&mut self.registry, |name| destroyed.push(name.to_owned()));

        for name in &destroyed {
            let files = self.naming().for_workspace(name)?;
            writeln!(
                out,
                "Successfully deleted {} and {}",
                files.file_name, files.columnar_file_name
            )?;
        }
        result?;

        if destroyed.is_empty() {
            writeln!(out, "No Terraform workspaces to delete.")?;
        } else {
            writeln!(out, "Successfully deleted all files")?;
        }
        Ok(())
    }

    fn list<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.staging()?;

        let entries = self.manager.enumerate(&mut self.registry)?;
        if entries.is_empty() {
            writeln!(out, "No files found")?;
            return Ok(());
        }

        let naming = self.naming();
        writeln!(out, "Available files:")?;
        for entry in entries {
            let marker = if entry.is_active { " *" } else { "" };
            writeln!(out, "- {}{}{marker}", entry.name, naming.data_suffix)?;
            writeln!(
                out,
                "- {}.{}{marker}",
                entry.name, naming.columnar_extension
            )?;
        }
        Ok(())
    }
}

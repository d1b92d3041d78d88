//! The staging directory: Terraform's working directory, where uploads are
//! copied before apply and where the artifact briefly appears.

use crate::error::{Result, ResultExt as _, TerrafsError};
use std::path::{Path, PathBuf};

/// Where a staged input ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    /// False when the source already was the staged file.
    pub copied: bool,
}

#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Open an existing staging directory.
    ///
    /// # Errors
    ///
    /// [`TerrafsError::ConfigMissing`] when the path is absent or not a directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        match std::fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => Ok(Self { dir }),
            Ok(_) => Err(TerrafsError::ConfigMissing(format!(
                "config directory path {} exists but is not a directory",
                dir.display()
            ))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TerrafsError::ConfigMissing(format!(
                    "Terraform config directory does not exist: {}",
                    dir.display()
                )))
            }
            Err(e) => Err(TerrafsError::ConfigMissing(format!(
                "error checking config directory {}: {e}",
                dir.display()
            ))),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Copy `source` into the staging directory under `file_name`.
    ///
    /// A source that already is the staged path is left untouched and
    /// reported with `copied == false`.
    pub fn stage(&self, source: &Path, file_name: &str) -> Result<StagedFile> {
        if !source.is_file() {
            return Err(TerrafsError::Validation(format!(
                "file {} does not exist",
                source.display()
            )));
        }

        let dest = self.path_of(file_name);
        if is_same_file(source, &dest)? {
            tracing::debug!("{} is already staged", dest.display());
            return Ok(StagedFile {
                path: dest,
                copied: false,
            });
        }

        std::fs::copy(source, &dest).with_context(|| {
            format!("failed to copy {} to {}", source.display(), dest.display())
        })?;

        // Staged inputs are readable by the provisioner regardless of the source mode.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt as _;
            std::fs::set_permissions(&dest, std::fs::Permissions::from_mode(0o755))?;
        }

        tracing::debug!("Staged {} as {}", source.display(), dest.display());
        Ok(StagedFile {
            path: dest,
            copied: true,
        })
    }

    /// Remove staged files that exist. Failures are returned as warnings.
    pub fn cleanup(&self, file_names: &[&str]) -> Vec<String> {
        let mut warnings = Vec::new();
        for name in file_names {
            let path = self.path_of(name);
            if !path.exists() {
                continue;
            }
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!("Failed to remove {}: {e}", path.display());
                warnings.push(format!(
                    "Warning: Failed to remove {name} from config directory: {e}"
                ));
            }
        }
        warnings
    }
}

fn is_same_file(source: &Path, dest: &Path) -> Result<bool> {
    if !dest.exists() {
        return Ok(false);
    }
    let source = source
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", source.display()))?;
    let dest = dest
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", dest.display()))?;
    Ok(source == dest)
}

//! Atomic file replacement.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use dprep_model::{PrepError, Result};

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(operation: &'static str, path: &Path, source: std::io::Error) -> PrepError {
    PrepError::Io {
        operation,
        path: path.to_path_buf(),
        source,
    }
}

/// Content written and synced to a temporary sibling of its destination.
///
/// [`StagedFile::commit`] renames it into place; dropping it uncommitted
/// removes the temporary file.
#[derive(Debug)]
pub struct StagedFile {
    temp: PathBuf,
    path: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Write and sync `bytes` next to `path`, creating missing parents.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Io`] naming the failed operation.
    pub fn stage(path: &Path, bytes: &[u8]) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error("create directory", parent, e))?;
        }

        let staged = Self {
            temp: temp_path(path),
            path: path.to_path_buf(),
            committed: false,
        };
        let mut file = File::create(&staged.temp).map_err(|e| io_error("create", &staged.temp, e))?;
        file.write_all(bytes)
            .map_err(|e| io_error("write", &staged.temp, e))?;
        file.sync_all()
            .map_err(|e| io_error("sync", &staged.temp, e))?;
        Ok(staged)
    }

    /// Replace the destination with the staged content.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Io`] if the rename fails.
    pub fn commit(mut self) -> Result<()> {
        fs::rename(&self.temp, &self.path).map_err(|e| io_error("replace", &self.path, e))?;
        self.committed = true;
        tracing::debug!(path = %self.path.display(), "replaced file");
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp);
        }
    }
}

/// Write `bytes` to `path` through a synced temporary sibling and a rename.
///
/// Missing parent directories are created. The temporary file is removed if
/// any step fails.
///
/// # Errors
///
/// Returns [`PrepError::Io`] naming the failed operation.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    StagedFile::stage(path, bytes)?.commit()
}

/// Write several files, replacing none of them unless all could be staged.
///
/// # Errors
///
/// Returns the first staging or rename error. Destinations are untouched
/// when staging fails.
pub fn write_all_atomic(files: &[(&Path, &[u8])]) -> Result<()> {
    let staged = files
        .iter()
        .map(|(path, bytes)| StagedFile::stage(path, bytes))
        .collect::<Result<Vec<_>>>()?;
    for file in staged {
        file.commit()?;
    }
    Ok(())
}

//! # Publishing
//!
//! Renders the discovery document and replaces the output file atomically:
//! the document is written to `<output>.tmp` next to the destination, synced
//! to disk, then renamed over the destination. Readers of the destination see
//! either the previous document or the new one, never a partial write.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use pvesd_common::target::DiscoveryTarget;
use pvesd_common::warn;

const TEMP_SUFFIX: &str = ".tmp";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to serialize discovery targets")]
    Serialize(#[from] serde_json::Error),

    #[error("output path '{}' does not name a file", .0.display())]
    NotAFile(PathBuf),

    #[error("failed to create directory '{}'", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to move '{}' to '{}'", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to sync directory '{}'", path.display())]
    SyncDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Pretty-printed JSON array of targets. An empty slice renders as `[]`.
pub fn render(targets: &[DiscoveryTarget]) -> Result<String, PublishError> {
    Ok(serde_json::to_string_pretty(targets)?)
}

/// Atomically replaces `path` with `document`.
pub fn publish(path: &Path, document: &str) -> Result<(), PublishError> {
    StagedFile::write(path, document)?.commit()
}

/// `<path>.tmp`, in the same directory as `path` so the final rename never crosses filesystems.
fn temp_path(path: &Path) -> Result<PathBuf, PublishError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| PublishError::NotAFile(path.to_path_buf()))?;

    let mut temp_name = OsString::from(file_name);
    temp_name.push(TEMP_SUFFIX);

    Ok(path.with_file_name(temp_name))
}

/// A fully written temporary file waiting to replace its destination.
///
/// Dropping it without calling [`StagedFile::commit`] removes the temporary
/// file and leaves the destination untouched.
#[derive(Debug)]
pub struct StagedFile {
    temp: PathBuf,
    destination: PathBuf,
    committed: bool,
}

impl StagedFile {
    pub fn write(destination: &Path, document: &str) -> Result<Self, PublishError> {
        let temp = temp_path(destination)?;

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PublishError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let staged = Self {
            temp,
            destination: destination.to_path_buf(),
            committed: false,
        };

        staged
            .write_temp(document)
            .map_err(|source| PublishError::Write {
                path: staged.temp.clone(),
                source,
            })?;

        Ok(staged)
    }

    fn write_temp(&self, document: &str) -> io::Result<()> {
        let mut file = File::create(&self.temp)?;
        file.write_all(document.as_bytes())?;
        file.sync_all()
    }

    /// Renames the temporary file over the destination, then syncs the
    /// containing directory so the new entry survives a crash.
    pub fn commit(mut self) -> Result<(), PublishError> {
        fs::rename(&self.temp, &self.destination).map_err(|source| PublishError::Rename {
            from: self.temp.clone(),
            to: self.destination.clone(),
            source,
        })?;
        self.committed = true;

        let dir = parent_dir(&self.destination);
        sync_dir(dir).map_err(|source| PublishError::SyncDir {
            path: dir.to_path_buf(),
            source,
        })
    }
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = fs::remove_file(&self.temp) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Could not remove temporary file {}: {e}", self.temp.display());
            }
        }
    }
}

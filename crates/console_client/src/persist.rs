use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("state directory missing or not writable: {0}")]
    StateDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Atomically replaces `{dir}/{filename}` with `content`, creating the
/// state directory on first use. The file holds a session credential, so
/// on unix it is created readable by the owner only. Readers never
/// observe a partially written file.
pub fn write_secret(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
    if !dir.is_dir() {
        fs::create_dir_all(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
    }

    let mut tmp = NamedTempFile::new_in(dir)?;
    restrict_permissions(tmp.as_file())?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    let target = dir.join(filename);
    // Replace any existing file so rename semantics stay uniform.
    if target.exists() {
        fs::remove_file(&target)?;
    }
    tmp.persist(&target)
        .map_err(|e| PersistError::Io(e.error))?;
    Ok(target)
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

//! Single-instance lock
//!
//! Two bot processes polling the same token fight over updates, so startup
//! takes an advisory lock file holding the owner's pid. The file is removed
//! when the lock is dropped; a crash can leave it behind, in which case the
//! recorded pid tells the operator which process to check.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Errors acquiring the instance lock
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("another instance appears to be running (lock held by pid {pid:?} at {path})")]
    AlreadyLocked { path: String, pid: Option<u32> },

    #[error("failed to create lock file at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// An acquired single-instance lock, released on drop
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    /// Acquire the lock, failing when another holder's file already exists
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        let display = path.display().to_string();

        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                let pid = fs::read_to_string(path)
                    .ok()
                    .and_then(|s| s.trim().parse().ok());
                return Err(LockError::AlreadyLocked { path: display, pid });
            }
            Err(err) => {
                return Err(LockError::Io {
                    path: display,
                    source: err,
                })
            }
        };

        if let Err(err) = writeln!(file, "{}", std::process::id()) {
            // Leave no half-written lock behind
            let _ = fs::remove_file(path);
            return Err(LockError::Io {
                path: display,
                source: err,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path of the held lock file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to remove lock file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.lock");

        let lock = InstanceLock::acquire(&path).unwrap();
        assert!(path.exists());

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim().parse::<u32>().unwrap(), std::process::id());

        drop(lock);
        assert!(!path.exists());
    }

    #[test]
    fn test_second_acquire_fails_with_pid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.lock");

        let _lock = InstanceLock::acquire(&path).unwrap();
        let err = InstanceLock::acquire(&path).unwrap_err();

        match err {
            LockError::AlreadyLocked { pid, .. } => {
                assert_eq!(pid, Some(std::process::id()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reacquire_after_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.lock");

        drop(InstanceLock::acquire(&path).unwrap());
        let _lock = InstanceLock::acquire(&path).unwrap();
    }
}

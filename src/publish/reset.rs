//! Destructive removal of a project's `.git` folder

use crate::progress::ProgressHandler;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const GIT_DIR: &str = ".git";

#[derive(Debug, Error)]
pub enum ResetError {
    #[error("Failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove {} even after clearing read-only: {source}", path.display())]
    StillLocked {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Deletes `<root>/.git` recursively; returns whether it existed
///
/// A permission failure on any entry clears read-only on that entry and on its
/// parent directory, then retries once.
pub fn reset_version_control(root: &Path, progress: &dyn ProgressHandler) -> Result<bool, ResetError> {
    let git_dir = root.join(GIT_DIR);
    if fs::symlink_metadata(&git_dir).is_err() {
        return Ok(false);
    }

    progress.log("Removing existing .git folder...");
    remove_tree(&git_dir)?;
    progress.log(".git folder removed");
    Ok(true)
}

fn remove_tree(path: &Path) -> Result<(), ResetError> {
    let metadata = fs::symlink_metadata(path).map_err(|source| ResetError::Remove {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.is_dir() {
        let entries = read_entries(path).or_else(|e| {
            if e.kind() != io::ErrorKind::PermissionDenied {
                return Err(e);
            }
            make_writable(path);
            read_entries(path)
        });
        let entries = entries.map_err(|source| ResetError::Remove {
            path: path.to_path_buf(),
            source,
        })?;

        for entry in entries {
            remove_tree(&entry)?;
        }
        remove_with_retry(path, |p| fs::remove_dir(p))
    } else {
        remove_with_retry(path, |p| fs::remove_file(p))
    }
}

fn read_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect()
}

fn remove_with_retry(path: &Path, remove: impl Fn(&Path) -> io::Result<()>) -> Result<(), ResetError> {
    match remove(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            make_writable(path);
            if let Some(parent) = path.parent() {
                make_writable(parent);
            }
            remove(path).map_err(|source| ResetError::StillLocked {
                path: path.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(ResetError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Best-effort; a failure here shows up as the retry failing
fn make_writable(path: &Path) {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return;
    };
    if metadata.file_type().is_symlink() {
        return;
    }
    let mut permissions = metadata.permissions();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = permissions.mode();
        permissions.set_mode(mode | 0o700);
    }
    #[cfg(not(unix))]
    {
        permissions.set_readonly(false);
    }

    let _ = fs::set_permissions(path, permissions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::RecordingHandler;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn set_readonly(path: &Path) {
        let mut permissions = fs::metadata(path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(path, permissions).unwrap();
    }

    #[test]
    fn test_missing_git_dir_is_noop() {
        let temp = TempDir::new().unwrap();
        let recorder = RecordingHandler::new();

        assert!(!reset_version_control(temp.path(), &recorder).unwrap());
        assert!(recorder.messages().is_empty());
    }

    #[test]
    fn test_removes_read_only_objects() {
        let temp = TempDir::new().unwrap();
        let objects = temp.path().join(".git/objects/ab");
        fs::create_dir_all(&objects).unwrap();
        let packed = objects.join("cdef");
        fs::write(&packed, b"blob").unwrap();
        fs::write(temp.path().join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        set_readonly(&packed);
        set_readonly(&objects);

        let recorder = RecordingHandler::new();
        assert!(reset_version_control(temp.path(), &recorder).unwrap());

        assert!(!temp.path().join(".git").exists());
        assert!(recorder.contains(".git folder removed"));
    }

    #[test]
    fn test_retry_still_denied_is_still_locked() {
        let temp = TempDir::new().unwrap();
        let attempts = Cell::new(0);

        let err = remove_with_retry(&temp.path().join("locked"), |_| {
            attempts.set(attempts.get() + 1);
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        })
        .unwrap_err();

        assert!(matches!(err, ResetError::StillLocked { .. }));
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn test_other_errors_are_not_retried() {
        let temp = TempDir::new().unwrap();
        let attempts = Cell::new(0);

        let err = remove_with_retry(&temp.path().join("locked"), |_| {
            attempts.set(attempts.get() + 1);
            Err(io::Error::new(io::ErrorKind::Other, "device busy"))
        })
        .unwrap_err();

        assert!(matches!(err, ResetError::Remove { .. }));
        assert_eq!(attempts.get(), 1);
    }

    #[test]
    fn test_retry_succeeds_after_permission_fix() {
        let temp = TempDir::new().unwrap();
        let attempts = Cell::new(0);

        remove_with_retry(&temp.path().join("locked"), |_| {
            attempts.set(attempts.get() + 1);
            if attempts.get() == 1 {
                Err(io::Error::from(io::ErrorKind::PermissionDenied))
            } else {
                Ok(())
            }
        })
        .unwrap();

        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn test_project_files_survive() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join("main.py"), "print('hi')").unwrap();

        reset_version_control(temp.path(), &RecordingHandler::new()).unwrap();

        assert!(temp.path().join("main.py").exists());
    }
}

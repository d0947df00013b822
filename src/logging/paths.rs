//! Folder and path utilities for file handlers

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Canonical log file used when a file handler is added without a path
pub const DEFAULT_LOG_FILE: &str = "logs/application.log";

/// Permission bits for created log folders
pub const DIR_MODE: u32 = 0o755;

/// Permission bits for created log files
pub const FILE_MODE: u32 = 0o600;

/// Resolve a user-supplied file handler path, falling back to [`DEFAULT_LOG_FILE`]
pub fn resolve_log_file(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        PathBuf::from(DEFAULT_LOG_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Recursively create a directory with [`DIR_MODE`]
pub fn create_dir_all(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }

    builder.create(path)
}

/// Make sure the logs folder exists and return it.
///
/// An empty path means the working directory. Creation is best-effort:
/// failures are ignored and surface later when the file is opened.
pub fn check_logs_folder(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        return PathBuf::from(".");
    }

    if !path.exists() {
        let _ = create_dir_all(path);
    }

    path.to_path_buf()
}

/// Join a logs folder and a file name the way `setup` expects
pub fn log_file_in(logpath: &Path, logfile: &str) -> PathBuf {
    check_logs_folder(logpath).join(logfile)
}

/// Create the parent directories of a log file, ignoring failures
pub fn ensure_parent_dir(path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            let _ = create_dir_all(parent);
        }
    }
}

/// Open a log file for appending, creating it with [`FILE_MODE`] if missing
pub fn open_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_empty_path_uses_default() {
        let path = resolve_log_file(Path::new(""));
        assert_eq!(path, PathBuf::from("logs/application.log"));

        let custom = resolve_log_file(Path::new("out/app.log"));
        assert_eq!(custom, PathBuf::from("out/app.log"));
    }

    #[test]
    fn test_check_logs_folder_creates_missing() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("a/b/logs");

        let result = check_logs_folder(&folder);
        assert_eq!(result, folder);
        assert!(folder.is_dir());
    }

    #[test]
    fn test_check_logs_folder_empty_is_cwd() {
        assert_eq!(check_logs_folder(Path::new("")), PathBuf::from("."));
    }

    #[test]
    fn test_log_file_in() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("logs");

        let path = log_file_in(&folder, "app.log");
        assert_eq!(path, folder.join("app.log"));
        assert!(folder.is_dir());
    }

    #[test]
    fn test_ensure_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("out/nested/app.log");

        ensure_parent_dir(&file);
        assert!(file.parent().unwrap().is_dir());
        assert!(!file.exists());

        // Bare file names have no parent to create
        ensure_parent_dir(Path::new("app.log"));
    }

    #[test]
    fn test_open_append_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        open_append(&path).unwrap().write_all(b"one\n").unwrap();
        open_append(&path).unwrap().write_all(b"two\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_created_directories_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("a/logs");
        check_logs_folder(&folder);
        ensure_parent_dir(&temp_dir.path().join("out/app.log"));

        for dir in [temp_dir.path().join("a"), folder, temp_dir.path().join("out")] {
            let mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, DIR_MODE, "{}", dir.display());
        }
    }

    #[test]
    fn test_directory_creation_failure_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        ensure_parent_dir(&blocker.join("app.log"));
        let folder = check_logs_folder(&blocker.join("logs"));

        assert_eq!(folder, blocker.join("logs"));
        assert!(blocker.is_file());
        assert!(open_append(&blocker.join("logs/app.log")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_open_append_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("private.log");
        open_append(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, FILE_MODE);
    }
}

/*!
 * Utility functions for dupsync
 */

use std::ffi::OsString;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{DupSyncError, Result, ResultExt};

/// Bytes in one (decimal) megabyte, as used by `--maxsize`
pub const BYTES_PER_MB: u64 = 1_000_000;

/// Raw names of all entries directly inside `dir`, sorted
pub fn list_dir_entries(dir: &Path) -> Result<Vec<OsString>> {
    let mut names = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry
            .map_err(io::Error::from)
            .with_context(|| format!("Failed to list {}", dir.display()))?;
        names.push(entry.file_name().to_os_string());
    }

    Ok(names)
}

/// Names of all entries directly inside `dir`, sorted
///
/// A name that is not valid UTF-8 cannot be a backup file and is rejected.
pub fn list_dir_names(dir: &Path) -> Result<Vec<String>> {
    list_dir_entries(dir)?
        .into_iter()
        .map(|name| {
            name.into_string().map_err(|name| {
                DupSyncError::UnrecognizedBackupFile(name.to_string_lossy().to_string())
            })
        })
        .collect()
}

/// Size in bytes of a file
pub fn file_size(path: &Path) -> Result<u64> {
    std::fs::metadata(path)
        .map(|metadata| metadata.len())
        .with_context(|| format!("Failed to stat {}", path.display()))
}

/// Convert `--maxsize` megabytes into a byte ceiling
pub fn megabytes_to_bytes(megabytes: u64) -> u64 {
    megabytes.saturating_mul(BYTES_PER_MB)
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn test_list_dir_names_is_flat_and_sorted() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("b")).unwrap();
        File::create(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        File::create(dir.path().join("nested").join("c")).unwrap();

        let names = list_dir_names(dir.path()).unwrap();
        assert_eq!(names, vec!["a", "b", "nested"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let raw = OsStr::from_bytes(b"stale\xff");
        File::create(dir.path().join(raw)).unwrap();
        File::create(dir.path().join("a")).unwrap();

        let entries = list_dir_entries(dir.path()).unwrap();
        assert_eq!(entries, vec![OsString::from("a"), raw.to_os_string()]);

        let err = list_dir_names(dir.path()).unwrap_err();
        assert!(matches!(err, DupSyncError::UnrecognizedBackupFile(_)));
    }

    #[test]
    fn test_list_missing_dir() {
        let dir = tempdir().unwrap();
        let err = list_dir_names(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, DupSyncError::Io { .. }));
    }

    #[test]
    fn test_megabytes_are_decimal() {
        assert_eq!(megabytes_to_bytes(0), 0);
        assert_eq!(megabytes_to_bytes(3), 3_000_000);
        assert_eq!(megabytes_to_bytes(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
    }
}

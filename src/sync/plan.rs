/*!
 * Diff between the selected files and the destination directory
 */

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::Path;

use crate::error::Result;
use crate::utils::{file_size, list_dir_entries};

/// A selected file together with its source size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// File name, without directory
    pub name: String,
    /// Size of the source file
    pub size: u64,
}

/// What a synchronization run has to do
///
/// Size equality is the only freshness check: a destination file with the
/// same size as its source is assumed to be complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Destination entries to remove, in listing order
    ///
    /// Raw names, since anything not selected goes, including names that
    /// are not valid UTF-8.
    pub files_to_delete: Vec<OsString>,
    /// Selected files to copy, in selection order
    pub files_to_copy: Vec<PlannedFile>,
    /// Selected files already present with the right size
    pub files_to_keep: Vec<PlannedFile>,
    /// Bytes held by `files_to_keep`
    pub current_size: u64,
}

impl SyncPlan {
    /// Compare `destination` against `selected` files from `source`
    pub fn compute(source: &Path, destination: &Path, selected: &[String]) -> Result<Self> {
        let wanted: HashSet<&str> = selected.iter().map(String::as_str).collect();
        let mut plan = SyncPlan::default();
        let mut up_to_date = HashSet::new();

        for entry in list_dir_entries(destination)? {
            let name = match entry.to_str() {
                Some(name) if wanted.contains(name) => name.to_string(),
                _ => {
                    plan.files_to_delete.push(entry);
                    continue;
                }
            };

            let dst_size = file_size(&destination.join(&name))?;
            let src_size = file_size(&source.join(&name))?;
            if dst_size == src_size {
                plan.current_size += src_size;
                up_to_date.insert(name.clone());
                plan.files_to_keep.push(PlannedFile {
                    name,
                    size: src_size,
                });
            } else {
                // most likely an interrupted transfer: start over
                plan.files_to_delete.push(entry);
            }
        }

        let mut planned = HashSet::new();
        for name in selected {
            if up_to_date.contains(name) || !planned.insert(name.as_str()) {
                continue;
            }
            plan.files_to_copy.push(PlannedFile {
                name: name.clone(),
                size: file_size(&source.join(name))?,
            });
        }

        Ok(plan)
    }

    /// True when source and destination already agree
    pub fn is_empty(&self) -> bool {
        self.files_to_delete.is_empty() && self.files_to_copy.is_empty()
    }

    /// Bytes that would be transferred without a ceiling
    pub fn bytes_to_copy(&self) -> u64 {
        self.files_to_copy.iter().map(|f| f.size).sum()
    }
}

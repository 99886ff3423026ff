/*!
 * Size-bounded mirroring of selected backup files
 */

mod plan;
mod progress;

pub use plan::{PlannedFile, SyncPlan};
pub use progress::{SilentReporter, SyncEvent, SyncReporter};

use std::fs;
use std::path::PathBuf;

use crate::error::{Result, ResultExt};

/// Where and how to mirror
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Directory holding the backup chain
    pub source: PathBuf,
    /// Mirror directory
    pub destination: PathBuf,
    /// Report actions without touching the file system
    pub dry_run: bool,
    /// Byte ceiling for the destination, 0 for unlimited
    pub max_total_bytes: u64,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Destination now mirrors the selection
    Completed,
    /// Copying stopped before `file` because of the byte ceiling
    SizeLimitReached {
        /// First file that was not copied
        file: String,
        /// Bytes the destination would have exceeded the ceiling by
        exceeded_by: u64,
    },
}

impl SyncStatus {
    /// Process exit code for this status
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncStatus::Completed => 0,
            SyncStatus::SizeLimitReached { .. } => 1,
        }
    }
}

/// Counters for a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Files left untouched
    pub kept: usize,
    /// Files removed from the destination
    pub deleted: usize,
    /// Files copied
    pub copied: usize,
    /// Files not copied because of the ceiling
    pub skipped: usize,
    /// Bytes copied
    pub bytes_copied: u64,
    /// Bytes of selected files in the destination after the run
    pub destination_bytes: u64,
    /// Whether the run was simulated
    pub dry_run: bool,
}

/// Result of [`Synchronizer::sync`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub status: SyncStatus,
    pub stats: SyncStats,
}

/// Mirrors a selection of source files into the destination directory
pub struct Synchronizer<'a> {
    options: SyncOptions,
    reporter: &'a dyn SyncReporter,
}

impl<'a> Synchronizer<'a> {
    /// Create a new synchronizer
    pub fn new(options: SyncOptions, reporter: &'a dyn SyncReporter) -> Self {
        Self { options, reporter }
    }

    /// Compute the plan for `selected` without applying it
    pub fn plan(&self, selected: &[String]) -> Result<SyncPlan> {
        SyncPlan::compute(&self.options.source, &self.options.destination, selected)
    }

    /// Make the destination hold exactly `selected`, within the byte ceiling
    ///
    /// Deletions run first. Copies then run in selection order and stop at
    /// the first file that would push the destination over the ceiling.
    /// File system failures abort the run with an error.
    pub fn sync(&self, selected: &[String]) -> Result<SyncOutcome> {
        let plan = self.plan(selected)?;
        self.apply(&plan)
    }

    /// Apply a previously computed plan
    pub fn apply(&self, plan: &SyncPlan) -> Result<SyncOutcome> {
        let SyncOptions {
            source,
            destination,
            dry_run,
            max_total_bytes,
        } = &self.options;

        let mut stats = SyncStats {
            kept: plan.files_to_keep.len(),
            dry_run: *dry_run,
            ..SyncStats::default()
        };
        let mut current_size = plan.current_size;

        for keep in &plan.files_to_keep {
            let path = destination.join(&keep.name);
            self.reporter.report(&SyncEvent::Keep {
                path: &path,
                size: keep.size,
            });
        }

        for name in &plan.files_to_delete {
            let path = destination.join(name);
            self.reporter.report(&SyncEvent::Delete {
                path: &path,
                dry_run: *dry_run,
            });
            if !dry_run {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to delete {}", path.display()))?;
            }
            stats.deleted += 1;
        }

        for (index, copy) in plan.files_to_copy.iter().enumerate() {
            let src = source.join(&copy.name);
            let dst = destination.join(&copy.name);

            let limit = *max_total_bytes;
            if limit > 0 && current_size + copy.size > limit {
                self.reporter.report(&SyncEvent::LimitReached {
                    source: &src,
                    size: copy.size,
                    current_size,
                    limit,
                });
                stats.skipped = plan.files_to_copy.len() - index;
                stats.destination_bytes = current_size;
                return Ok(SyncOutcome {
                    status: SyncStatus::SizeLimitReached {
                        file: copy.name.clone(),
                        exceeded_by: current_size + copy.size - limit,
                    },
                    stats,
                });
            }

            self.reporter.report(&SyncEvent::Copy {
                source: &src,
                destination: &dst,
                size: copy.size,
                dry_run: *dry_run,
            });
            if !dry_run {
                fs::copy(&src, &dst).with_context(|| {
                    format!("Failed to copy {} to {}", src.display(), dst.display())
                })?;
                self.reporter.report(&SyncEvent::Copied {
                    destination: &dst,
                    size: copy.size,
                });
            }

            current_size += copy.size;
            stats.copied += 1;
            stats.bytes_copied += copy.size;
        }

        stats.destination_bytes = current_size;
        Ok(SyncOutcome {
            status: SyncStatus::Completed,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::tempdir;

    #[test]
    fn test_dry_run_reports_without_mutation() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        fs::write(src.path().join("file1"), vec![0u8; 20]).unwrap();
        fs::write(src.path().join("file2"), vec![0u8; 30]).unwrap();
        fs::write(dst.path().join("stale"), b"x").unwrap();

        let events = RefCell::new(Vec::new());
        let reporter = |event: &SyncEvent<'_>| events.borrow_mut().push(event.describe());
        let options = SyncOptions {
            source: src.path().to_path_buf(),
            destination: dst.path().to_path_buf(),
            dry_run: true,
            max_total_bytes: 40,
        };

        let selected = vec!["file1".to_string(), "file2".to_string()];
        let outcome = Synchronizer::new(options, &reporter).sync(&selected).unwrap();

        assert_eq!(
            outcome.status,
            SyncStatus::SizeLimitReached {
                file: "file2".to_string(),
                exceeded_by: 10,
            }
        );
        assert_eq!(outcome.status.exit_code(), 1);
        assert_eq!(outcome.stats.copied, 1);
        assert_eq!(outcome.stats.skipped, 1);
        assert_eq!(outcome.stats.deleted, 1);

        let events = events.into_inner();
        assert_eq!(events.len(), 3);
        assert!(events[0].starts_with("Would delete"));
        assert!(events[1].starts_with("Would copy"));
        assert!(events[2].starts_with("Stopping at"));

        // nothing was touched
        assert!(dst.path().join("stale").exists());
        assert!(!dst.path().join("file1").exists());
    }

    #[test]
    fn test_unlimited_copy_completes() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        fs::write(src.path().join("a"), b"aaaa").unwrap();

        let options = SyncOptions {
            source: src.path().to_path_buf(),
            destination: dst.path().to_path_buf(),
            dry_run: false,
            max_total_bytes: 0,
        };
        let outcome = Synchronizer::new(options, &SilentReporter)
            .sync(&["a".to_string()])
            .unwrap();

        assert_eq!(outcome.status, SyncStatus::Completed);
        assert_eq!(outcome.status.exit_code(), 0);
        assert_eq!(outcome.stats.bytes_copied, 4);
        assert_eq!(outcome.stats.destination_bytes, 4);
        assert_eq!(fs::read(dst.path().join("a")).unwrap(), b"aaaa");
    }
}

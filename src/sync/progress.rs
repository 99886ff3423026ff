/*!
 * Progress reporting for synchronization
 */

use std::path::Path;

use crate::utils::format_file_size;

/// Trait for observing what the synchronizer does
pub trait SyncReporter {
    /// Called for every decision and file system action
    fn report(&self, event: &SyncEvent<'_>);
}

/// A single synchronizer decision or action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent<'a> {
    /// Destination file already matches its source
    Keep { path: &'a Path, size: u64 },
    /// Destination file is removed (or would be, in a dry run)
    Delete { path: &'a Path, dry_run: bool },
    /// A copy is about to start (or would, in a dry run)
    Copy {
        source: &'a Path,
        destination: &'a Path,
        size: u64,
        dry_run: bool,
    },
    /// A copy has finished
    Copied { destination: &'a Path, size: u64 },
    /// The next copy would push the destination over the ceiling
    LimitReached {
        source: &'a Path,
        size: u64,
        current_size: u64,
        limit: u64,
    },
}

impl SyncEvent<'_> {
    /// Human readable description, as shown in logs
    pub fn describe(&self) -> String {
        match self {
            SyncEvent::Keep { path, size } => {
                format!("Keep {} ({})", path.display(), format_file_size(*size))
            }
            SyncEvent::Delete { path, dry_run } => {
                let verb = if *dry_run { "Would delete" } else { "Delete" };
                format!("{} {}", verb, path.display())
            }
            SyncEvent::Copy {
                source,
                destination,
                dry_run,
                ..
            } => {
                let verb = if *dry_run { "Would copy" } else { "Copy" };
                format!("{} {} to {}", verb, source.display(), destination.display())
            }
            SyncEvent::Copied { destination, size } => {
                format!("Copied {} ({})", destination.display(), format_file_size(*size))
            }
            SyncEvent::LimitReached {
                source,
                size,
                current_size,
                limit,
            } => format!(
                "Stopping at {}. Exceeds file size limit of {} bytes by {} bytes.",
                source.display(),
                limit,
                (current_size + size).saturating_sub(*limit)
            ),
        }
    }
}

/// Reporter that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl SyncReporter for SilentReporter {
    fn report(&self, _event: &SyncEvent<'_>) {}
}

// Implement SyncReporter for closures
impl<F> SyncReporter for F
where
    F: Fn(&SyncEvent<'_>),
{
    fn report(&self, event: &SyncEvent<'_>) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_describe_dry_run() {
        let event = SyncEvent::Copy {
            source: Path::new("/src/a"),
            destination: Path::new("/dst/a"),
            size: 3,
            dry_run: true,
        };
        assert_eq!(event.describe(), "Would copy /src/a to /dst/a");

        let event = SyncEvent::Delete {
            path: Path::new("/dst/b"),
            dry_run: false,
        };
        assert_eq!(event.describe(), "Delete /dst/b");
    }

    #[test]
    fn test_closure_reporter() {
        let seen = RefCell::new(Vec::new());
        let reporter = |event: &SyncEvent<'_>| seen.borrow_mut().push(event.describe());

        reporter.report(&SyncEvent::LimitReached {
            source: Path::new("/src/c"),
            size: 20,
            current_size: 50,
            limit: 60,
        });

        assert_eq!(
            seen.into_inner(),
            vec!["Stopping at /src/c. Exceeds file size limit of 60 bytes by 10 bytes."]
        );
    }
}

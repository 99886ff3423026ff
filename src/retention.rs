/*!
 * Retention: which backup files to keep
 */

use std::path::Path;

use crate::classifier::{classify, Classified};
use crate::error::Result;
use crate::types::GenerationKey;

/// Files kept by a retention walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionSelection {
    /// Buckets visited, newest first
    pub keys: Vec<GenerationKey>,
    /// Member files of the visited buckets, in visiting order
    pub files: Vec<String>,
    /// Number of full buckets included
    pub full_backups: usize,
}

/// Select the files of the `nr_full` most recent full backups
///
/// Buckets are walked from newest to oldest. Incrementals newer than a
/// retained full backup are kept; the walk stops right after the
/// `nr_full`-th full bucket, so incrementals older than it are dropped even
/// when they belong to an excluded chain. With fewer full backups than
/// requested, everything is kept.
pub fn select_last_n_generations(classified: &Classified, nr_full: usize) -> RetentionSelection {
    let mut selection = RetentionSelection::default();

    for generation in classified.generations_desc() {
        if selection.full_backups >= nr_full {
            break;
        }

        selection.keys.push(generation.key);
        selection.files.extend(generation.files.iter().cloned());

        if generation.is_full {
            selection.full_backups += 1;
        }
    }

    selection
}

/// Classify `directory` and select its last `nr_full` full backups
pub fn select_from_directory(directory: &Path, nr_full: usize) -> Result<RetentionSelection> {
    let classified = classify(directory)?;
    let selection = select_last_n_generations(&classified, nr_full);

    tracing::debug!(
        "Keeping {} of {} generations ({} full, {} files)",
        selection.keys.len(),
        classified.len(),
        selection.full_backups,
        selection.files.len()
    );

    Ok(selection)
}

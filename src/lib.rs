/*!
 * dupsync - Mirror the most recent duplicity backups
 *
 * This library classifies a directory of duplicity backup files into
 * generations, selects the most recent full backups with their incremental
 * chains, and mirrors that selection into a size-bounded directory.
 */

pub mod classifier;
pub mod config;
pub mod error;
pub mod logger;
pub mod report;
pub mod retention;
pub mod sync;
pub mod types;
pub mod utils;


// Re-export main components for easier access
pub use classifier::{classify, parse_backup_file, Classified};
pub use config::Config;
pub use error::{DupSyncError, Result};
pub use report::{Reporter, RunReport};
pub use retention::{select_from_directory, select_last_n_generations, RetentionSelection};
pub use sync::{SyncEvent, SyncOptions, SyncOutcome, SyncReporter, SyncStatus, Synchronizer};
pub use types::{BackupFile, ChainKind, FileRole, Generation, GenerationKey};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

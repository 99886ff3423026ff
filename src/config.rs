/*!
 * Configuration handling for dupsync
 */

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::error::Result;
use crate::sync::SyncOptions;
use crate::utils::megabytes_to_bytes;

/// Command-line arguments for dupsync
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "dupsync",
    version = env!("CARGO_PKG_VERSION"),
    about = "Copies most recent duplicity backup files",
    long_about = "Mirrors the most recent duplicity full backups, with their incremental chains, into a destination directory. Files in the destination that are not part of the selection are deleted."
)]
pub struct Args {
    /// Source directory
    #[clap(required_unless_present = "generate")]
    pub src: Option<PathBuf>,

    /// Destination directory
    #[clap(required_unless_present = "generate")]
    pub dst: Option<PathBuf>,

    /// Do not write/delete files. Just print out.
    #[clap(long)]
    pub dryrun: bool,

    /// Stop copying when dst folder has given size in MB. Default is 0 (unlimited)
    #[clap(long, value_name = "MB", default_value_t = 0)]
    pub maxsize: u64,

    /// Number of full backups
    #[clap(long, value_name = "N", default_value_t = 2)]
    pub nr: usize,

    /// If set only errors are printed out
    #[clap(long)]
    pub quiet: bool,

    /// Print a summary table after the run
    #[clap(long)]
    pub summary: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

impl Args {
    /// Reject argument combinations clap cannot express
    pub fn validate(&self) -> Result<()> {
        if let Some(shell) = self.generate {
            crate::ensure!(
                self.src.is_none() && self.dst.is_none(),
                InvalidArgument,
                "--generate {} does not take source or destination directories",
                shell
            );
        }

        Ok(())
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding the duplicity backup chain
    pub source_dir: PathBuf,

    /// Mirror directory
    pub destination_dir: PathBuf,

    /// Simulate only
    pub dry_run: bool,

    /// Byte ceiling for the destination (0 for unlimited)
    pub max_total_bytes: u64,

    /// Number of full backups to keep
    pub nr_full: usize,

    /// Only warnings and errors are logged
    pub quiet: bool,

    /// Print a summary table after the run
    pub summary: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            source_dir: args.src.unwrap_or_default(),
            destination_dir: args.dst.unwrap_or_default(),
            dry_run: args.dryrun,
            max_total_bytes: megabytes_to_bytes(args.maxsize),
            nr_full: args.nr,
            quiet: args.quiet,
            summary: args.summary,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for dir in [&self.source_dir, &self.destination_dir] {
            crate::ensure!(dir.is_dir(), MissingDirectory, "{}", dir.display());
        }

        Ok(())
    }

    /// Options for the synchronizer
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            source: self.source_dir.clone(),
            destination: self.destination_dir.clone(),
            dry_run: self.dry_run,
            max_total_bytes: self.max_total_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DupSyncError;
    use std::ffi::OsStr;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["dupsync", "/src", "/dst"]);
        let config = Config::from_args(args);

        assert_eq!(config.source_dir, PathBuf::from("/src"));
        assert_eq!(config.destination_dir, PathBuf::from("/dst"));
        assert_eq!(config.nr_full, 2);
        assert_eq!(config.max_total_bytes, 0);
        assert!(!config.dry_run);
        assert!(!config.quiet);
    }

    #[test]
    fn test_maxsize_is_decimal_megabytes() {
        let args = Args::parse_from([
            "dupsync", "/src", "/dst", "--maxsize", "7", "--nr", "3", "--dryrun", "--quiet",
        ]);
        let config = Config::from_args(args);

        assert_eq!(config.max_total_bytes, 7_000_000);
        assert_eq!(config.nr_full, 3);
        assert!(config.dry_run);
        assert!(config.quiet);
    }

    #[test]
    fn test_directories_required_without_generate() {
        assert!(Args::try_parse_from(["dupsync", "/src"]).is_err());
        assert!(Args::try_parse_from(["dupsync", "--generate", "bash"]).is_ok());
    }

    #[test]
    fn test_generate_rejects_directories() {
        let args = Args::parse_from(["dupsync", "--generate", "bash"]);
        assert!(args.validate().is_ok());

        let args = Args::parse_from(["dupsync", "/src", "/dst", "--generate", "zsh"]);
        let err = args.validate().unwrap_err();
        assert!(matches!(err, DupSyncError::InvalidArgument(_)));
        assert_eq!(
            err.to_string(),
            "Invalid argument: --generate zsh does not take source or destination directories"
        );

        let args = Args::parse_from(["dupsync", "/src", "/dst"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validate_names_missing_destination() {
        let src = tempdir().unwrap();
        let missing = src.path().join("missing");
        let args = Args::parse_from([
            OsStr::new("dupsync"),
            src.path().as_os_str(),
            missing.as_os_str(),
        ]);

        let err = Config::from_args(args).validate().unwrap_err();
        assert!(matches!(err, DupSyncError::MissingDirectory(ref dir) if dir.ends_with("missing")));
    }
}

/*!
 * Core types and data structures for dupsync
 */

use std::fmt;

use chrono::DateTime;
use strum::Display;

/// Seconds since the Unix epoch of a duplicity timestamp
///
/// Full backups are keyed by their only timestamp, incrementals by the
/// timestamp they lead *to*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationKey(pub i64);

impl fmt::Display for GenerationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp(self.0, 0) {
            Some(time) => write!(f, "{}", time.format("%Y%m%dT%H%M%SZ")),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Role a file plays inside one backup step
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FileRole {
    /// `*.manifest.gpg`
    Manifest,
    /// `*.vol<N>.difftar.gpg`, with the digits of `N` as written
    Volume(String),
    /// `*.sigtar.gpg`
    Signature,
}

/// Whether a file belongs to a full backup or to an incremental step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ChainKind {
    /// Self-contained snapshot
    Full,
    /// Changes since `start`
    Incremental { start: GenerationKey },
}

impl ChainKind {
    pub fn is_full(&self) -> bool {
        matches!(self, ChainKind::Full)
    }
}

/// A single recognized file name from the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFile {
    /// Raw file name, without directory
    pub name: String,
    /// Manifest, volume or signature
    pub role: FileRole,
    /// Full or incremental
    pub chain: ChainKind,
    /// Bucket the file is grouped into
    pub key: GenerationKey,
}

impl BackupFile {
    pub fn is_full(&self) -> bool {
        self.chain.is_full()
    }
}

/// All files sharing one bucket key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Bucket key
    pub key: GenerationKey,
    /// True only when the bucket holds a full backup's files
    pub is_full: bool,
    /// Member file names, sorted
    pub files: Vec<String>,
}

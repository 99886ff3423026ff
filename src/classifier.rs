/*!
 * Recognition and grouping of duplicity backup files
 *
 * Duplicity names its files after one of six shapes:
 *
 * ```text
 * duplicity-full.<TS>.manifest.gpg
 * duplicity-full.<TS>.vol<N>.difftar.gpg
 * duplicity-full-signatures.<TS>.sigtar.gpg
 * duplicity-inc.<TS1>.to.<TS2>.manifest.gpg
 * duplicity-inc.<TS1>.to.<TS2>.vol<N>.difftar.gpg
 * duplicity-new-signatures.<TS1>.to.<TS2>.sigtar.gpg
 * ```
 *
 * where a timestamp looks like `20130126T070058Z`. Any other name in a
 * backup directory aborts classification.
 */

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{DupSyncError, Result};
use crate::types::{BackupFile, ChainKind, FileRole, Generation, GenerationKey};
use crate::utils::list_dir_names;

const TIMESTAMP: &str = r"\d{8}T\d{6}[A-Z]";
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// The closed set of file name shapes duplicity produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    FullManifest,
    FullVolume,
    FullSignature,
    IncManifest,
    IncVolume,
    IncSignature,
}

/// Fully anchored pattern for every shape
static PATTERNS: Lazy<Vec<(Shape, Regex)>> = Lazy::new(|| {
    let full = format!(r"^duplicity-full\.(?P<ts>{TIMESTAMP})\.");
    let inc = format!(r"^duplicity-inc\.(?P<start>{TIMESTAMP})\.to\.(?P<end>{TIMESTAMP})\.");

    [
        (Shape::FullManifest, format!(r"{full}manifest\.gpg$")),
        (Shape::FullVolume, format!(r"{full}vol(?P<vol>\d+)\.difftar\.gpg$")),
        (
            Shape::FullSignature,
            format!(r"^duplicity-full-signatures\.(?P<ts>{TIMESTAMP})\.sigtar\.gpg$"),
        ),
        (Shape::IncManifest, format!(r"{inc}manifest\.gpg$")),
        (Shape::IncVolume, format!(r"{inc}vol(?P<vol>\d+)\.difftar\.gpg$")),
        (
            Shape::IncSignature,
            format!(
                r"^duplicity-new-signatures\.(?P<start>{TIMESTAMP})\.to\.(?P<end>{TIMESTAMP})\.sigtar\.gpg$"
            ),
        ),
    ]
    .into_iter()
    .map(|(shape, pattern)| {
        let regex = Regex::new(&pattern).expect("duplicity file patterns are valid");
        (shape, regex)
    })
    .collect()
});

/// Convert a duplicity timestamp token into a generation key
pub fn parse_timestamp(token: &str) -> Result<GenerationKey> {
    NaiveDateTime::parse_from_str(token, TIMESTAMP_FORMAT)
        .map(|time| GenerationKey(time.and_utc().timestamp()))
        .map_err(|_| DupSyncError::InvalidTimestamp(token.to_string()))
}

/// Parse a single file name into a [`BackupFile`]
pub fn parse_backup_file(name: &str) -> Result<BackupFile> {
    let (shape, caps) = PATTERNS
        .iter()
        .find_map(|(shape, regex)| regex.captures(name).map(|caps| (*shape, caps)))
        .ok_or_else(|| DupSyncError::UnrecognizedBackupFile(name.to_string()))?;

    let timestamp = |group: &str| parse_timestamp(&caps[group]);
    let volume = |caps: &Captures| FileRole::Volume(caps["vol"].to_string());

    let (role, chain, key) = match shape {
        Shape::FullManifest => (FileRole::Manifest, ChainKind::Full, timestamp("ts")?),
        Shape::FullVolume => (volume(&caps), ChainKind::Full, timestamp("ts")?),
        Shape::FullSignature => (FileRole::Signature, ChainKind::Full, timestamp("ts")?),
        Shape::IncManifest | Shape::IncVolume | Shape::IncSignature => {
            let role = match shape {
                Shape::IncVolume => volume(&caps),
                Shape::IncSignature => FileRole::Signature,
                _ => FileRole::Manifest,
            };
            let chain = ChainKind::Incremental {
                start: timestamp("start")?,
            };
            (role, chain, timestamp("end")?)
        }
    };

    Ok(BackupFile {
        name: name.to_string(),
        role,
        chain,
        key,
    })
}

/// Backup files of one directory grouped into generation buckets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    generations: BTreeMap<GenerationKey, Generation>,
}

impl Classified {
    /// Buckets from newest to oldest
    pub fn generations_desc(&self) -> impl Iterator<Item = &Generation> {
        self.generations.values().rev()
    }

    pub fn get(&self, key: GenerationKey) -> Option<&Generation> {
        self.generations.get(&key)
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Number of buckets holding a full backup
    pub fn full_count(&self) -> usize {
        self.generations.values().filter(|g| g.is_full).count()
    }

    /// Total number of files over all buckets
    pub fn file_count(&self) -> usize {
        self.generations.values().map(|g| g.files.len()).sum()
    }
}

/// Fold parsed files into buckets keyed by their generation key
///
/// A bucket must be entirely full or entirely incremental.
pub fn group_generations(files: Vec<BackupFile>) -> Result<Classified> {
    let mut generations: BTreeMap<GenerationKey, Generation> = BTreeMap::new();

    for file in files {
        let generation = generations.entry(file.key).or_insert_with(|| Generation {
            key: file.key,
            is_full: file.is_full(),
            files: Vec::new(),
        });

        crate::ensure!(
            generation.is_full == file.is_full(),
            InconsistentGeneration,
            "{} is {} but bucket {} already holds {} files",
            file.name,
            file.chain,
            generation.key,
            if generation.is_full { "full" } else { "incremental" }
        );

        generation.files.push(file.name);
    }

    for generation in generations.values_mut() {
        generation.files.sort();
    }

    Ok(Classified { generations })
}

/// Scan a directory and classify every entry in it
///
/// Fails on the first entry that is not a duplicity file.
pub fn classify(directory: &Path) -> Result<Classified> {
    let files = list_dir_names(directory)?
        .iter()
        .map(|name| parse_backup_file(name))
        .collect::<Result<Vec<_>>>()?;

    let classified = group_generations(files)?;
    tracing::debug!(
        "Found {} generations ({} full) with {} files in {}",
        classified.len(),
        classified.full_count(),
        classified.file_count(),
        directory.display()
    );

    Ok(classified)
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

/// Default chunk size for lock-step content reads
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// A regular file found directly inside one of the compared directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name without any directory component
    pub name: String,
    /// Full path used to open the file
    pub path: PathBuf,
    pub size: u64,
    /// Captured during the scan; classification never looks at it
    pub modified: SystemTime,
}

/// Outcome of comparing two directories.
///
/// `matching` holds names of same-named files with identical bytes (labelled
/// with the first directory's spelling), `different` holds names of
/// same-named files whose size or bytes differ (labelled with the second
/// directory's spelling). Both lists are sorted on construction and may
/// contain duplicates when several names collide case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    matching: Vec<String>,
    different: Vec<String>,
}

impl ComparisonResult {
    pub fn new(mut matching: Vec<String>, mut different: Vec<String>) -> Self {
        matching.sort();
        different.sort();
        Self {
            matching,
            different,
        }
    }

    pub fn matching(&self) -> &[String] {
        &self.matching
    }

    pub fn different(&self) -> &[String] {
        &self.different
    }

    pub fn is_empty(&self) -> bool {
        self.matching.is_empty() && self.different.is_empty()
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Files with same names but different data:")?;
        for name in &self.different {
            writeln!(f, "{name}")?;
        }

        writeln!(f, "Files with same names and same data:")?;
        for name in &self.matching {
            writeln!(f, "{name}")?;
        }
        Ok(())
    }
}

/// What to do when a file pair cannot be read during content comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadErrorPolicy {
    /// Stop the run and surface the I/O error
    #[default]
    Abort,
    /// Log the error and record the pair as different
    TreatAsDifferent,
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Chunk size in bytes for lock-step content reads
    pub buffer_size: usize,

    /// Handling of read failures while comparing content
    pub read_error_policy: ReadErrorPolicy,

    /// Compare file pairs on a thread pool
    pub parallel: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            read_error_policy: ReadErrorPolicy::Abort,
            parallel: false,
        }
    }
}

use crate::comparator::{ByteComparator, FileComparator};
use crate::scanner::DirectoryScanner;
use dircompare_common::{AppConfig, ComparisonResult, DirCompareError, FileEntry, ReadErrorPolicy};
use rayon::prelude::*;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;
use tracing::{debug, info, warn};

pub const INVALID_ARGUMENTS: &str = "Invalid input data";
pub const INVALID_DIRECTORIES: &str = "One or both directories are not valid";
pub const MISSING_DIRECTORIES: &str = "One or both directories do not exist";

/// Classification of one same-named pair, carrying the label to record
#[derive(Debug, Clone, PartialEq, Eq)]
enum PairOutcome {
    Matching(String),
    Different(String),
}

/// Compares the top-level files of two directories by name and content
pub struct DirectoryDiffEngine {
    scanner: DirectoryScanner,
    comparator: Box<dyn FileComparator>,
    read_error_policy: ReadErrorPolicy,
    parallel: bool,
}

impl DirectoryDiffEngine {
    pub fn new() -> Self {
        Self {
            scanner: DirectoryScanner::new(),
            comparator: Box::new(ByteComparator::new()),
            read_error_policy: ReadErrorPolicy::Abort,
            parallel: false,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .with_comparator(ByteComparator::new().with_buffer_size(config.buffer_size))
            .with_read_error_policy(config.read_error_policy)
            .with_parallel(config.parallel)
    }

    pub fn with_comparator(mut self, comparator: impl FileComparator + 'static) -> Self {
        self.comparator = Box::new(comparator);
        self
    }

    pub fn with_read_error_policy(mut self, policy: ReadErrorPolicy) -> Self {
        self.read_error_policy = policy;
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Compare the files directly inside `first` and `second`.
    ///
    /// Files are paired by case-insensitive name. Every colliding pair is
    /// classified on its own, so a name can show up more than once.
    /// Matching pairs are labelled with the first directory's file name and
    /// differing pairs with the second's.
    pub fn compare(&self, first: &Path, second: &Path) -> Result<ComparisonResult, DirCompareError> {
        validate_directories(first, second)?;

        info!("Comparing {} with {}", first.display(), second.display());

        let first_entries = self.scanner.scan(first)?;
        let second_entries = self.scanner.scan(second)?;
        let pairs = pair_by_name(&first_entries, &second_entries);

        debug!(
            "Found {} same-named pairs among {} and {} files",
            pairs.len(),
            first_entries.len(),
            second_entries.len()
        );

        let outcomes: Vec<PairOutcome> = if self.parallel {
            pairs
                .par_iter()
                .map(|(a, b)| self.classify(a, b))
                .collect::<Result<_, _>>()?
        } else {
            pairs
                .iter()
                .map(|(a, b)| self.classify(a, b))
                .collect::<Result<_, _>>()?
        };

        let mut matching = Vec::new();
        let mut different = Vec::new();
        for outcome in outcomes {
            match outcome {
                PairOutcome::Matching(name) => matching.push(name),
                PairOutcome::Different(name) => different.push(name),
            }
        }

        info!("{} matching, {} different", matching.len(), different.len());
        Ok(ComparisonResult::new(matching, different))
    }

    fn classify(&self, first: &FileEntry, second: &FileEntry) -> Result<PairOutcome, DirCompareError> {
        if first.size != second.size {
            debug!("{} differs in size ({} vs {})", second.name, first.size, second.size);
            return Ok(PairOutcome::Different(second.name.clone()));
        }

        match self.comparator.are_equal(&first.path, &second.path) {
            Ok(true) => Ok(PairOutcome::Matching(first.name.clone())),
            Ok(false) => Ok(PairOutcome::Different(second.name.clone())),
            Err(e) => match self.read_error_policy {
                ReadErrorPolicy::Abort => Err(e),
                ReadErrorPolicy::TreatAsDifferent => {
                    warn!("Could not compare {:?} with {:?}: {}", first.path, second.path, e);
                    Ok(PairOutcome::Different(second.name.clone()))
                }
            },
        }
    }
}

impl Default for DirectoryDiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that exactly two directories were supplied.
pub fn validate_arguments<P: AsRef<Path>>(args: &[P]) -> Result<(&Path, &Path), DirCompareError> {
    match args {
        [first, second] => Ok((first.as_ref(), second.as_ref())),
        _ => Err(DirCompareError::invalid_input(INVALID_ARGUMENTS)),
    }
}

/// Check that both paths are well formed and name existing directories.
pub fn validate_directories(first: &Path, second: &Path) -> Result<(), DirCompareError> {
    if !is_well_formed(first) || !is_well_formed(second) {
        return Err(DirCompareError::invalid_input(INVALID_DIRECTORIES));
    }
    if !first.is_dir() || !second.is_dir() {
        return Err(DirCompareError::invalid_input(MISSING_DIRECTORIES));
    }
    Ok(())
}

fn is_well_formed(path: &Path) -> bool {
    let raw = path.as_os_str();
    !raw.is_empty() && !raw.to_string_lossy().contains('\0')
}

/// Pair every first-side entry with every second-side entry whose name
/// matches it under ASCII case folding.
fn pair_by_name<'a>(
    first: &'a [FileEntry],
    second: &'a [FileEntry],
) -> Vec<(&'a FileEntry, &'a FileEntry)> {
    let mut index: HashMap<OsString, Vec<&FileEntry>> = HashMap::new();
    for entry in second {
        index.entry(folded_name(entry)).or_default().push(entry);
    }

    let mut pairs = Vec::new();
    for entry in first {
        if let Some(candidates) = index.get(&folded_name(entry)) {
            pairs.extend(candidates.iter().map(|candidate| (entry, *candidate)));
        }
    }
    pairs
}

/// Folds the on-disk name rather than the display name, which is lossy for
/// non-UTF-8 bytes.
fn folded_name(entry: &FileEntry) -> OsString {
    entry
        .path
        .file_name()
        .unwrap_or(entry.path.as_os_str())
        .to_ascii_lowercase()
}

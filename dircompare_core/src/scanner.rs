use dircompare_common::{DirCompareError, FileEntry};
use jwalk::{Parallelism, WalkDir};
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

/// Lists the regular files sitting directly inside a directory
#[derive(Debug, Clone, Default)]
pub struct DirectoryScanner;

impl DirectoryScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scan `root` one level deep. Subdirectories and their contents are
    /// skipped; the order of the returned entries is unspecified.
    pub fn scan(&self, root: &Path) -> Result<Vec<FileEntry>, DirCompareError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(root)
            .max_depth(1)
            .follow_links(false)
            .skip_hidden(false)
            .sort(false)
            .parallelism(Parallelism::Serial);

        for entry in walker {
            let entry = entry.map_err(|e| walk_error("Walk error", e))?;

            // The root itself is yielded at depth 0
            if entry.depth == 0 || !entry.file_type().is_file() {
                continue;
            }

            let metadata = entry.metadata().map_err(|e| walk_error("Metadata error", e))?;

            entries.push(FileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
                size: metadata.len(),
                modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }

        debug!("Scanned {} files from {:?}", entries.len(), root);
        Ok(entries)
    }
}

fn walk_error(context: &str, err: jwalk::Error) -> DirCompareError {
    DirCompareError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("{context}: {err}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sorted_names(entries: &[FileEntry]) -> Vec<String> {
        let mut names: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_scanner_top_level_files_only() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("file1.txt"), b"test").unwrap();
        fs::write(temp.path().join("file2.txt"), b"test").unwrap();
        fs::create_dir(temp.path().join("subdir")).unwrap();
        fs::write(temp.path().join("subdir/file3.txt"), b"test").unwrap();

        let entries = DirectoryScanner::new().scan(temp.path()).unwrap();

        assert_eq!(sorted_names(&entries), ["file1.txt", "file2.txt"]);
    }

    #[test]
    fn test_scanner_records_size_and_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("data.bin"), vec![0u8; 1234]).unwrap();

        let entries = DirectoryScanner::new().scan(temp.path()).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "data.bin");
        assert_eq!(entries[0].size, 1234);
        assert_eq!(entries[0].path, temp.path().join("data.bin"));
    }

    #[test]
    fn test_scanner_includes_hidden_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".hidden"), b"x").unwrap();

        let entries = DirectoryScanner::new().scan(temp.path()).unwrap();

        assert_eq!(sorted_names(&entries), [".hidden"]);
    }

    #[test]
    fn test_scanner_empty_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("only_a_dir")).unwrap();

        let entries = DirectoryScanner::new().scan(temp.path()).unwrap();
        assert!(entries.is_empty());
    }
}

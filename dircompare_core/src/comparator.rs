use dircompare_common::{DirCompareError, DEFAULT_BUFFER_SIZE};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Decides whether two files hold the same bytes
pub trait FileComparator: Send + Sync {
    fn are_equal(&self, first: &Path, second: &Path) -> Result<bool, DirCompareError>;
}

/// Compares file contents chunk by chunk, stopping at the first mismatch
#[derive(Debug, Clone)]
pub struct ByteComparator {
    buffer_size: usize,
}

impl ByteComparator {
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Read both streams in lock-step and report whether they end together
    /// with identical content.
    pub fn readers_equal<A: Read, B: Read>(&self, mut first: A, mut second: B) -> std::io::Result<bool> {
        let mut first_buf = vec![0u8; self.buffer_size];
        let mut second_buf = vec![0u8; self.buffer_size];

        loop {
            let first_len = fill_chunk(&mut first, &mut first_buf)?;
            let second_len = fill_chunk(&mut second, &mut second_buf)?;

            if first_len != second_len || first_buf[..first_len] != second_buf[..second_len] {
                return Ok(false);
            }
            if first_len == 0 {
                return Ok(true);
            }
        }
    }
}

impl Default for ByteComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl FileComparator for ByteComparator {
    fn are_equal(&self, first: &Path, second: &Path) -> Result<bool, DirCompareError> {
        let first_file = File::open(first)?;
        let second_file = File::open(second)?;

        // Quick size check
        if first_file.metadata()?.len() != second_file.metadata()?.len() {
            return Ok(false);
        }

        Ok(self.readers_equal(first_file, second_file)?)
    }
}

/// Fill `buf` from `reader`, returning fewer bytes only at end of stream.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// Hands out at most `step` bytes per read call
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_identical_files_are_equal() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        let b = temp.path().join("b.txt");
        fs::write(&a, b"hello").unwrap();
        fs::write(&b, b"hello").unwrap();

        assert!(ByteComparator::new().are_equal(&a, &b).unwrap());
    }

    #[test]
    fn test_one_differing_byte() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        let b = temp.path().join("b.txt");
        fs::write(&a, b"abc").unwrap();
        fs::write(&b, b"abd").unwrap();

        assert!(!ByteComparator::new().are_equal(&a, &b).unwrap());
    }

    #[test]
    fn test_different_sizes() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        let b = temp.path().join("b.txt");
        fs::write(&a, b"hello").unwrap();
        fs::write(&b, b"hello world").unwrap();

        assert!(!ByteComparator::new().are_equal(&a, &b).unwrap());
    }

    #[test]
    fn test_empty_files_are_equal() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::write(&a, b"").unwrap();
        fs::write(&b, b"").unwrap();

        assert!(ByteComparator::new().are_equal(&a, &b).unwrap());
    }

    #[test]
    fn test_mismatch_across_chunk_boundary() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.bin");
        let b = temp.path().join("b.bin");
        let left = vec![7u8; 10_000];
        let mut right = left.clone();
        right[9_999] = 8;
        fs::write(&a, &left).unwrap();
        fs::write(&b, &right).unwrap();

        let comparator = ByteComparator::new().with_buffer_size(4096);
        assert!(!comparator.are_equal(&a, &b).unwrap());
        assert!(comparator.are_equal(&a, &a).unwrap());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        fs::write(&a, b"hello").unwrap();

        let err = ByteComparator::new()
            .are_equal(&a, &temp.path().join("gone.txt"))
            .unwrap_err();
        assert!(matches!(err, DirCompareError::Io(_)));
    }

    #[test]
    fn test_short_reads_do_not_break_lock_step() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let comparator = ByteComparator::new().with_buffer_size(8);

        let first = Trickle { data, step: 3 };
        let second = Trickle { data, step: 5 };
        assert!(comparator.readers_equal(first, second).unwrap());
    }

    #[test]
    fn test_stream_ending_early_is_unequal() {
        let comparator = ByteComparator::new().with_buffer_size(2);
        let equal = comparator
            .readers_equal(Cursor::new(b"abcd".to_vec()), Cursor::new(b"abc".to_vec()))
            .unwrap();
        assert!(!equal);
    }

    #[test]
    fn test_zero_buffer_size_is_clamped() {
        let comparator = ByteComparator::new().with_buffer_size(0);
        assert_eq!(comparator.buffer_size(), 1);
        assert!(comparator
            .readers_equal(Cursor::new(b"xy".to_vec()), Cursor::new(b"xy".to_vec()))
            .unwrap());
    }
}

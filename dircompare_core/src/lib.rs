pub mod comparator;
pub mod comparison;
pub mod scanner;

pub use comparator::{ByteComparator, FileComparator};
pub use comparison::{validate_arguments, validate_directories, DirectoryDiffEngine};
pub use scanner::DirectoryScanner;

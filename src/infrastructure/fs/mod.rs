//! File system implementations
//!
//! - `local` - atomic writes, hashing, tree copies
//! - `scan` - build context scanning

mod local;
mod scan;

pub use local::{atomic_write, copy_file, copy_tree, hash_file, is_executable, tree_stats};
pub use scan::scan_source;

//! Atomic file writes
//!
//! Settings files are rewritten through a temporary sibling:
//!
//! 1. Write to `<path>.tmp`
//! 2. `sync_all()` to flush to disk
//! 3. Rename over the final path
//!
//! A crash leaves either the old file or the new one, never a partial write.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Atomically replace `path` with `content`, creating parent directories
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    fs::rename(&temp_path, path)
}

//! Heap-resident file reading: the owned-buffer counterpart to
//! [`crate::region::MappedRegion`].

use std::path::Path;

use crate::Result;

/// Reads `path` fully into a heap-resident buffer.
///
/// Prefer [`crate::region::MappedRegion`] for files too large to
/// comfortably hold twice over (once in the page cache, once here).
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    Ok(std::fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_file_contents() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(&[7u8; 32]).expect("write temp file");
        let bytes = read_file(file.path()).expect("read temp file");
        assert_eq!(bytes, vec![7u8; 32]);
    }
}

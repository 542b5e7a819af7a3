//! Byte-region adapters: a heap-resident buffer and a memory-mapped file,
//! consumed identically by the locator, reconstructor and decoder.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::Result;

/// A read-only view over a raw TPX3 byte region, regardless of whether it
/// is backed by an owned buffer or a memory map.
pub trait ByteRegion {
    /// Borrows the whole region as a byte slice.
    fn as_bytes(&self) -> &[u8];

    /// Region length in bytes.
    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the region is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ByteRegion for Vec<u8> {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

/// A memory-mapped TPX3 file.
pub struct MappedRegion {
    mmap: Mmap,
}

impl MappedRegion {
    /// Memory-maps `path` for read-only access.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only for the lifetime of this value;
        // the caller is responsible for not truncating the backing file
        // out from under it, the same caveat any memmap2 user accepts.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self { mmap })
    }
}

impl ByteRegion for MappedRegion {
    fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn owned_buffer_is_a_byte_region() {
        let buf = vec![1u8, 2, 3, 4];
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn mapped_region_reads_file_contents() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(&[9u8; 16]).expect("write temp file");
        let region = MappedRegion::open(file.path()).expect("mmap temp file");
        assert_eq!(region.len(), 16);
        assert_eq!(region.as_bytes(), &[9u8; 16]);
    }
}

use std::fmt;
use std::hash::{Hash, Hasher};

use super::error::{StorageError, StorageResult};
use super::{PAGE_SIZE, PageId};

/// Largest offset at which a 4-byte integer still fits inside a page
const MAX_INT_OFFSET: usize = PAGE_SIZE - 4;

/// A fixed-size block of the backing heap file, identified by its page id.
/// Integers are stored big-endian at caller-supplied byte offsets.
pub struct Page {
    id: PageId,
    data: Box<[u8; PAGE_SIZE]>,
}

impl Page {
    /// Create a brand new zero-filled page
    pub fn new(id: PageId) -> Self {
        Self {
            id,
            data: Box::new([0u8; PAGE_SIZE]),
        }
    }

    /// Wrap bytes loaded from storage as a page
    pub fn from_bytes(id: PageId, bytes: Vec<u8>) -> StorageResult<Self> {
        if bytes.len() != PAGE_SIZE {
            return Err(StorageError::InvalidPageSize {
                expected: PAGE_SIZE,
                actual: bytes.len(),
            });
        }

        let mut data = Box::new([0u8; PAGE_SIZE]);
        data.copy_from_slice(&bytes);
        Ok(Self { id, data })
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    /// Read a big-endian u32 at the given byte offset
    pub fn read_int(&self, offset: usize) -> StorageResult<u32> {
        Self::check_offset(offset)?;
        let bytes = [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ];
        Ok(u32::from_be_bytes(bytes))
    }

    /// Write a big-endian u32 at the given byte offset
    pub fn write_int(&mut self, offset: usize, value: u32) -> StorageResult<()> {
        Self::check_offset(offset)?;
        self.data[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Raw bytes, for I/O transfer only
    pub fn data(&self) -> &[u8] {
        &self.data[..]
    }

    /// Mutable raw bytes, for I/O transfer only
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data[..]
    }

    fn check_offset(offset: usize) -> StorageResult<()> {
        if offset > MAX_INT_OFFSET {
            return Err(StorageError::OffsetOutOfRange {
                offset,
                max: MAX_INT_OFFSET,
            });
        }
        Ok(())
    }
}

// Cache identity is the page id, never the content
impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Page {}

impl Hash for Page {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page").field("id", &self.id).finish_non_exhaustive()
    }
}

use std::io;
use thiserror::Error;

use super::PageId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("could not open backing file {path}: {source}")]
    FileOpen { path: String, source: io::Error },

    #[error("page {page_id} is out of range: file holds {page_count} pages")]
    PageOutOfRange { page_id: PageId, page_count: usize },

    #[error("invalid page size: expected {expected}, got {actual}")]
    InvalidPageSize { expected: usize, actual: usize },

    #[error("offset {offset} out of range for a 4-byte access (max {max})")]
    OffsetOutOfRange { offset: usize, max: usize },
}

pub type StorageResult<T> = Result<T, StorageError>;

use thiserror::Error;

use crate::storage::{PageId, StorageError};

#[derive(Debug, Error)]
pub enum BufferError {
    #[error("failed to load page {page_id}: {source}")]
    PageLoad {
        page_id: PageId,
        source: StorageError,
    },

    #[error("failed to write back page {page_id}: {source}")]
    WriteBack {
        page_id: PageId,
        source: StorageError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type BufferResult<T> = Result<T, BufferError>;

pub mod buffer;
pub mod storage;

pub use buffer::{BufferError, BufferPool, BufferResult};
pub use storage::{PAGE_SIZE, Page, PageId, PageStore, StorageError, StorageResult};

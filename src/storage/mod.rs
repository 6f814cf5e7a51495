mod error;
mod page;
mod page_store;

pub use error::{StorageError, StorageResult};
pub use page::Page;
pub use page_store::PageStore;

/// Page size in bytes (4KB)
pub const PAGE_SIZE: usize = 4096;

/// Page ID type: a page's id is its position in the backing file
pub type PageId = usize;

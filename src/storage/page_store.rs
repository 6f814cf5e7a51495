use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::trace;

use super::error::{StorageError, StorageResult};
use super::page::Page;
use super::{PAGE_SIZE, PageId};

/// Heap-file I/O layer over a single backing file.
///
/// Page id `i` always occupies the byte range `[i*PAGE_SIZE, (i+1)*PAGE_SIZE)`;
/// there is no header and no metadata, so the file length is always a
/// multiple of `PAGE_SIZE`. All operations take `&mut self`, which keeps each
/// seek-then-transfer sequence exclusive on the handle.
pub struct PageStore {
    file: File,
    path: PathBuf,
    /// When set, writes of this page id fail with an injected I/O error
    #[cfg(test)]
    fail_write_page: Option<PageId>,
}

impl PageStore {
    /// Open the backing file for read-write access, creating it if missing
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)
            .map_err(|source| StorageError::FileOpen {
                path: path.display().to_string(),
                source,
            })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            #[cfg(test)]
            fail_write_page: None,
        })
    }

    /// Read the page with the given id.
    ///
    /// Reading an id at or past the end of the file fails with
    /// `PageOutOfRange` rather than returning zeroed data.
    pub fn read_page(&mut self, page_id: PageId) -> StorageResult<Page> {
        let page_count = self.page_count()?;
        if page_id >= page_count {
            return Err(StorageError::PageOutOfRange {
                page_id,
                page_count,
            });
        }

        let mut page = Page::new(page_id);
        self.file.seek(SeekFrom::Start((page_id * PAGE_SIZE) as u64))?;
        self.file.read_exact(page.data_mut())?;

        trace!("read page {}", page_id);
        Ok(page)
    }

    /// Write a page at its id's byte range. Writing at or beyond the current
    /// end of the file extends it; this is the sole allocation mechanism.
    pub fn write_page(&mut self, page: &Page) -> StorageResult<()> {
        #[cfg(test)]
        if self.fail_write_page == Some(page.id()) {
            return Err(StorageError::Io(std::io::Error::other(
                "injected write failure",
            )));
        }

        self.file.seek(SeekFrom::Start((page.id() * PAGE_SIZE) as u64))?;
        self.file.write_all(page.data())?;

        trace!("wrote page {}", page.id());
        Ok(())
    }

    /// Number of whole pages currently in the file
    pub fn page_count(&self) -> StorageResult<usize> {
        let file_len = self.file.metadata()?.len();
        Ok((file_len / PAGE_SIZE as u64) as usize)
    }

    /// Flush OS buffers for the backing file to disk
    pub fn sync(&mut self) -> StorageResult<()> {
        self.file.sync_data()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make writes of the given page id fail (or clear the fault with None)
    #[cfg(test)]
    pub(crate) fn fail_writes_for(&mut self, page_id: Option<PageId>) {
        self.fail_write_page = page_id;
    }
}

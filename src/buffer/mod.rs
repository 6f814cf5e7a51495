mod error;

pub use error::{BufferError, BufferResult};

use log::{debug, trace, warn};
use lru::LruCache;

use crate::storage::{Page, PageId, PageStore};

/// A resident page plus its dirty flag. Keeping the flag inside the cache
/// entry means "dirty implies resident" holds by construction.
struct Frame {
    page: Page,
    dirty: bool,
}

/// Bounded page cache in front of a [`PageStore`], with strict LRU eviction
/// and write-back of dirty pages before their memory is reused.
///
/// Designed for a single caller context; every operation takes `&mut self`.
pub struct BufferPool {
    store: PageStore,
    /// Recency-ordered resident set. Created unbounded so the capacity check
    /// stays in [`BufferPool::evict_lru`], where a failed write-back can
    /// abort the removal instead of discarding the page.
    frames: LruCache<PageId, Frame>,
    max_pages: usize,
}

impl BufferPool {
    /// Create a pool holding at most `max_pages` resident pages.
    ///
    /// # Panics
    /// Panics if `max_pages` is zero.
    pub fn new(store: PageStore, max_pages: usize) -> Self {
        assert!(max_pages > 0, "buffer pool needs room for at least one page");
        Self {
            store,
            frames: LruCache::unbounded(),
            max_pages,
        }
    }

    /// Get a page, loading it from the store on a miss. The page is promoted
    /// to most-recently-used either way.
    pub fn get_page(&mut self, page_id: PageId) -> BufferResult<&Page> {
        self.load_if_missing(page_id)?;

        // Residency is guaranteed by load_if_missing; get updates recency
        Ok(&self.frames.get(&page_id).unwrap().page)
    }

    /// Get a page for modification. The frame is marked dirty, so the bytes
    /// are guaranteed to reach the store on eviction or flush.
    pub fn get_page_mut(&mut self, page_id: PageId) -> BufferResult<&mut Page> {
        self.load_if_missing(page_id)?;

        let frame = self.frames.get_mut(&page_id).unwrap();
        frame.dirty = true;
        Ok(&mut frame.page)
    }

    /// Set or clear the dirty flag on a resident page, without touching the
    /// recency order. Returns `false` when the page is not resident; no
    /// entry is created in that case.
    pub fn set_dirty(&mut self, page_id: PageId, dirty: bool) -> bool {
        match self.frames.peek_mut(&page_id) {
            Some(frame) => {
                frame.dirty = dirty;
                true
            }
            None => {
                trace!("set_dirty({}, {}) ignored: page not resident", page_id, dirty);
                false
            }
        }
    }

    /// Write back every resident dirty page without evicting anything.
    ///
    /// Flushing continues past individual failures (failed pages keep their
    /// dirty flag); the first error is returned once every page has been
    /// attempted. On full success the backing file is synced.
    pub fn flush_all(&mut self) -> BufferResult<()> {
        let dirty_ids: Vec<PageId> = self
            .frames
            .iter()
            .filter(|(_, frame)| frame.dirty)
            .map(|(&page_id, _)| page_id)
            .collect();

        debug!("flushing {} dirty pages", dirty_ids.len());

        let mut first_error = None;
        for page_id in dirty_ids {
            // peek_mut keeps the recency order untouched
            let Some(frame) = self.frames.peek_mut(&page_id) else {
                continue;
            };
            match self.store.write_page(&frame.page) {
                Ok(()) => frame.dirty = false,
                Err(source) => {
                    warn!("flush: could not write back page {}: {}", page_id, source);
                    if first_error.is_none() {
                        first_error = Some(BufferError::WriteBack { page_id, source });
                    }
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        self.store.sync()?;
        Ok(())
    }

    /// Extend the backing file with a zero-filled page and return its id.
    ///
    /// The new page bypasses the cache entirely; the first `get_page` on it
    /// performs a fresh load.
    pub fn allocate_new_page(&mut self) -> BufferResult<PageId> {
        let page_id = self.store.page_count()?;
        self.store.write_page(&Page::new(page_id))?;

        debug!("allocated page {}", page_id);
        Ok(page_id)
    }

    /// Number of pages currently resident
    pub fn resident_count(&self) -> usize {
        self.frames.len()
    }

    /// Maximum number of resident pages
    pub fn capacity(&self) -> usize {
        self.max_pages
    }

    /// Whether a page is currently resident (does not affect recency)
    pub fn is_resident(&self, page_id: PageId) -> bool {
        self.frames.contains(&page_id)
    }

    /// Number of resident pages currently marked dirty
    pub fn dirty_page_count(&self) -> usize {
        self.frames.iter().filter(|(_, frame)| frame.dirty).count()
    }

    pub fn store(&self) -> &PageStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PageStore {
        &mut self.store
    }

    /// Ensure `page_id` is resident, loading it from the store if needed.
    fn load_if_missing(&mut self, page_id: PageId) -> BufferResult<()> {
        if self.frames.contains(&page_id) {
            return Ok(());
        }

        // Read before making room: a failed load must leave residency
        // untouched, so eviction only happens once the page is in hand.
        let page = self
            .store
            .read_page(page_id)
            .map_err(|source| BufferError::PageLoad { page_id, source })?;

        while self.frames.len() >= self.max_pages {
            self.evict_lru()?;
        }

        debug!("loaded page {} ({} resident)", page_id, self.frames.len() + 1);
        self.frames.put(page_id, Frame { page, dirty: false });
        Ok(())
    }

    /// Evict the least-recently-used page, in two explicit phases: choose
    /// the victim, then write it back if dirty. The victim is removed only
    /// after its bytes are safely in the store, so a failed write-back
    /// leaves it resident and dirty.
    fn evict_lru(&mut self) -> BufferResult<()> {
        let Some((&victim, frame)) = self.frames.peek_lru() else {
            return Ok(());
        };

        if frame.dirty {
            self.store
                .write_page(&frame.page)
                .map_err(|source| BufferError::WriteBack {
                    page_id: victim,
                    source,
                })?;
            debug!("evicted dirty page {} after write-back", victim);
        } else {
            trace!("evicted clean page {}", victim);
        }

        self.frames.pop(&victim);
        Ok(())
    }
}

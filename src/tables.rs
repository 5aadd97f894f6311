//! Page-table and frame-table state.
//!
//! Absence is modelled with `Option` rather than a sentinel index, and the
//! two frame lists (free pool and occupied FIFO ring) are separate
//! structures, so a frame's list membership is always explicit. At every
//! point between accesses `free.len() + ring.len()` equals the number of
//! frames.

use std::collections::VecDeque;

/// Per-page state. A page is present iff `frame` is `Some`, and the named
/// frame's owner is always this page.
#[derive(Debug, Clone, Copy, Default)]
pub struct Page {
    frame: Option<usize>,
    modified: bool,
    referenced: bool,
}

impl Page {
    pub fn is_present(&self) -> bool {
        self.frame.is_some()
    }

    pub fn frame(&self) -> Option<usize> {
        self.frame
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_referenced(&self) -> bool {
        self.referenced
    }

    /// Bind this page to a frame. Clears the modified bit; the referenced
    /// bit is untouched (only the replacement scan ever clears it).
    pub(crate) fn install(&mut self, frame: usize) {
        self.frame = Some(frame);
        self.modified = false;
    }

    /// Drop residency. The modified and referenced bits keep their values
    /// until the page is installed again.
    pub(crate) fn evict(&mut self) {
        self.frame = None;
    }

    pub(crate) fn set_modified(&mut self) {
        self.modified = true;
    }

    pub(crate) fn set_referenced(&mut self) {
        self.referenced = true;
    }

    pub(crate) fn clear_referenced(&mut self) {
        self.referenced = false;
    }
}

/// The page table: one entry per virtual page, all absent at start.
pub struct PageTable {
    pages: Vec<Page>,
}

impl PageTable {
    pub fn new(num_pages: usize) -> Self {
        PageTable {
            pages: vec![Page::default(); num_pages],
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }
}

impl std::ops::Index<usize> for PageTable {
    type Output = Page;

    fn index(&self, page: usize) -> &Page {
        &self.pages[page]
    }
}

impl std::ops::IndexMut<usize> for PageTable {
    fn index_mut(&mut self, page: usize) -> &mut Page {
        &mut self.pages[page]
    }
}

/// Pool of frames not holding any page. Built once over all frames in index
/// order (frame 0 comes out first) and never refilled: eviction reuses
/// frames in place instead of freeing them.
#[derive(Debug)]
struct FreeList {
    frames: VecDeque<usize>,
}

impl FreeList {
    fn with_all(num_frames: usize) -> Self {
        FreeList {
            frames: (0..num_frames).collect(),
        }
    }

    fn pop(&mut self) -> Option<usize> {
        self.frames.pop_front()
    }

    fn len(&self) -> usize {
        self.frames.len()
    }
}

/// Circular FIFO of the frames currently holding pages.
///
/// `tail` names the most recently inserted or most recently scanned frame;
/// the element after it is the oldest, which is both the FIFO head and the
/// position the clock hand examines first. Advancing the hand and pushing a
/// frame to the back are therefore the same pointer move. Link entries are
/// only meaningful for frames currently in the ring.
#[derive(Debug)]
struct OccupiedRing {
    next: Vec<usize>,
    tail: Option<usize>,
    len: usize,
}

impl OccupiedRing {
    fn new(num_frames: usize) -> Self {
        OccupiedRing {
            next: (0..num_frames).collect(),
            tail: None,
            len: 0,
        }
    }

    /// Insert a frame at the back of the FIFO order.
    fn push_back(&mut self, frame: usize) {
        match self.tail {
            None => self.next[frame] = frame, // singleton self-loop
            Some(tail) => {
                self.next[frame] = self.next[tail];
                self.next[tail] = frame;
            }
        }
        self.tail = Some(frame);
        self.len += 1;
    }

    /// Oldest frame in the ring (the one after the tail), if any.
    fn head(&self) -> Option<usize> {
        self.tail.map(|t| self.next[t])
    }

    /// Move the hand one step: the current head becomes the last-visited
    /// element. No links change, so the physical ring order is preserved.
    fn advance(&mut self) {
        self.tail = self.head();
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// The frame table: per-frame owner plus the free pool and occupied ring
/// the frames migrate between.
pub struct FrameTable {
    owners: Vec<Option<usize>>,
    free: FreeList,
    ring: OccupiedRing,
}

impl FrameTable {
    pub fn new(num_frames: usize) -> Self {
        FrameTable {
            owners: vec![None; num_frames],
            free: FreeList::with_all(num_frames),
            ring: OccupiedRing::new(num_frames),
        }
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Page currently held by `frame`, if any.
    pub fn owner(&self, frame: usize) -> Option<usize> {
        self.owners[frame]
    }

    pub fn free_frames(&self) -> usize {
        self.free.len()
    }

    pub fn occupied_frames(&self) -> usize {
        self.ring.len()
    }

    pub(crate) fn set_owner(&mut self, frame: usize, page: usize) {
        self.owners[frame] = Some(page);
    }

    /// Take the oldest free frame, if the pool is not exhausted.
    pub(crate) fn pop_free(&mut self) -> Option<usize> {
        self.free.pop()
    }

    /// Place a freshly allocated frame at the back of the occupied ring.
    pub(crate) fn enqueue_occupied(&mut self, frame: usize) {
        self.ring.push_back(frame);
    }

    /// Frame the clock hand examines next.
    pub(crate) fn clock_head(&self) -> Option<usize> {
        self.ring.head()
    }

    /// Step the clock hand past the current head.
    pub(crate) fn clock_advance(&mut self) {
        self.ring.advance();
    }
}

//! FIFO-with-second-chance (clock) victim selection.

use log::debug;

use crate::tables::{FrameTable, PageTable};

/// Page chosen for eviction together with the frame it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Victim {
    pub page: usize,
    pub frame: usize,
}

/// Scan the occupied ring starting just past the hand's last position and
/// return the first page found with its referenced bit clear. A set bit is
/// consumed instead: it is cleared and the page conceptually moves to the
/// back of the FIFO by advancing the hand over it. The hand ends up resting
/// on the victim's frame, so the next scan resumes right after it.
///
/// Must only be called with at least one occupied frame; the fault handler
/// guarantees this by consulting the free list first.
pub fn choose_victim(pages: &mut PageTable, frames: &mut FrameTable, detailed: bool) -> Victim {
    loop {
        let frame = frames
            .clock_head()
            .expect("replacement requested with an empty occupied ring");
        let page = frames
            .owner(frame)
            .expect("frame in occupied ring has no owning page");

        if pages[page].is_referenced() {
            // Second chance consumed.
            pages[page].clear_referenced();
            frames.clock_advance();
            continue;
        }

        if detailed {
            println!("@ Choosing (FIFO 2nd chance) P{} of F{} to be replaced", page, frame);
        }
        debug!("clock scan selected page {} in frame {}", page, frame);

        frames.clock_advance();
        return Victim { page, frame };
    }
}

//! The simulation context: MMU translation plus the OS fault handler.

use log::debug;

use crate::address::{AccessResult, Operation, VirtualAddress};
use crate::replacement::{self, Victim};
use crate::tables::{FrameTable, PageTable};

/// Construction parameters for a simulation instance. The geometry is fixed
/// for the life of the run.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub num_pages: usize,
    pub num_frames: usize,
    pub page_size: u32,
    /// Emit the per-access and per-fault trace on stdout.
    pub detailed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            num_pages: 64,
            num_frames: 8,
            page_size: 512,
            detailed: false,
        }
    }
}

/// Aggregate access counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub reads: u64,
    pub writes: u64,
    pub page_faults: u64,
    pub write_backs: u64,
    pub illegal_refs: u64,
}

/// One paged-memory machine: page table, frame table, counters. All state
/// lives here and is mutated only through `translate`, one reference at a
/// time.
pub struct System {
    page_size: u32,
    pages: PageTable,
    frames: FrameTable,
    counters: Counters,
    detailed: bool,
}

impl System {
    pub fn new(config: Config) -> Self {
        debug!(
            "system: {} pages, {} frames, page size {}",
            config.num_pages, config.num_frames, config.page_size
        );
        System {
            page_size: config.page_size,
            pages: PageTable::new(config.num_pages),
            frames: FrameTable::new(config.num_frames),
            counters: Counters::default(),
            detailed: config.detailed,
        }
    }

    /// Simulated MMU: translate one virtual address, faulting the page in
    /// if needed and recording the reference.
    ///
    /// A page number outside the address space is the only failure: it is
    /// counted and answered with `IllegalReference`, touching nothing else.
    pub fn translate(&mut self, addr: u32, op: Operation) -> AccessResult {
        let va = VirtualAddress::decompose(addr, self.page_size);

        if va.page >= self.pages.len() {
            self.counters.illegal_refs += 1;
            return AccessResult::IllegalReference;
        }

        let frame = match self.pages[va.page].frame() {
            Some(frame) => frame,
            None => self.handle_fault(va.page),
        };

        self.record(va.page, op);

        if self.detailed {
            println!("\t{} {} == P {} (F {}) + {}", op, addr, va.page, frame, va.offset);
        }

        AccessResult::Physical(frame as u32 * self.page_size + va.offset)
    }

    /// Count the reference and update the page's bits. Every reference sets
    /// the referenced bit; writes also dirty the page.
    fn record(&mut self, page: usize, op: Operation) {
        match op {
            Operation::Read => self.counters.reads += 1,
            Operation::Write => {
                self.counters.writes += 1;
                self.pages[page].set_modified();
            }
        }
        self.pages[page].set_referenced();
    }

    /// Simulated OS: bring a page in, taking a free frame if one is left
    /// and evicting otherwise. Returns the frame the page landed in.
    fn handle_fault(&mut self, page: usize) -> usize {
        self.counters.page_faults += 1;
        if self.detailed {
            println!("@ PAGE_FAULT in P{}!", page);
        }
        debug!("page fault on page {}", page);

        match self.frames.pop_free() {
            Some(frame) => {
                self.occupy_free_frame(frame, page);
                frame
            }
            None => {
                let victim = replacement::choose_victim(&mut self.pages, &mut self.frames, self.detailed);
                self.replace_page(victim, page)
            }
        }
    }

    /// Install a page into a frame fresh off the free list and queue the
    /// frame at the back of the occupied ring.
    fn occupy_free_frame(&mut self, frame: usize, page: usize) {
        if self.detailed {
            println!("@ Storing P{} in F{}", page, frame);
        }
        self.pages[page].install(frame);
        self.frames.set_owner(frame, page);
        self.frames.enqueue_occupied(frame);
    }

    /// Evict the victim and reuse its frame for the new page in one step.
    /// The frame keeps its ring position, so the FIFO order of frames is
    /// unchanged; only the owner switches.
    fn replace_page(&mut self, victim: Victim, new_page: usize) -> usize {
        if self.pages[victim.page].is_modified() {
            if self.detailed {
                println!("@ Writing modified P{} back (to disc) to replace it", victim.page);
            }
            self.counters.write_backs += 1;
        }

        if self.detailed {
            println!("@ Replacing victim P{} with P{} in F{}", victim.page, new_page, victim.frame);
        }

        self.pages[victim.page].evict();
        self.pages[new_page].install(victim.frame);
        self.frames.set_owner(victim.frame, new_page);
        victim.frame
    }

    // Read-only snapshot for reporting collaborators.

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn pages(&self) -> &PageTable {
        &self.pages
    }

    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::INVALID_ADDRESS;

    /// Page size 1 makes the address the page number, which keeps the
    /// replacement scenarios easy to read.
    fn unit_system(num_pages: usize, num_frames: usize) -> System {
        System::new(Config {
            num_pages,
            num_frames,
            page_size: 1,
            detailed: false,
        })
    }

    #[test]
    fn test_fault_on_first_access() {
        let mut sys = unit_system(4, 2);
        assert!(!sys.pages()[0].is_present());
        let result = sys.translate(0, Operation::Read);
        assert_eq!(result, AccessResult::Physical(0));
        assert!(sys.pages()[0].is_present());
        assert_eq!(sys.counters().page_faults, 1);
    }

    #[test]
    fn test_fills_free_frames_in_order() {
        let mut sys = unit_system(4, 2);
        sys.translate(0, Operation::Read);
        sys.translate(1, Operation::Read);
        assert_eq!(sys.pages()[0].frame(), Some(0));
        assert_eq!(sys.pages()[1].frame(), Some(1));
        assert_eq!(sys.counters().page_faults, 2);
        assert_eq!(sys.counters().write_backs, 0);
        assert_eq!(sys.frames().free_frames(), 0);
        assert_eq!(sys.frames().occupied_frames(), 2);
    }

    #[test]
    fn test_no_fault_when_resident() {
        let mut sys = unit_system(4, 2);
        sys.translate(0, Operation::Read);
        sys.translate(0, Operation::Read);
        sys.translate(0, Operation::Write);
        assert_eq!(sys.counters().page_faults, 1);
        assert_eq!(sys.counters().reads, 2);
        assert_eq!(sys.counters().writes, 1);
    }

    #[test]
    fn test_second_chance_evicts_oldest_after_full_pass() {
        // Both resident pages carry set referenced bits, so the scan strips
        // them on a full pass and comes back to evict the oldest.
        let mut sys = unit_system(4, 2);
        sys.translate(0, Operation::Read);
        sys.translate(1, Operation::Read);
        sys.translate(2, Operation::Read);
        assert_eq!(sys.counters().page_faults, 3);
        assert_eq!(sys.counters().write_backs, 0);
        assert!(!sys.pages()[0].is_present()); // victim
        assert_eq!(sys.pages()[2].frame(), Some(0)); // reused frame 0
        assert_eq!(sys.pages()[1].frame(), Some(1));
        assert!(!sys.pages()[1].is_referenced()); // stripped by the scan
    }

    #[test]
    fn test_newly_faulted_page_is_protected_once() {
        let mut sys = unit_system(8, 2);
        sys.translate(0, Operation::Read);
        sys.translate(1, Operation::Read);
        sys.translate(2, Operation::Read); // evicts page 0
        // Page 2 was just referenced; page 1 lost its bit to that scan.
        sys.translate(3, Operation::Read);
        assert!(sys.pages()[2].is_present());
        assert!(!sys.pages()[1].is_present()); // evicted instead
        assert_eq!(sys.counters().page_faults, 4);
    }

    #[test]
    fn test_write_back_on_dirty_eviction() {
        let mut sys = unit_system(4, 1);
        sys.translate(0, Operation::Write);
        assert!(sys.pages()[0].is_modified());
        sys.translate(1, Operation::Read); // evicts dirty page 0
        assert_eq!(sys.counters().write_backs, 1);
        assert!(!sys.pages()[0].is_present());
        assert_eq!(sys.pages()[1].frame(), Some(0));
        assert!(!sys.pages()[1].is_modified()); // clean after install
    }

    #[test]
    fn test_no_write_back_for_clean_victim() {
        let mut sys = unit_system(4, 1);
        sys.translate(0, Operation::Read);
        sys.translate(1, Operation::Read);
        assert_eq!(sys.counters().page_faults, 2);
        assert_eq!(sys.counters().write_backs, 0);
    }

    #[test]
    fn test_modified_clears_on_reinstall() {
        let mut sys = unit_system(4, 1);
        sys.translate(0, Operation::Write);
        sys.translate(1, Operation::Read); // write back page 0
        sys.translate(0, Operation::Read); // page 0 comes back clean
        assert_eq!(sys.counters().write_backs, 1);
        assert!(!sys.pages()[0].is_modified());
    }

    #[test]
    fn test_illegal_reference_only_counts() {
        let mut sys = unit_system(4, 2);
        sys.translate(0, Operation::Read);
        let before = sys.counters();
        let result = sys.translate(4, Operation::Write); // page 4 out of range
        assert_eq!(result, AccessResult::IllegalReference);
        assert_eq!(result.to_output(), INVALID_ADDRESS);
        let after = sys.counters();
        assert_eq!(after.illegal_refs, before.illegal_refs + 1);
        assert_eq!(after.page_faults, before.page_faults);
        assert_eq!(after.reads, before.reads);
        assert_eq!(after.writes, before.writes);
        assert_eq!(after.write_backs, before.write_backs);
    }

    #[test]
    fn test_physical_address_composition() {
        let mut sys = System::new(Config {
            num_pages: 8,
            num_frames: 4,
            page_size: 512,
            detailed: false,
        });
        // Page 5 lands in frame 0, page 2 in frame 1.
        assert_eq!(
            sys.translate(5 * 512 + 7, Operation::Read),
            AccessResult::Physical(7)
        );
        assert_eq!(
            sys.translate(2 * 512 + 100, Operation::Read),
            AccessResult::Physical(512 + 100)
        );
        // Resident hit keeps the same frame.
        assert_eq!(
            sys.translate(5 * 512, Operation::Write),
            AccessResult::Physical(0)
        );
    }

    #[test]
    fn test_frame_conservation_throughout() {
        let mut sys = unit_system(16, 3);
        let trace = [0u32, 1, 2, 3, 4, 1, 5, 0, 6, 7, 2];
        for &addr in &trace {
            sys.translate(addr, Operation::Read);
            assert_eq!(
                sys.frames().free_frames() + sys.frames().occupied_frames(),
                3
            );
        }
    }

    #[test]
    fn test_owner_and_page_agree() {
        let mut sys = unit_system(8, 2);
        for &addr in &[0u32, 1, 2, 3, 1, 0] {
            sys.translate(addr, Operation::Read);
            for f in 0..sys.frames().len() {
                if let Some(p) = sys.frames().owner(f) {
                    if sys.pages()[p].is_present() {
                        assert_eq!(sys.pages()[p].frame(), Some(f));
                    }
                }
            }
        }
    }

    #[test]
    fn test_dirty_bit_survives_eviction_until_reinstall() {
        let mut sys = unit_system(4, 1);
        sys.translate(0, Operation::Write);
        sys.translate(1, Operation::Read);
        // Evicted page keeps its stale dirty bit until it is installed again.
        assert!(sys.pages()[0].is_modified());
        sys.translate(0, Operation::Read);
        assert!(!sys.pages()[0].is_modified());
    }
}

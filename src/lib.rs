//! Simulator for the MMU and page-fault handler of a paged virtual-memory
//! machine, with FIFO-second-chance (clock) replacement. Driven one memory
//! reference at a time through [`System::translate`].

pub mod address;
pub mod io;
pub mod replacement;
pub mod report;
pub mod system;
pub mod tables;

// Re-export commonly used items for convenience
pub use address::{AccessResult, Operation, VirtualAddress, INVALID_ADDRESS};
pub use system::{Config, Counters, System};

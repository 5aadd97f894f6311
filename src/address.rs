use std::fmt;

/// Physical address returned for references outside the virtual address
/// space. All-ones, so it can never collide with a real frame address.
pub const INVALID_ADDRESS: u32 = u32::MAX;

/// Kind of memory reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    /// Parse a trace token (`R`/`W`, case-insensitive).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "R" | "r" => Some(Operation::Read),
            "W" | "w" => Some(Operation::Write),
            _ => None,
        }
    }

    /// Single-letter form used in trace output.
    pub fn letter(self) -> char {
        match self {
            Operation::Read => 'R',
            Operation::Write => 'W',
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Decomposed components of a virtual address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub raw: u32,
    pub page: usize,
    pub offset: u32,
}

impl VirtualAddress {
    /// Split a raw address into page number and offset. The page size is a
    /// runtime parameter and need not be a power of two, so this divides
    /// rather than shifts.
    pub fn decompose(raw: u32, page_size: u32) -> Self {
        VirtualAddress {
            raw,
            page: (raw / page_size) as usize,
            offset: raw % page_size,
        }
    }
}

impl fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VA({}) = (p={}, w={})", self.raw, self.page, self.offset)
    }
}

/// Outcome of one simulated memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessResult {
    /// Translation succeeded; carries the physical address.
    Physical(u32),
    /// The referenced page lies outside the address space. Counted by the
    /// simulation, otherwise a no-op.
    IllegalReference,
}

impl AccessResult {
    /// Convert to the raw output form (sentinel for illegal references).
    pub fn to_output(self) -> u32 {
        match self {
            AccessResult::Physical(pa) => pa,
            AccessResult::IllegalReference => INVALID_ADDRESS,
        }
    }
}

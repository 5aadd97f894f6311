//! Reference-trace ingestion and result output.
//!
//! A trace is a whitespace-separated sequence of `op address` pairs, e.g.
//! `R 0 R 512 W 1024`. Ops are `R`/`W` (case-insensitive), addresses are
//! decimal. Results are written space-separated; illegal references appear
//! as the all-ones sentinel.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::address::Operation;

/// Read and parse a reference trace from a file.
pub fn read_trace<P: AsRef<Path>>(path: P) -> Result<Vec<(u32, Operation)>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read trace file {}", path.display()))?;
    parse_trace(&content)
}

/// Parse trace text into `(virtual address, operation)` pairs.
pub fn parse_trace(content: &str) -> Result<Vec<(u32, Operation)>> {
    let mut refs = Vec::new();
    let mut tokens = content.split_whitespace();

    while let Some(token) = tokens.next() {
        let op = Operation::from_token(token)
            .ok_or_else(|| anyhow!("invalid operation {:?}, expected R or W", token))?;
        let addr_token = tokens
            .next()
            .ok_or_else(|| anyhow!("operation {:?} is missing its address", token))?;
        let addr: u32 = addr_token
            .parse()
            .with_context(|| format!("invalid virtual address {:?}", addr_token))?;
        refs.push((addr, op));
    }

    Ok(refs)
}

/// Write per-reference physical addresses to a file, space-separated.
pub fn write_results<P: AsRef<Path>>(path: P, results: &[u32]) -> Result<()> {
    let path = path.as_ref();
    let output: Vec<String> = results.iter().map(|r| r.to_string()).collect();
    fs::write(path, output.join(" "))
        .with_context(|| format!("failed to write output file {}", path.display()))
}

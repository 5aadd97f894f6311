//! Paging simulator - Main Entry Point
//!
//! Usage: pagesim [OPTIONS] <trace_file> [output_file]
//!
//! Arguments:
//!   trace_file  - Reference trace: `op address` pairs (R/W, decimal)
//!   output_file - Optional file for per-reference physical addresses
//!
//! Options:
//!   -p, --pages N      Number of virtual pages (default 64)
//!   -f, --frames N     Number of physical frames (default 8)
//!   -s, --page-size N  Page size in words (default 512)
//!   -d, --detailed     Print the per-access and per-fault trace
//!   -h, --help         Print help information

use std::env;
use std::process;
use std::str::FromStr;

use anyhow::Result;
use log::debug;

use pagesim::{io, report, Config, System};

struct Args {
    trace_file: String,
    output_file: Option<String>,
    config: Config,
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn print_help(program: &str) {
    eprintln!("Paging simulator - FIFO-2nd-chance page replacement");
    eprintln!();
    eprintln!("Usage: {} [OPTIONS] <trace_file> [output_file]", program);
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  trace_file  - Reference trace: `op address` pairs (R/W, decimal)");
    eprintln!("  output_file - Optional file for per-reference physical addresses");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -p, --pages N      Number of virtual pages (default 64)");
    eprintln!("  -f, --frames N     Number of physical frames (default 8)");
    eprintln!("  -s, --page-size N  Page size in words (default 512)");
    eprintln!("  -d, --detailed     Print the per-access and per-fault trace");
    eprintln!("  -h, --help         Print this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} trace.txt", program);
    eprintln!("  {} -d -f 4 trace.txt results.txt", program);
}

fn option_value<T: FromStr>(argv: &[String], index: usize, flag: &str) -> Result<T, String> {
    let raw = argv
        .get(index)
        .ok_or_else(|| format!("Missing value for {}", flag))?;
    raw.parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, raw))
}

fn parse_args() -> Result<Args, String> {
    let argv: Vec<String> = env::args().collect();
    let program = &argv[0];

    let mut config = Config::default();
    let mut positional: Vec<String> = Vec::new();

    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "-h" | "--help" => {
                print_help(program);
                process::exit(0);
            }
            "-d" | "--detailed" => {
                config.detailed = true;
            }
            "-p" | "--pages" => {
                i += 1;
                config.num_pages = option_value(&argv, i, "--pages")?;
            }
            "-f" | "--frames" => {
                i += 1;
                config.num_frames = option_value(&argv, i, "--frames")?;
            }
            "-s" | "--page-size" => {
                i += 1;
                config.page_size = option_value(&argv, i, "--page-size")?;
            }
            arg if arg.starts_with('-') => {
                return Err(format!(
                    "Unknown option: {}\nUse --help for usage information.",
                    arg
                ));
            }
            arg => {
                positional.push(arg.to_string());
            }
        }
        i += 1;
    }

    if positional.is_empty() || positional.len() > 2 {
        print_help(program);
        return Err(format!(
            "\nError: Expected 1 or 2 arguments, got {}",
            positional.len()
        ));
    }

    if config.num_pages == 0 {
        return Err("--pages must be at least 1".to_string());
    }
    if config.num_frames == 0 {
        return Err("--frames must be at least 1".to_string());
    }
    if config.page_size == 0 {
        return Err("--page-size must be at least 1".to_string());
    }

    Ok(Args {
        trace_file: positional[0].clone(),
        output_file: positional.get(1).cloned(),
        config,
    })
}

fn run(args: &Args) -> Result<()> {
    let trace = io::read_trace(&args.trace_file)?;
    debug!("loaded {} references from {}", trace.len(), args.trace_file);

    let mut sys = System::new(args.config);

    let results: Vec<u32> = trace
        .iter()
        .map(|&(addr, op)| sys.translate(addr, op).to_output())
        .collect();

    if let Some(output_file) = &args.output_file {
        io::write_results(output_file, &results)?;
        debug!("results written to {}", output_file);
    }

    print!("{}", report::page_table(&sys));
    println!();
    print!("{}", report::frame_table(&sys));
    println!();
    print!("{}", report::replacement_state(&sys));
    println!();
    print!("{}", report::summary(&sys));

    Ok(())
}

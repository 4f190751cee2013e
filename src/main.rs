//! # finstr - Main Entry Point
//!
//! Wires the CLI to the pipeline: picks the symbol-table and source-resolver
//! services (in-process by default, external commands with `--nm` /
//! `--addr2line`), opens the trace, runs one pass, and prints the summary to
//! stderr.

use anyhow::{Context, Result};
use clap::Parser;
use finstr::cli::Args;
use finstr::pipeline::{Pipeline, Summary};
use finstr::symbolization::{
    Addr2LineCommand, AddressResolverService, DwarfResolver, ElfSymbolTable, NmCommand,
    SymbolTableCache, SymbolTableService,
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

// Exit codes (clap handles usage errors with its own exit 2)
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;

fn main() {
    // Diagnostics (unmatched ends, unresolvable symbols) are warnings; show
    // them by default so they are not silently lost without RUST_LOG set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            EXIT_ERROR
        }
    });
}

fn run() -> Result<()> {
    let args = Args::parse();

    let symbol_service: Box<dyn SymbolTableService> = match args.nm {
        Some(ref cmd) => Box::new(NmCommand::new(cmd.clone())),
        None => Box::new(ElfSymbolTable),
    };
    let resolver: Box<dyn AddressResolverService> = match args.addr2line {
        Some(ref cmd) => Box::new(Addr2LineCommand::new(cmd.clone())),
        None => Box::new(DwarfResolver::new()),
    };
    let cache = SymbolTableCache::new(symbol_service);

    let input = File::open(&args.trace)
        .with_context(|| format!("Failed to open trace file {}", args.trace.display()))?;
    let reader = BufReader::new(input);

    let summary = match args.output {
        Some(ref path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            run_pipeline(cache, resolver, BufWriter::new(file), reader)?
        }
        None => run_pipeline(cache, resolver, io::stdout().lock(), reader)?,
    };

    if !args.quiet {
        eprintln!("{summary}");
    }
    Ok(())
}

fn run_pipeline<W: Write>(
    cache: SymbolTableCache,
    resolver: Box<dyn AddressResolverService>,
    out: W,
    input: impl io::BufRead,
) -> Result<Summary> {
    Pipeline::new(cache, resolver, out)
        .run(input)
        .context("Trace processing failed")
}

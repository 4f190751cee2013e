//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "finstr",
    about = "Convert function-instrumentation begin/end traces into per-call timing tables",
    after_help = "\
EXAMPLES:
    finstr                                   Read finstr.txt, table on stdout
    finstr trace.log -o calls.csv            Explicit input and output paths
    finstr --nm nm --addr2line addr2line     External tools instead of the
                                             built-in ELF/DWARF readers"
)]
pub struct Args {
    /// Trace file to process
    #[arg(value_name = "TRACE", default_value = "finstr.txt")]
    pub trace: PathBuf,

    /// Write the table to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Read symbol tables with an external nm-compatible command
    #[arg(long, value_name = "CMD")]
    pub nm: Option<String>,

    /// Resolve source locations with an external addr2line-compatible command
    #[arg(long, value_name = "CMD")]
    pub addr2line: Option<String>,

    /// Suppress the end-of-run summary
    #[arg(short, long)]
    pub quiet: bool,
}

//! xport CLI: turn captured timeline responses into a growing JSON corpus.
//!
//! `xport <INPUT> <OUTPUT>` extracts posts from a raw timeline payload and
//! merges them into the corpus at OUTPUT, keeping earlier records.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Usage errors exit with 1; help and version keep clap's own handling.
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };
    commands::init_tracing(&cli);
    commands::run(cli)
}

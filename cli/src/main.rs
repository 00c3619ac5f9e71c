//! docdump CLI - print the paragraph text of a Word document
//!
//! Reads one .docx file and writes every non-blank paragraph to stdout,
//! trimmed and followed by a blank line.

use clap::Parser;
use colored::Colorize;
use std::io::{self, BufWriter};
use std::path::PathBuf;

/// Print the paragraph text of a Word document
#[derive(Parser)]
#[command(
    name = "docdump",
    author = "iyulab",
    version,
    about = "Print the paragraph text of a Word document",
    long_about = "docdump - print the paragraph text of a Word (.docx) document.\n\n\
                  Each non-blank paragraph is trimmed and printed in document order,\n\
                  followed by an empty line. Output is always UTF-8."
)]
struct Cli {
    /// Input .docx file
    #[arg(value_name = "FILE", default_value = docdump::DEFAULT_INPUT)]
    input: PathBuf,

    /// Log parsing details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Parse everything first so a broken file prints nothing
    let doc = docdump::parse_file(&cli.input)?;

    let stdout = io::stdout();
    let mut handle = BufWriter::new(stdout.lock());
    let blocks = docdump::render::write_text(&doc, &mut handle)?;

    log::debug!(
        "Printed {} of {} paragraphs from {}",
        blocks,
        doc.paragraph_count(),
        cli.input.display()
    );

    Ok(())
}

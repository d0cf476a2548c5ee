//! sphinxify: convert a Javadoc/Doxygen comment into a Sphinx docstring.
//!
//! Reads one comment block (optionally followed by the Java prototype it
//! documents) and prints it in the selected mode:
//!
//! - `default`: Python method stub with type hints and docstring
//! - `raw`: docstring body only
//! - `yaml`: body as a `doc: |` block scalar
//! - `cstring`: body as C string literals
//! - `comment`: body as `#:` comments

use anyhow::{Context, Result};
use clap::Parser;
use sphinxify::{convert, render, Options};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sphinxify",
    version,
    about = "Convert Javadoc comments to Sphinx docstrings"
)]
struct Cli {
    /// Output mode: default, raw, yaml, cstring, comment
    #[arg(default_value = "default")]
    mode: String,

    /// Read from a file instead of stdin
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Wrap column for docstring text (0 disables wrapping)
    #[arg(short = 'w', long, default_value_t = 79)]
    width: usize,

    /// Indentation of the docstring body in default mode
    #[arg(long, default_value_t = 8)]
    indent: usize,

    /// Do not report parameter/prototype mismatches
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sphinxify=warn".parse().unwrap()),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let renderer = render::create_renderer(&cli.mode)?;
    let input = read_input(cli.input.as_deref())?;

    let conv = convert(&input);
    if !cli.quiet {
        for diag in &conv.diagnostics {
            tracing::warn!("{}", diag);
        }
    }

    let opts = Options {
        width: cli.width,
        indent: cli.indent,
    };
    let output = renderer.render(&conv, &opts);
    if !output.is_empty() {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", output).context("failed to write stdout")?;
    }
    Ok(())
}

fn read_input(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

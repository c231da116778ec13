use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use kepify::{run, RunOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Collect enhancement proposals into a single JSON index
#[derive(Parser, Debug)]
#[command(name = "kepify", version, about)]
struct Cli {
    /// Root directory for the proposals
    #[arg(long, default_value = "keps", value_parser = NonEmptyStringValueParser::new())]
    dir: String,

    /// Output JSON file
    #[arg(long, default_value = "keps.json", value_parser = NonEmptyStringValueParser::new())]
    output: String,

    /// Extra file name to skip (repeatable)
    #[arg(long = "ignore", value_name = "NAME")]
    ignore: Vec<String>,

    /// Parse every document and report all errors without writing output
    #[arg(long)]
    check: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "kepify=debug" } else { "kepify=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = RunOptions {
        dir: PathBuf::from(&cli.dir),
        output: PathBuf::from(&cli.output),
        extra_ignores: cli.ignore,
        check_only: cli.check,
    };

    let summary = run(&options).with_context(|| format!("kepify failed for {}", cli.dir))?;

    match summary.output {
        Some(path) => println!(
            "Wrote {} proposals to {}",
            summary.documents,
            path.display()
        ),
        None => println!("Checked {} proposals", summary.documents),
    }

    Ok(())
}

use anyhow::Result;
use clap::Parser;
use faceprint_cli::{init_logging, parse_args, run_compare, Config};

#[derive(Parser)]
#[command(name = "compare", about = "Print the similarity (0..1) of two face encodings")]
struct Cli {
    /// First encoding, as printed by `extract`
    first: String,
    /// Second encoding, as printed by `extract`
    second: String,
    /// Append `match` or `no-match` to the score
    #[arg(long)]
    verdict: bool,
    /// Match threshold for --verdict [default: FACEPRINT_MATCH_THRESHOLD, else 0.6]
    #[arg(long, requires = "verdict")]
    threshold: Option<f64>,
}

fn main() -> Result<()> {
    init_logging();

    let cli: Cli = parse_args();
    let cfg = Config::from_env();

    let line = run_compare(&cfg, &cli.first, &cli.second, cli.verdict, cli.threshold)?;
    println!("{line}");

    Ok(())
}

use anyhow::Result;
use clap::Parser;
use faceprint_cli::{init_logging, parse_args, run_extract, Config};
use faceprint_core::FaceSelection;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "extract", about = "Print the face encoding of an image or a PDF's first page")]
struct Cli {
    /// Image or PDF to encode
    path: PathBuf,
    /// Face to encode when several are detected: first, largest or centered
    /// [default: FACEPRINT_FACE_SELECTION, else first]
    #[arg(long)]
    select: Option<FaceSelection>,
}

fn main() -> Result<()> {
    init_logging();

    let cli: Cli = parse_args();
    let cfg = Config::from_env();

    let encoding = run_extract(&cfg, &cli.path, cli.select)?;
    println!("{encoding}");

    Ok(())
}

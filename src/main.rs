//! binpipe CLI — build a pipeline from a settings file and write its output.
//!
//! ```bash
//! binpipe -t settings.json -o template.json
//! RUST_LOG=binpipe=debug binpipe -t settings.json
//! ```
//!
//! Exits non-zero on any configuration, build, or stage failure.

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use binpipe::{PipelineBuilder, PipelineConfig, StageRegistry};

#[derive(Parser, Debug)]
#[command(name = "binpipe", version, about = "Build and run a binned-template stage pipeline")]
struct Args {
    /// Settings file describing the stage chain
    #[arg(short = 't', long, value_name = "FILE")]
    template_settings: PathBuf,

    /// File to store the output
    #[arg(short, long, value_name = "FILE", default_value = "out.json")]
    outfile: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "binpipe=info".into()),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = PipelineConfig::from_file(&args.template_settings)?;
    info!(
        settings = %args.template_settings.display(),
        stages = config.len(),
        "loaded settings"
    );

    let registry = StageRegistry::with_defaults();
    let pipeline = PipelineBuilder::new(&registry).build(&config)?;
    info!(stages = pipeline.len(), "pipeline built");

    let result = pipeline.run()?;
    info!(maps = result.len(), "pipeline executed");

    let file = File::create(&args.outfile)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &result)?;
    info!(outfile = %args.outfile.display(), "output written");
    Ok(())
}

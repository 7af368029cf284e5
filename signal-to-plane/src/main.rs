use clap::Parser;
use complex_plane_common::{TracerOptions, init_tracer};
use miette::IntoDiagnostic;
use signal_to_plane::{
    parameters::{AnalysisParameters, Mode},
    processing,
};
use std::io::Write;
use tracing::info;

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version = complex_plane_common::version!(), about)]
struct Cli {
    /// Log filter, in the format of `RUST_LOG`. If not set, `RUST_LOG` is used
    #[clap(long)]
    log_filter: Option<String>,

    /// If set, the output is pretty-printed
    #[clap(long)]
    pretty: bool,

    #[command(subcommand)]
    mode: Mode,
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();

    init_tracer(TracerOptions::new(args.log_filter.as_deref())).into_diagnostic()?;

    let parameters = match args.mode {
        Mode::FromArgs(parameters) => parameters,
        Mode::FromJson(file) => AnalysisParameters::from_json_file(&file.path).into_diagnostic()?,
    };

    // Failures are logged by the span of `run`.
    let analysis = processing::run(&parameters).into_diagnostic()?;
    info!(
        "Projected {} windows, starting at window {}",
        analysis.coordinates.len(),
        analysis.first_scored_window
    );

    let mut stdout = std::io::stdout().lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut stdout, &analysis).into_diagnostic()?;
    } else {
        serde_json::to_writer(&mut stdout, &analysis).into_diagnostic()?;
    }
    writeln!(stdout).into_diagnostic()?;
    Ok(())
}

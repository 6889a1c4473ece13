//! topictree-db - Offline Library Database Builder
//!
//! Entry point for the CLI application.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use topictree_db::config::{BuildConfig, CliArgs};
use topictree_db::progress::{print_header, print_summary, ProgressReporter};
use topictree_db::{BuildError, Builder};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Validate and create config
    let config = BuildConfig::from_args(args).map_err(BuildError::from)?;

    // Setup logging
    setup_logging(config.verbose)?;

    let output = config.output_path.display().to_string();
    if config.show_progress {
        print_header(&config.input_path.display().to_string(), &output);
    }

    let progress = config.show_progress.then(ProgressReporter::new);
    let builder = Builder::new(config);

    let result = match builder.run(progress.as_ref()) {
        Ok(result) => result,
        Err(e) => {
            if let Some(ref p) = progress {
                p.finish("Build failed");
            }
            return Err(anyhow::Error::new(e).context("Build failed"));
        }
    };

    if let Some(ref p) = progress {
        p.finish_and_clear();
        print_summary(&result, &output);
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("topictree_db=debug,warn")
    } else {
        EnvFilter::new("topictree_db=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

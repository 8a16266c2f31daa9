mod cli;
mod error;
mod log;
mod progress_bar;

use std::process::ExitCode;

use civit_fetch::{
    FetchOutcome, ModelFetcher, ModelRequest, ModelType, NoProgress, ProgressSink,
};
use clap::Parser;

pub use cli::{Cli, ProgressMode};
pub use error::Error;
pub use progress_bar::{JsonProgress, TerminalProgress};

pub fn run() -> ExitCode {
    // Load CIVIT_KEY and friends from a .env file, if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    log::init(cli.verbose);

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::debug!("Run failed: {:?}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Fetch every requested model in order, stopping at the first failure.
pub fn execute(cli: &Cli) -> Result<(), Error> {
    if cli.list_types {
        for model_type in ModelType::all() {
            println!(
                "{:<15} {}",
                model_type,
                model_type.directory(&cli.models_dir).display()
            );
        }
        return Ok(());
    }

    let requests = cli.requests()?;
    let config = cli.fetch_config();
    ::log::debug!("Using {:?}", config);
    let fetcher = ModelFetcher::new(config)?;

    let sink: Box<dyn ProgressSink> = match cli.progress {
        ProgressMode::Bar => Box::new(TerminalProgress::new()),
        ProgressMode::Json => Box::new(JsonProgress),
        ProgressMode::Quiet => Box::new(NoProgress),
    };
    let announce = cli.progress != ProgressMode::Json;

    for request in &requests {
        let outcome = fetcher.fetch(request, sink.as_ref())?;
        if announce {
            println!("{}", confirmation(request, &outcome));
        }
    }

    Ok(())
}

/// The line printed once a request has been handled.
pub fn confirmation(request: &ModelRequest, outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::AlreadyPresent { path } => format!(
            "File '{}' already exists in '{}'. Skipping download.",
            request.model_name(),
            path.parent().unwrap_or(path).display()
        ),
        FetchOutcome::Downloaded { path, .. } => {
            format!("File downloaded and saved to {}", path.display())
        }
    }
}

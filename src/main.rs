use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use house_price_predictor::config::{load_settings, Settings};
use house_price_predictor::form::read_form_file;
use house_price_predictor::results::{load_result, render};
use house_price_predictor::{
    FileStore, FormData, FormSubmissionController, HttpPredictionApi, LocationBar, SessionStore,
    RESULTS_PAGE,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Submit house features to the price prediction API")]
struct Args {
    /// Origin serving the prediction API
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Where session storage is kept between runs
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill in the form and submit it
    Submit {
        /// Urlencoded form body, or one name=value per line
        #[arg(long)]
        form: Option<PathBuf>,
        /// Single field as name=value; may be repeated
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Show the stored prediction result
    #[command(name = "result")]
    Show,
    /// Check that the prediction API is up
    Health,
    /// Forget the stored session
    Clear,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    let store = FileStore::new(&settings.session_file);

    match args.command {
        Command::Submit { form, fields } => {
            let file_form = match &form {
                Some(path) => read_form_file(path).await?,
                None => FormData::new(),
            };
            let data = file_form.overridden_by(FormData::from_assignments(&fields)?);
            if data.is_empty() {
                warn!("No form fields given; pass --form or --field name=value");
            }

            let api = HttpPredictionApi::with_options(settings.client_options())?;
            let controller = FormSubmissionController::new(api, store, LocationBar::new());

            info!("🏠 Submitting house features to {}", settings.api_base_url);
            if controller.handle_submit(&data).await.is_err() {
                eprintln!("{}", controller.error_text().await);
                return Ok(ExitCode::FAILURE);
            }

            if controller.navigator().current().await.as_deref() == Some(RESULTS_PAGE) {
                show_results(controller.store()).await?;
            }
        }
        Command::Show => {
            if !show_results(&store).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Health => {
            let api = HttpPredictionApi::with_options(settings.client_options())?;
            let status = api.health().await?;
            println!("status: {}", status.status);
            println!("model loaded: {}", status.model_loaded);
        }
        Command::Clear => {
            store.clear().await?;
            info!("🧹 Cleared session at {}", store.path().display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = load_settings(&std::env::current_dir()?)?;
    if let Some(url) = &args.api_url {
        settings.api_base_url = url.clone();
    }
    if let Some(path) = &args.session_file {
        settings.session_file = path.clone();
    }
    Ok(settings)
}

/// Render the results page; false when nothing is stored
async fn show_results(store: &FileStore) -> Result<bool> {
    match load_result(store).await? {
        Some(result) => {
            println!();
            print!("{}", render(&result));
            println!();
            Ok(true)
        }
        None => {
            eprintln!("No prediction result stored in {}", store.path().display());
            Ok(false)
        }
    }
}

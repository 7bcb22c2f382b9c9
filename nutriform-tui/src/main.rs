//! Terminal front-end for the nutrient recommendation form.

mod app;
mod runner;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use nutriform::{ClientConfig, FlowState, HttpBackend, Report, ReportController, Session};
use nutriform_html::markup_to_text;

use crate::app::App;
use crate::runner::Runner;

#[derive(Debug, Parser)]
#[command(name = "nutriform", version, about = "Personalised nutrient recommendations")]
struct Cli {
    /// Config file (defaults to $NUTRIFORM_CONFIG, then the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recommendation server URL, overriding the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Where to write logs while the terminal UI is running
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare two foods and print the result
    Compare { food_a: String, food_b: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::load(cli.config.as_deref()).context("loading configuration")?;
    config.override_base_url(cli.base_url);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let backend = HttpBackend::new(config.base_url.clone()).context("creating HTTP client")?;

    match cli.command {
        Some(Command::Compare { food_a, food_b }) => {
            nutriform::init_tracing();
            runtime.block_on(compare(&backend, &food_a, &food_b))
        }
        None => {
            let log_file = cli
                .log_file
                .unwrap_or_else(|| std::env::temp_dir().join("nutriform.log"));
            nutriform::init_tracing_to_file(&log_file)
                .with_context(|| format!("opening log file {}", log_file.display()))?;

            let store = config.preference_store();
            let session =
                Session::from_config(&config, store.as_ref()).context("building the session")?;

            Runner::new(runtime, backend, store, config.report_path())
                .run(App::new(session))
                .context("running terminal UI")
        }
    }
}

async fn compare(backend: &HttpBackend, food_a: &str, food_b: &str) -> anyhow::Result<()> {
    let mut reports = ReportController::new();
    reports.compare(food_a, food_b, backend).await?;

    match reports.comparison() {
        FlowState::Success(Report::Markup(markup)) => {
            for line in markup_to_text(markup) {
                println!("{line}");
            }
            Ok(())
        }
        FlowState::Error { message } => bail!("{message}"),
        other => bail!("unexpected comparison state: {other:?}"),
    }
}

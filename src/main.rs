use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cardiorisk::{
    chart::SvgChartSink,
    commands::{
        display_results, render_chart, report_link, validate_form, DisplayResponse,
        DisplayResultsPayload, FormPayload,
    },
    config::AppConfig,
    models::ServiceResponse,
    state::DisplayState,
};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cardiorisk",
    version,
    about = "Consensus and chart for Framingham, SCORE2 and ACC/AHA results"
)]
struct Cli {
    #[arg(long, global = true, help = "JSON configuration file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the consensus interpretation for a calculation-service response.
    Interpret { response: PathBuf },
    /// Render the three-scale bar chart as SVG.
    Chart {
        response: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the report download link for the response's session.
    Report { response: PathBuf },
    /// Check age and total cholesterol against the accepted ranges.
    Validate {
        #[arg(long)]
        age: f64,
        #[arg(long)]
        cholesterol: f64,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_response(path: &Path) -> Result<DisplayResultsPayload> {
    let data = fs::read(path).with_context(|| format!("failed to read response file {:?}", path))?;
    let response: ServiceResponse = serde_json::from_slice(&data)
        .with_context(|| format!("failed to parse response file {:?}", path))?;
    Ok(DisplayResultsPayload { response })
}

fn show(state: &DisplayState, path: &Path) -> Result<DisplayResponse> {
    let payload = load_response(path)?;
    display_results(state, payload).map_err(anyhow::Error::msg)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    debug!(locale = %config.locale, api = %config.api_base_url, "configuration loaded");
    let state = DisplayState::new(config);

    match cli.command {
        Commands::Interpret { response } => {
            let shown = show(&state, &response)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                println!("{}", shown.interpretation.primary);
                println!("{}", shown.interpretation.secondary);
                for warning in &shown.warnings {
                    eprintln!("warning: {}", warning);
                }
            }
        }
        Commands::Chart { response, out } => {
            show(&state, &response)?;
            let mut sink = SvgChartSink::new(state.config().chart_width, state.config().chart_height);
            render_chart(&state, &mut sink).map_err(anyhow::Error::msg)?;
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create chart dir {:?}", parent))?;
            }
            fs::write(&out, sink.document())
                .with_context(|| format!("failed to write chart file {:?}", out))?;
            if cli.json {
                println!("{}", serde_json::json!({ "ok": true, "path": out }));
            } else {
                println!("chart written to {}", out.display());
            }
        }
        Commands::Report { response } => {
            show(&state, &response)?;
            let link = report_link(&state).map_err(anyhow::Error::msg)?;
            if cli.json {
                println!("{}", serde_json::json!({ "ok": true, "url": link }));
            } else {
                println!("{}", link);
            }
        }
        Commands::Validate { age, cholesterol } => {
            validate_form(&FormPayload {
                age,
                total_cholesterol: cholesterol,
            })
            .map_err(anyhow::Error::msg)?;
            if cli.json {
                println!("{}", serde_json::json!({ "ok": true }));
            } else {
                println!("form valid");
            }
        }
    }
    Ok(())
}

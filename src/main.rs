use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use carousel_scraper::{ExtractionResult, Scraper, ScraperConfig, TrailingSlash};
use clap::Parser;
use tracing::error;

#[derive(Parser)]
#[command(
    name = "carousel-scraper",
    about = "Extract every image URL from a carousel post",
    version
)]
struct Cli {
    /// Post URL (e.g. "https://www.instagram.com/p/C8X9Y2Z1ABC/")
    url: String,

    /// Timeout for each fetch attempt, in seconds
    #[arg(long, env = "CAROUSEL_TIMEOUT_SECS", default_value = "30")]
    timeout: u64,

    /// Extra wait after the rendered page has loaded, in milliseconds
    #[arg(long, env = "CAROUSEL_SETTLE_MS", default_value = "3000")]
    settle: u64,

    /// Skip the headless browser and only do a static fetch
    #[arg(long, env = "CAROUSEL_NO_RENDER")]
    no_render: bool,

    /// Path to the Chromium binary (auto-detected if unset)
    #[arg(long, env = "CAROUSEL_CHROMIUM_PATH")]
    chromium: Option<PathBuf>,

    /// Trailing slash handling for the post URL
    #[arg(long, value_enum, default_value = "strip")]
    trailing_slash: TrailingSlash,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> ScraperConfig {
        ScraperConfig {
            timeout: Duration::from_secs(self.timeout),
            settle_delay: Duration::from_millis(self.settle),
            trailing_slash: self.trailing_slash,
            render: !self.no_render,
            chromium_path: self.chromium.clone(),
            ..ScraperConfig::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the JSON result
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("carousel_scraper={level}")));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let result = match Scraper::from_config(cli.config()) {
        Ok(scraper) => scraper.scrape(&cli.url),
        Err(e) => ExtractionResult::failure(format!("Failed to scrape carousel: {e}")),
    };

    match serde_json::to_string_pretty(&result) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "failed to serialize result");
            ExitCode::FAILURE
        }
    }
}

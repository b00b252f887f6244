use std::net::SocketAddr;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use freesm_downloads::config::Settings;
use freesm_downloads::locale::{DEFAULT_LOCALE, Locale};
use freesm_downloads::platform::PlatformSelection;
use freesm_downloads::query::QueryState;
use freesm_downloads::server::{AppState, build_router};
use freesm_downloads::view::{ViewContext, html, text};
use log::info;

/// freesm-downloads - Freesm Launcher download page
///
/// Shows the assets of the latest Freesm Launcher release, grouped by
/// platform, either as a web page or on the terminal.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
/// This is useful for avoiding rate limits.
///
/// Examples:
///   freesm-downloads serve                      # Serve the page on 0.0.0.0:8080
///   freesm-downloads render --platform linux    # Print the Linux downloads
#[derive(Parser, Debug)]
#[command(author, version = env!("FREESM_DOWNLOADS_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    settings: Settings,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the download page over HTTP
    Serve(ServeArgs),

    /// Fetch the latest release once and print the downloads for a platform
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Platform to list: linux, macos or windows
    #[arg(long, short = 'p', value_name = "PLATFORM")]
    pub platform: String,

    /// Language of the labels: en, ru, ua or es
    #[arg(long, short = 'l', default_value_t = DEFAULT_LOCALE)]
    pub locale: Locale,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(&cli.settings, args).await,
        Commands::Render(args) => render(&cli.settings, args).await,
    }
}

async fn serve(settings: &Settings, args: ServeArgs) -> Result<()> {
    let service = settings.build_service()?;
    // Warm the cache so the first visitor does not wait on GitHub.
    service.prefetch_release();

    let app = build_router(AppState::new(service));
    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("Failed to bind {}", args.addr))?;

    info!("Serving {} downloads on http://{}", settings.repo, args.addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

async fn render(settings: &Settings, args: RenderArgs) -> Result<()> {
    let service = settings.build_service()?;
    let selection = PlatformSelection::parse(&args.platform);

    let state = service.settled_release_state().await;
    let view = service.view(selection, &state, args.locale);

    let output = match args.format {
        OutputFormat::Text => text::render(&view),
        OutputFormat::Html => {
            let ctx = ViewContext::new(args.locale, service.dictionary(args.locale));
            html::render_page(&view, selection, &ctx)
        }
    };
    print!("{}", output);

    // The fetch state is not shown while the platform is unknown.
    if let (Some(_), QueryState::Failed(error)) = (selection.platform(), state) {
        bail!("Failed to fetch the latest release of {}: {}", settings.repo, error);
    }
    Ok(())
}

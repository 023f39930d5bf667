//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use pagesmith_core::{BuildConfig, BuildResult, ProgressReporter};
use pagesmith_shared::{
    AppConfig, BackendConfig, FetchConfig, backend_config, init_config, load_config,
};
use pagesmith_sources::ContentRepository;
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// pagesmith — render headless-CMS content as a static site.
#[derive(Parser)]
#[command(
    name = "pagesmith",
    version,
    about = "Fetch content from a Strapi or Directus backend and render static HTML.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Output format for the `pages` listing.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch all collections and write the static site.
    Build {
        /// Backend kind override: strapi or directus.
        #[arg(long)]
        backend: Option<String>,

        /// Backend API root override.
        #[arg(long)]
        base_url: Option<String>,

        /// Site output directory (defaults to the configured output_dir).
        #[arg(short, long)]
        out: Option<String>,

        /// Request unpublished drafts via the preview pass-through.
        #[arg(long)]
        preview: bool,

        /// Render the empty state instead of failing when the fetch errors.
        #[arg(long)]
        allow_empty: bool,
    },

    /// Fetch and print the normalized page list.
    Pages {
        /// Backend kind override: strapi or directus.
        #[arg(long)]
        backend: Option<String>,

        /// Backend API root override.
        #[arg(long)]
        base_url: Option<String>,

        /// Request unpublished drafts via the preview pass-through.
        #[arg(long)]
        preview: bool,

        /// Listing format.
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pagesmith=info",
        1 => "pagesmith=debug",
        _ => "pagesmith=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            backend,
            base_url,
            out,
            preview,
            allow_empty,
        } => {
            cmd_build(
                backend.as_deref(),
                base_url.as_deref(),
                out.as_deref(),
                preview,
                allow_empty,
            )
            .await
        }
        Command::Pages {
            backend,
            base_url,
            preview,
            format,
        } => cmd_pages(backend.as_deref(), base_url.as_deref(), preview, &format).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Merge CLI overrides into the configured backend.
fn resolve_backend(
    config: &AppConfig,
    kind: Option<&str>,
    base_url: Option<&str>,
    preview: bool,
) -> Result<BackendConfig> {
    let mut backend = backend_config(config)?;

    if let Some(kind) = kind {
        backend.kind = kind.to_string();
    }
    if let Some(raw) = base_url {
        backend.base_url = Url::parse(raw).map_err(|e| eyre!("invalid base URL '{raw}': {e}"))?;
    }
    backend.preview = preview || backend.preview;

    Ok(backend)
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

async fn cmd_build(
    kind: Option<&str>,
    base_url: Option<&str>,
    out: Option<&str>,
    preview: bool,
    allow_empty: bool,
) -> Result<()> {
    let config = load_config()?;
    let backend = resolve_backend(&config, kind, base_url, preview)?;

    let output_dir = match out {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(&config.defaults.output_dir),
    };

    let build_config = BuildConfig {
        backend,
        output_dir,
        fetch: FetchConfig::from(&config),
        allow_empty,
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    info!(
        kind = %build_config.backend.kind,
        base_url = %build_config.backend.base_url,
        out = %build_config.output_dir.display(),
        "building site"
    );

    let reporter = CliProgress::new();
    let result = pagesmith_core::build_site(&build_config, &reporter).await?;

    println!();
    println!("  Site built successfully!");
    println!("  Backend: {}", build_config.backend.kind);
    println!("  Pages:   {}", result.page_count);
    println!("  Posts:   {}", result.post_count);
    println!("  Team:    {}", result.member_count);
    println!("  Path:    {}", result.output_dir.display());
    println!("  Time:    {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn record_rendered(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Rendering [{current}/{total}] {path}"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// pages
// ---------------------------------------------------------------------------

async fn cmd_pages(
    kind: Option<&str>,
    base_url: Option<&str>,
    preview: bool,
    format: &OutputFormat,
) -> Result<()> {
    let config = load_config()?;
    let backend = resolve_backend(&config, kind, base_url, preview)?;

    info!(kind = %backend.kind, base_url = %backend.base_url, "listing pages");

    let repository = ContentRepository::new(&FetchConfig::from(&config))?;
    let pages = repository.list_pages(&backend).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&pages)?);
        }
        OutputFormat::Text => {
            if pages.is_empty() {
                println!("No pages found.");
                return Ok(());
            }
            for page in &pages {
                let image = match &page.image_url {
                    Some(url) => format!("  [image: {url}]"),
                    None => String::new(),
                };
                println!("{}  {}{image}", page.id, page.title);
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

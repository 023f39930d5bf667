//! pagesmith CLI — headless-CMS content fetcher and static site renderer.
//!
//! Normalizes Strapi- or Directus-shaped content into one model and renders
//! it as sanitized static HTML.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}

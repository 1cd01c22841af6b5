//! worten-crawler - Worten.pt price tracker CLI
//!
//! Imports a product spreadsheet, scrapes Worten.pt for current prices and
//! availability, and exports the results.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use worten_crawler::commands::{ExportCommand, ImportCommand, ScrapeCommand, SearchCommand};
use worten_crawler::config::{Config, OutputFormat};
use worten_crawler::format::Formatter;
use worten_crawler::store::ProductStore;

#[derive(Parser)]
#[command(
    name = "worten-crawler",
    version,
    about = "Worten.pt price tracker",
    long_about = "Tracks product prices on Worten.pt: imports a spreadsheet of products, \
scrapes current prices with TLS fingerprint emulation, and exports the results."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "WORTEN_PROXY")]
    proxy: Option<String>,

    /// Delay between requests in milliseconds
    #[arg(long, global = true, env = "WORTEN_DELAY")]
    delay: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import products from the input spreadsheet
    #[command(alias = "i")]
    Import {
        /// Input spreadsheet path (columns: ID, EAN, Name)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Scrape Worten.pt for stored products
    #[command(alias = "s")]
    Scrape {
        /// Product IDs to scrape (all when omitted)
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Maximum number of products to scrape (0 = all)
        #[arg(long, default_value = "0")]
        limit: usize,

        /// Delay between products in milliseconds
        #[arg(long)]
        product_delay: Option<u64>,
    },

    /// Export stored products to the output spreadsheet
    #[command(alias = "e")]
    Export {
        /// Output spreadsheet path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run a one-off search without touching the store
    Search {
        /// Product name to search for
        query: String,
    },

    /// List stored products
    #[command(alias = "ls")]
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // File and environment layers first, CLI flags on top.
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Import { input } => {
            if let Some(input) = input {
                config.input_path = input;
            }

            let summary = ImportCommand::new(config).execute()?;
            println!(
                "Imported {} new products, updated {} existing.",
                summary.imported, summary.updated
            );
        }

        Commands::Scrape { ids, limit, product_delay } => {
            config.limit = limit;
            if let Some(delay) = product_delay {
                config.scrape_delay_ms = delay;
            }

            let summary = ScrapeCommand::new(config).execute(&ids).await?;
            println!(
                "Scraped {} products: {} found, {} not found, {} errors.",
                summary.scraped, summary.found, summary.not_found, summary.errors
            );
        }

        Commands::Export { output } => {
            if let Some(output) = output {
                config.output_path = output;
            }

            let path = ExportCommand::new(config).execute()?;
            println!("Exported to {}", path.display());
        }

        Commands::Search { query } => {
            let cmd = SearchCommand::new(config);
            let output = cmd.execute(&query).await?;
            println!("{}", output);
        }

        Commands::List => {
            let store = ProductStore::load(&config.store_path)?;
            let formatter = Formatter::new(config.format);
            println!("{}", formatter.format_records(&store.all()));
        }
    }

    Ok(())
}

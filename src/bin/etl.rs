//! Batch side of the catalogue: scrape the site to CSV and load the CSV into PostgreSQL.
//!
//! `run` chains both steps and is what the daily schedule invokes.

use bookscraper::{
    crawler::{self, Crawler, CrawlerConfig},
    db::create_pool,
    error::{AppError, AppResult},
    ingest,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "bookscraper-etl", version, about = "Scrape the book catalogue and load it into the database")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, global = true, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl the catalogue and write the books CSV
    Scrape(ScrapeArgs),
    /// Replace the books table with the contents of a CSV file
    Ingest(IngestArgs),
    /// Scrape, then ingest the freshly written CSV
    Run {
        #[command(flatten)]
        scrape: ScrapeArgs,

        /// PostgreSQL connection string
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    /// Catalogue root URL
    #[arg(long, default_value = crawler::DEFAULT_BASE_URL, env = "SCRAPER_BASE_URL")]
    base_url: String,

    /// Output CSV path
    #[arg(short, long, default_value = "data/books.csv")]
    output: PathBuf,

    /// Pause between page requests, in milliseconds
    #[arg(long, default_value = "1000")]
    delay_ms: u64,

    /// Stop after this many pages
    #[arg(long)]
    max_pages: Option<u32>,
}

#[derive(Args, Debug)]
struct IngestArgs {
    /// CSV file produced by `scrape`
    #[arg(short, long, default_value = "data/books.csv")]
    input: PathBuf,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = cli
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Err(e) = run(cli.command).await {
        tracing::error!(error = %e, "ETL job failed");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> AppResult<()> {
    match command {
        Command::Scrape(args) => {
            scrape(&args).await?;
        }
        Command::Ingest(args) => {
            load(args.input, args.database_url).await?;
        }
        Command::Run {
            scrape: args,
            database_url,
        } => {
            scrape(&args).await?;
            load(args.output, database_url).await?;
        }
    }
    Ok(())
}

async fn scrape(args: &ScrapeArgs) -> AppResult<usize> {
    let mut config = CrawlerConfig::new(&args.base_url)?;
    config.delay = Duration::from_millis(args.delay_ms);
    config.max_pages = args.max_pages;

    let books = Crawler::new(config)?.crawl().await?;
    crawler::write_csv_file(&args.output, &books)?;
    Ok(books.len())
}

async fn load(input: PathBuf, database_url: String) -> AppResult<usize> {
    tokio::task::spawn_blocking(move || {
        let books = ingest::load_books_csv(&input)?;
        let pool = create_pool(&database_url, 1)?;
        let mut conn = pool.get()?;
        ingest::ingest(&mut conn, &books)
    })
    .await
    .map_err(|e| AppError::internal(format!("Ingest task failed: {}", e)))?
}

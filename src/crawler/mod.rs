//! Catalogue crawler: walks the paginated listing and writes the books CSV.
//!
//! Pages are fetched sequentially from `catalogue/page-1.html` until the site answers
//! with a non-200 status, a page has no products, or the optional page cap is reached.
//! There is no retry; a transport error aborts the crawl.

pub mod page;

pub use page::{CatalogueSelectors, parse_catalogue_page, parse_price, parse_rating};

use reqwest::StatusCode;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::db::models::book::NewBook;
use crate::error::AppResult;

pub const DEFAULT_BASE_URL: &str = "http://books.toscrape.com/";
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Column order of the books CSV.
pub const CSV_HEADER: [&str; 6] = [
    "title",
    "price",
    "rating",
    "availability",
    "category",
    "image_url",
];

#[derive(Clone, Debug)]
pub struct CrawlerConfig {
    pub base_url: Url,
    pub delay: Duration,
    pub max_pages: Option<u32>,
}

impl CrawlerConfig {
    pub fn new(base_url: &str) -> AppResult<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            delay: DEFAULT_DELAY,
            max_pages: None,
        })
    }
}

pub struct Crawler {
    client: reqwest::Client,
    config: CrawlerConfig,
    selectors: CatalogueSelectors,
}

impl Crawler {
    pub fn new(config: CrawlerConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bookscraper/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            config,
            selectors: CatalogueSelectors::new()?,
        })
    }

    pub fn page_url(&self, page: u32) -> AppResult<Url> {
        Ok(self
            .config
            .base_url
            .join(&format!("catalogue/page-{}.html", page))?)
    }

    /// Body of a listing page, or `None` when the server does not answer 200.
    async fn fetch_page(&self, page: u32) -> AppResult<Option<String>> {
        let url = self.page_url(page)?;
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            info!(page, status = %response.status(), "Page not found, stopping crawl");
            return Ok(None);
        }
        Ok(Some(response.text().await?))
    }

    pub async fn crawl(&self) -> AppResult<Vec<NewBook>> {
        let mut books = Vec::new();
        let mut page = 1;

        loop {
            if let Some(max) = self.config.max_pages {
                if page > max {
                    info!(max_pages = max, "Page limit reached");
                    break;
                }
            }

            let Some(html) = self.fetch_page(page).await? else {
                break;
            };

            let found = parse_catalogue_page(&html, &self.selectors, &self.config.base_url);
            if found.is_empty() {
                info!(page, "No books on page, stopping crawl");
                break;
            }

            debug!(page, count = found.len(), "Scraped page");
            books.extend(found);
            page += 1;

            tokio::time::sleep(self.config.delay).await;
        }

        info!(pages = page - 1, books = books.len(), "Crawl finished");
        Ok(books)
    }
}

/// Writes the header row followed by one row per book. The header is written even when
/// `books` is empty.
pub fn write_csv<W: Write>(writer: W, books: &[NewBook]) -> AppResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    for book in books {
        csv_writer.serialize(book)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, books: &[NewBook]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    write_csv(File::create(path)?, books)?;
    info!(path = %path.display(), books = books.len(), "Books CSV written");
    Ok(())
}

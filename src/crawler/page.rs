//! Parsing of a single catalogue listing page.
//!
//! Each `article.product_pod` becomes one [`NewBook`]. Fields that cannot be read are
//! filled with neutral values (empty text, price 0, rating 0) rather than dropping the row.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::db::models::book::NewBook;
use crate::error::{AppError, AppResult};

/// Every scraped book is filed under this category.
pub const DEFAULT_CATEGORY: &str = "Books";

pub struct CatalogueSelectors {
    article: Selector,
    title: Selector,
    price: Selector,
    rating: Selector,
    availability: Selector,
    image: Selector,
}

impl CatalogueSelectors {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            article: selector("article.product_pod")?,
            title: selector("h3 a")?,
            price: selector(".price_color")?,
            rating: selector("p.star-rating")?,
            availability: selector(".availability")?,
            image: selector("img")?,
        })
    }
}

fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css).map_err(|e| AppError::internal(format!("Invalid selector '{}': {}", css, e)))
}

/// Parses every product on a listing page. An empty result means the catalogue ended.
pub fn parse_catalogue_page(
    html: &str,
    selectors: &CatalogueSelectors,
    base_url: &Url,
) -> Vec<NewBook> {
    let document = Html::parse_document(html);
    document
        .select(&selectors.article)
        .map(|article| parse_article(article, selectors, base_url))
        .collect()
}

fn parse_article(article: ElementRef<'_>, selectors: &CatalogueSelectors, base_url: &Url) -> NewBook {
    let title = article
        .select(&selectors.title)
        .next()
        .and_then(|a| a.value().attr("title"))
        .unwrap_or_default()
        .to_string();

    let price = article
        .select(&selectors.price)
        .next()
        .map(|el| parse_price(&text_of(el)))
        .unwrap_or_default();

    let rating = article
        .select(&selectors.rating)
        .next()
        .and_then(|el| el.value().classes().find(|c| *c != "star-rating"))
        .map(parse_rating)
        .unwrap_or_default();

    let availability = article
        .select(&selectors.availability)
        .next()
        .map(text_of)
        .unwrap_or_default();

    let image_url = article
        .select(&selectors.image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| resolve_image_url(base_url, src))
        .unwrap_or_default();

    NewBook {
        title,
        price,
        rating,
        availability,
        category: DEFAULT_CATEGORY.to_string(),
        image_url,
    }
}

/// Element text with runs of whitespace collapsed to single spaces.
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"£51.77"` → `51.77`. Anything unparseable is 0.
pub fn parse_price(text: &str) -> f64 {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(0.0)
}

/// Star-rating class word to a number: One..Five → 1..5, anything else → 0.
pub fn parse_rating(word: &str) -> i32 {
    match word {
        "One" => 1,
        "Two" => 2,
        "Three" => 3,
        "Four" => 4,
        "Five" => 5,
        _ => 0,
    }
}

fn resolve_image_url(base_url: &Url, src: &str) -> String {
    let relative = src.replace("../", "");
    base_url
        .join(&relative)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("{}{}", base_url, relative))
}

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

// Book models
#[derive(Queryable, Selectable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub price: f64,
    pub rating: i32,
    pub availability: String,
    pub category: String,
    pub image_url: String,
}

/// One scraped catalogue entry. Also the row shape of the books CSV file.
#[derive(Insertable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::books)]
pub struct NewBook {
    pub title: String,
    pub price: f64,
    pub rating: i32,
    pub availability: String,
    pub category: String,
    pub image_url: String,
}

// Query parameters
#[derive(Deserialize, Debug, Default)]
pub struct BookSearchQuery {
    pub title: Option<String>,
    pub category: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TopRatedQuery {
    pub limit: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct PriceRangeQuery {
    pub min: f64,
    pub max: f64,
}

// Statistics DTOs
#[derive(Serialize, Debug, PartialEq)]
pub struct CollectionOverview {
    pub total_books: i64,
    pub average_price: Option<f64>,
    pub rating_distribution: BTreeMap<i32, i64>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct CategoryStats {
    pub category: String,
    pub total_books: i64,
    pub average_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

// ML DTOs
#[derive(Serialize, Debug, PartialEq)]
pub struct BookFeatures {
    pub title: String,
    pub price: f64,
    pub rating: i32,
    pub availability: u8,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Deserialize, Validate, Debug)]
pub struct PredictionInput {
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    #[validate(range(min = 0, max = 5, message = "Rating must be between 0 and 5"))]
    pub rating: i32,

    #[validate(range(min = 0, max = 1, message = "Availability must be 0 or 1"))]
    pub availability: i32,

    pub category: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Prediction {
    pub recommended: bool,
    pub score: f64,
}

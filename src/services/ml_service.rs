use validator::Validate;

use crate::{
    db::models::book::{Book, BookFeatures, Prediction, PredictionInput},
    error::AppError,
    services::books_service::round2,
};

const BASE_SCORE: f64 = 0.3;
const RATING_WEIGHT: f64 = 0.1;
const AVAILABILITY_WEIGHT: f64 = 0.05;
const RECOMMENDATION_THRESHOLD: f64 = 0.7;

pub struct MlService;

impl MlService {
    /// Feature rows for every book; `with_image` adds the image URL (training data).
    pub fn features(books: Vec<Book>, with_image: bool) -> Vec<BookFeatures> {
        books
            .into_iter()
            .map(|book| features_from(book, with_image))
            .collect()
    }

    pub fn predict(input: &PredictionInput) -> Result<Prediction, AppError> {
        input.validate().map_err(|e| AppError::validation(e.to_string()))?;

        let score = BASE_SCORE
            + RATING_WEIGHT * f64::from(input.rating)
            + AVAILABILITY_WEIGHT * f64::from(input.availability);

        Ok(Prediction {
            recommended: score > RECOMMENDATION_THRESHOLD,
            score: round2(score),
        })
    }
}

/// 1 when the availability text reports stock, 0 otherwise.
pub fn availability_flag(availability: &str) -> u8 {
    u8::from(availability.contains("In stock"))
}

fn features_from(book: Book, with_image: bool) -> BookFeatures {
    BookFeatures {
        availability: availability_flag(&book.availability),
        image_url: with_image.then_some(book.image_url),
        title: book.title,
        price: book.price,
        rating: book.rating,
        category: book.category,
    }
}

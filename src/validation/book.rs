use crate::error::AppError;

pub const DEFAULT_TOP_RATED_LIMIT: i64 = 10;
pub const MAX_TOP_RATED_LIMIT: i64 = 1000;

pub fn validate_price_range(min: f64, max: f64) -> Result<(), AppError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(AppError::validation("Price bounds must be finite numbers"));
    }
    if min < 0.0 {
        return Err(AppError::validation("Minimum price cannot be negative"));
    }
    if min > max {
        return Err(AppError::validation(
            "Minimum price cannot be greater than maximum price",
        ));
    }
    Ok(())
}

/// Resolves the `limit` query parameter of the top-rated listing.
pub fn resolve_top_rated_limit(limit: Option<i64>) -> Result<i64, AppError> {
    let limit = limit.unwrap_or(DEFAULT_TOP_RATED_LIMIT);
    if !(1..=MAX_TOP_RATED_LIMIT).contains(&limit) {
        return Err(AppError::validation(format!(
            "Limit must be between 1 and {}",
            MAX_TOP_RATED_LIMIT
        )));
    }
    Ok(limit)
}

/// Blank search terms are treated as absent.
pub fn normalize_search_term(term: Option<&str>) -> Option<&str> {
    term.map(str::trim).filter(|t| !t.is_empty())
}

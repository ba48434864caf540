// Sub-modules organized by functional domain
pub mod api;
pub mod book;
pub mod user;

// API response structures
pub use api::*;

// Book catalogue models
pub use book::*;

// Account models
pub use user::*;

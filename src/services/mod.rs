pub mod books_service;
pub mod ml_service;
pub mod users_service;

pub use books_service::BooksService;
pub use ml_service::MlService;
pub use users_service::UsersService;

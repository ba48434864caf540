pub mod books;
pub mod users;

pub use books::BookRepo;
pub use users::UserRepo;

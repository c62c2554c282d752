//! BookService: request validation and domain errors over a [`BookStore`](crate::store::BookStore).

mod books;
mod validation;
pub use books::BookService;
pub use validation::{RequestValidator, MAX_TEXT_LEN};

//! Client-side data model: books, shelf ids, and synthetic book generation.
mod book;
mod generate;


pub use book::{Book, ShelfId};
pub use generate::{BookGenerator, FIELD_LEN, PAGES_MAX, PAGES_MIN};

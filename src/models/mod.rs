//! Data models for the library catalog

pub mod author;
pub mod book;

pub use author::{Author, AuthorDto};
pub use book::{Book, BookDto};

//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

/// Path prefix every catalog page lives under
pub const CATALOG_PREFIX: &str = "/catalog";

// Re-export commonly used types
pub use author::{Author, AuthorData, AuthorForm};
pub use book::{Book, BookData, BookDetail, BookForm, BookListing};
pub use book_instance::{BookInstance, BookInstanceData, InstanceStatus};
pub use genre::{Genre, GenreData, GenreForm};

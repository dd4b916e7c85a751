//! BookList Application Library
//!
//! The `books` module declares the Book record; [`App`] wires it to the
//! record store and drives the module lifecycle.

pub mod app;
pub mod modules;
pub mod utils;

pub use app::App;
pub use modules::books::{Book, BOOK_SCHEMA};

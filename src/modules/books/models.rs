use std::fmt;

use booklist_db::Record;
use booklist_kernel::{FieldDef, RecordSchema};
use serde::{Deserialize, Serialize};
use time::Date;

/// Persisted shape of a book: seven mandatory fields, no key.
pub const BOOK_SCHEMA: RecordSchema = RecordSchema {
    table: "book",
    fields: &[
        FieldDef::text("title", 100),
        FieldDef::text("author", 100),
        FieldDef::date("published_date"),
        FieldDef::text("isbn", 13),
        FieldDef::integer("pages"),
        FieldDef::url("cover", 200),
        FieldDef::text("language", 30),
    ],
};

/// A book as declared by the books module.
///
/// Widths are enforced by the store when the book is persisted, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Title of the book, at most 100 characters
    pub title: String,
    /// Author of the book, at most 100 characters
    pub author: String,
    /// Publication date, stored as `YYYY-MM-DD`
    pub published_date: Date,
    /// ISBN, at most 13 characters; not checksummed
    pub isbn: String,
    /// Page count; only the 32-bit range is checked
    pub pages: i32,
    /// URL of the cover image, at most 200 characters
    pub cover: String,
    /// Language the book is written in, at most 30 characters
    pub language: String,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        published_date: Date,
        isbn: impl Into<String>,
        pages: i32,
        cover: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            published_date,
            isbn: isbn.into(),
            pages,
            cover: cover.into(),
            language: language.into(),
        }
    }

    /// The book's textual identity: its title, verbatim.
    pub fn to_display_string(&self) -> &str {
        &self.title
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_display_string())
    }
}

impl Record for Book {
    const SCHEMA: RecordSchema = BOOK_SCHEMA;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn dune() -> Book {
        Book::new(
            "Dune",
            "Frank Herbert",
            date!(1965 - 08 - 01),
            "9780441013593",
            412,
            "https://example.com/dune.jpg",
            "English",
        )
    }

    #[test]
    fn display_string_is_title() {
        let book = dune();
        assert_eq!(book.to_display_string(), "Dune");
        assert_eq!(book.to_string(), "Dune");
    }

    #[test]
    fn display_follows_field_assignment() {
        let mut book = dune();
        book.title = "Dune Messiah".to_string();
        assert_eq!(book.to_display_string(), "Dune Messiah");
    }

    #[test]
    fn schema_matches_struct_fields() {
        let value = serde_json::to_value(dune()).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected = BOOK_SCHEMA.field_names();
        keys.sort_unstable();
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }

    #[test]
    fn date_serializes_as_iso_calendar_date() {
        let value = serde_json::to_value(dune()).unwrap();
        assert_eq!(value["published_date"], "1965-08-01");
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// A book as the shelf service stores it. `isbn` keys the book within a shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub pages: u32,
}

impl Book {
    /// Reverses the author in place and hands back the previous value.
    pub fn reverse_author(&mut self) -> String {
        let reversed: String = self.author.chars().rev().collect();
        std::mem::replace(&mut self.author, reversed)
    }

    /// Fields that differ between `self` and `other`, in declaration order.
    #[must_use]
    pub fn mismatched_fields(&self, other: &Self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title != other.title {
            fields.push("title");
        }
        if self.author != other.author {
            fields.push("author");
        }
        if self.isbn != other.isbn {
            fields.push("isbn");
        }
        if self.pages != other.pages {
            fields.push("pages");
        }
        fields
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{title: '{}', author: '{}', isbn: '{}', pages: {}}}",
            self.title, self.author, self.isbn, self.pages
        )
    }
}

/// Opaque shelf key as listed by `GET /shelves`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShelfId(String);

impl ShelfId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ShelfId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ShelfId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for ShelfId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

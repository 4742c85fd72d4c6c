use serde::de::DeserializeOwned;

use crate::model::Book;

/// Status and body of one call. Error statuses are data here, not failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// Body with surrounding whitespace removed, for console output.
    #[must_use]
    pub fn text(&self) -> &str {
        self.body.trim()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the body is not valid JSON for `T`.
    pub fn json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&self.body)
    }

    /// The book in a successful response, if the body holds one.
    #[must_use]
    pub fn book(&self) -> Option<Book> {
        if !self.is_success() {
            return None;
        }
        self.json().ok()
    }

    /// The shelf contents in a successful response, if the body holds a list of books.
    #[must_use]
    pub fn books(&self) -> Option<Vec<Book>> {
        if !self.is_success() {
            return None;
        }
        self.json().ok()
    }
}

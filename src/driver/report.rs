use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

use crate::model::{Book, ShelfId};

/// Server behavior the driver watches for while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// A fetched book differs from the one that was posted.
    RoundTrip,
    /// A fetch after PATCH still shows the old author.
    Update,
    /// A deleted isbn is still listed on its shelf.
    Deletion,
    /// The shelf's book count changed across create-then-delete.
    Cardinality,
    /// The shelf listing, or a shelf's contents before its round trip,
    /// changed between passes.
    Repeatability,
}

impl CheckKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CheckKind::RoundTrip => "round-trip",
            CheckKind::Update => "update",
            CheckKind::Deletion => "deletion",
            CheckKind::Cardinality => "cardinality",
            CheckKind::Repeatability => "repeatability",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    /// 1-based.
    pub pass: usize,
    pub shelf: Option<ShelfId>,
    pub kind: CheckKind,
    pub detail: String,
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shelf {
            Some(shelf) => write!(
                f,
                "pass {} shelf {}: {} check failed: {}",
                self.pass, shelf, self.kind, self.detail
            ),
            None => write!(
                f,
                "pass {}: {} check failed: {}",
                self.pass, self.kind, self.detail
            ),
        }
    }
}

/// Tallies and check failures for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub passes: usize,
    pub shelves_exercised: usize,
    pub books_created: usize,
    pub requests: usize,
    pub failures: Vec<CheckFailure>,
    listings: Vec<Vec<ShelfId>>,
    contents: BTreeMap<ShelfId, Option<Vec<Book>>>,
}

impl RunReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn failures_of(&self, kind: CheckKind) -> usize {
        self.failures
            .iter()
            .filter(|failure| failure.kind == kind)
            .count()
    }

    pub(crate) fn fail(
        &mut self,
        pass: usize,
        shelf: Option<&ShelfId>,
        kind: CheckKind,
        detail: String,
    ) {
        tracing::warn!("{} check failed on pass {}: {}", kind, pass, detail);
        self.failures.push(CheckFailure {
            pass,
            shelf: shelf.cloned(),
            kind,
            detail,
        });
    }

    pub(crate) const fn count_request(&mut self) {
        self.requests = self.requests.saturating_add(1);
    }

    /// Remembers the listing seen at the start of `pass` and compares it with
    /// the first pass.
    pub(crate) fn record_listing(&mut self, pass: usize, listing: &[ShelfId]) {
        let differs = self
            .listings
            .first()
            .is_some_and(|first| first.as_slice() != listing);
        if differs {
            let first = self
                .listings
                .first()
                .map(|ids| format_ids(ids))
                .unwrap_or_default();
            self.fail(
                pass,
                None,
                CheckKind::Repeatability,
                format!(
                    "shelf listing {} differs from pass 1 listing {}",
                    format_ids(listing),
                    first
                ),
            );
        }
        self.listings.push(listing.to_vec());
    }

    /// Compares a shelf's contents before its round trip with what the first
    /// pass saw there. `None` stands for a listing that was not a book list.
    pub(crate) fn record_shelf_contents(
        &mut self,
        pass: usize,
        shelf: &ShelfId,
        books: Option<Vec<Book>>,
    ) {
        let books = books.map(|mut books| {
            books.sort_by(|left, right| left.isbn.cmp(&right.isbn));
            books
        });
        let Some(first) = self.contents.get(shelf) else {
            self.contents.insert(shelf.clone(), books);
            return;
        };
        if *first == books {
            return;
        }
        let detail = format!(
            "contents before the round trip were {}, pass 1 saw {}",
            describe_contents(books.as_deref()),
            describe_contents(first.as_deref())
        );
        self.fail(pass, Some(shelf), CheckKind::Repeatability, detail);
    }

    /// Writes the end-of-run summary.
    ///
    /// # Errors
    ///
    /// Returns an error when the writer fails.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "Run finished: {} pass(es), {} shelf round trip(s), {} book(s) created, {} request(s)",
            self.passes, self.shelves_exercised, self.books_created, self.requests
        )?;
        if self.is_clean() {
            writeln!(out, "Checks: all passed")?;
            return Ok(());
        }
        writeln!(out, "Checks: {} failed", self.failures.len())?;
        for failure in &self.failures {
            writeln!(out, "  {}", failure)?;
        }
        Ok(())
    }
}

/// Renders ids the way the shelf listing line shows them: `[A-G, H-J]`.
pub(crate) fn format_ids(ids: &[ShelfId]) -> String {
    let joined: Vec<&str> = ids.iter().map(ShelfId::as_str).collect();
    format!("[{}]", joined.join(", "))
}

fn describe_contents(books: Option<&[Book]>) -> String {
    match books {
        Some(books) => {
            let rendered: Vec<String> = books.iter().map(ToString::to_string).collect();
            format!("[{}]", rendered.join(", "))
        }
        None => "an unreadable listing".to_owned(),
    }
}

use std::io::Write;

use tracing::{debug, info};

use crate::error::AppResult;
use crate::http::{ApiResponse, ShelfClient};
use crate::model::{Book, BookGenerator, ShelfId};

use super::SmokePlan;
use super::report::{CheckKind, RunReport, format_ids};

/// Runs every pass of `plan` against `client`, printing progress to `out`.
///
/// Error statuses from the server are printed and checked, never raised.
/// Only transport failures, an undecodable shelf listing, an unknown
/// requested shelf, or a failing writer end the run early.
///
/// # Errors
///
/// Returns an error when a request cannot be sent, the shelf listing cannot
/// be decoded, a requested shelf is missing, or writing to `out` fails.
pub async fn run_smoke<W: Write>(
    client: &ShelfClient,
    plan: &SmokePlan,
    out: &mut W,
) -> AppResult<RunReport> {
    let mut generator = BookGenerator::new(plan.seed);
    let mut report = RunReport::default();

    for pass in 1..=plan.passes {
        info!("Starting pass {} of {}", pass, plan.passes);
        let mut run = PassRun {
            client,
            plan,
            pass,
            generator: &mut generator,
            report: &mut report,
            out: &mut *out,
        };
        run.execute().await?;
        report.passes = pass;
    }

    report.write_summary(out)?;
    Ok(report)
}

struct PassRun<'run, W: Write> {
    client: &'run ShelfClient,
    plan: &'run SmokePlan,
    pass: usize,
    generator: &'run mut BookGenerator,
    report: &'run mut RunReport,
    out: &'run mut W,
}

impl<W: Write> PassRun<'_, W> {
    async fn execute(&mut self) -> AppResult<()> {
        let listed = self.client.list_shelves().await?;
        self.report.count_request();
        writeln!(self.out, "Shelves: {}", format_ids(&listed))?;
        self.report.record_listing(self.pass, &listed);

        for shelf in self.plan.select_shelves(&listed)? {
            self.round_trip(&shelf).await?;
            self.report.shelves_exercised = self.report.shelves_exercised.saturating_add(1);
        }
        Ok(())
    }

    async fn round_trip(&mut self, shelf: &ShelfId) -> AppResult<()> {
        let before = self.client.list_books(shelf).await?;
        self.report.count_request();
        writeln!(self.out, "Shelf ({}): {}", shelf, before.text())?;
        self.report
            .record_shelf_contents(self.pass, shelf, before.books());

        let mut books = Vec::with_capacity(self.plan.books_per_shelf);
        for _ in 0..self.plan.books_per_shelf {
            let book = self.generator.next_book();
            let resp = self.client.create_book(shelf, &book).await?;
            self.report.count_request();
            self.report.books_created = self.report.books_created.saturating_add(1);
            writeln!(
                self.out,
                "Added book: s={}, resp={}: {}",
                resp.status,
                resp.text(),
                book
            )?;
            books.push(book);
        }

        for book in &books {
            let resp = self.client.get_book(shelf, &book.isbn).await?;
            self.report.count_request();
            writeln!(
                self.out,
                "Fetching '{}': s={}: {}",
                book.isbn,
                resp.status,
                resp.text()
            )?;
            self.check_round_trip(shelf, book, &resp);
        }

        for book in &mut books {
            writeln!(self.out, "Patching {}", book.isbn)?;
            let old_author = book.reverse_author();
            let resp = self.client.update_book(shelf, book).await?;
            self.report.count_request();
            writeln!(self.out, "Patched: s={}: {}", resp.status, resp.text())?;

            let resp = self.client.get_book(shelf, &book.isbn).await?;
            self.report.count_request();
            let new_author = resp.book().map(|fetched| fetched.author);
            writeln!(
                self.out,
                "Updated: s={}: Old: '{}' New: '{}'",
                resp.status,
                old_author,
                new_author.as_deref().unwrap_or("<unavailable>")
            )?;
            self.check_update(shelf, book, &old_author, new_author.as_deref());
        }

        for book in &books {
            let resp = self.client.delete_book(shelf, &book.isbn).await?;
            self.report.count_request();
            writeln!(
                self.out,
                "Deleted '{}': s={}: {}",
                book.isbn,
                resp.status,
                resp.text()
            )?;
        }

        writeln!(self.out, "Round trip done, shelf should be empty")?;
        let after = self.client.list_books(shelf).await?;
        self.report.count_request();
        writeln!(self.out, "Shelf ({}): {}", shelf, after.text())?;
        self.check_shelf_restored(shelf, &books, &before, &after)
            .await?;

        Ok(())
    }

    fn check_round_trip(&mut self, shelf: &ShelfId, sent: &Book, resp: &ApiResponse) {
        let detail = match resp.book() {
            Some(fetched) => {
                let fields = sent.mismatched_fields(&fetched);
                if fields.is_empty() {
                    return;
                }
                format!("isbn '{}' came back with different {}", sent.isbn, fields.join(", "))
            }
            None => format!(
                "isbn '{}' could not be fetched (status {})",
                sent.isbn, resp.status
            ),
        };
        self.report
            .fail(self.pass, Some(shelf), CheckKind::RoundTrip, detail);
    }

    fn check_update(&mut self, shelf: &ShelfId, sent: &Book, old: &str, new: Option<&str>) {
        if new == Some(sent.author.as_str()) {
            return;
        }
        let detail = match new {
            Some(seen) if seen == old => {
                format!("isbn '{}' still has author '{}'", sent.isbn, old)
            }
            Some(seen) => format!(
                "isbn '{}' has author '{}', expected '{}'",
                sent.isbn, seen, sent.author
            ),
            None => format!("isbn '{}' could not be re-fetched after PATCH", sent.isbn),
        };
        self.report
            .fail(self.pass, Some(shelf), CheckKind::Update, detail);
    }

    async fn check_shelf_restored(
        &mut self,
        shelf: &ShelfId,
        created: &[Book],
        before: &ApiResponse,
        after: &ApiResponse,
    ) -> AppResult<()> {
        let Some(remaining) = after.books() else {
            debug!(
                "Shelf {} listing after deletes was not a book list (status {}), fetching each isbn",
                shelf, after.status
            );
            self.check_deleted_individually(shelf, created).await?;
            self.report.fail(
                self.pass,
                Some(shelf),
                CheckKind::Cardinality,
                format!(
                    "shelf listing after the round trip was unavailable (status {})",
                    after.status
                ),
            );
            return Ok(());
        };

        let survivors: Vec<&str> = created
            .iter()
            .filter(|book| remaining.iter().any(|left| left.isbn == book.isbn))
            .map(|book| book.isbn.as_str())
            .collect();
        if !survivors.is_empty() {
            self.report.fail(
                self.pass,
                Some(shelf),
                CheckKind::Deletion,
                format!("deleted isbn(s) still listed: {}", survivors.join(", ")),
            );
        }

        let detail = match before.books() {
            Some(initial) if initial.len() == remaining.len() => return Ok(()),
            Some(initial) => format!(
                "shelf held {} book(s) before the round trip and {} after",
                initial.len(),
                remaining.len()
            ),
            None => format!(
                "shelf listing before the round trip was unavailable (status {})",
                before.status
            ),
        };
        self.report
            .fail(self.pass, Some(shelf), CheckKind::Cardinality, detail);
        Ok(())
    }

    /// Deletion holds for a book when fetching its isbn no longer succeeds.
    async fn check_deleted_individually(
        &mut self,
        shelf: &ShelfId,
        created: &[Book],
    ) -> AppResult<()> {
        let mut survivors = Vec::new();
        for book in created {
            let resp = self.client.get_book(shelf, &book.isbn).await?;
            self.report.count_request();
            if resp.is_success() {
                survivors.push(book.isbn.as_str());
            }
        }
        if !survivors.is_empty() {
            self.report.fail(
                self.pass,
                Some(shelf),
                CheckKind::Deletion,
                format!("deleted isbn(s) still fetchable: {}", survivors.join(", ")),
            );
        }
        Ok(())
    }
}

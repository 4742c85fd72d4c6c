use crate::args::SmokeArgs;
use crate::error::{AppError, AppResult, ValidationError};
use crate::model::ShelfId;

/// What a run does, independent of where the answers are printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokePlan {
    pub passes: usize,
    pub books_per_shelf: usize,
    /// Empty means every shelf the server lists.
    pub shelves: Vec<ShelfId>,
    pub seed: Option<u64>,
    pub verify: bool,
}

impl SmokePlan {
    #[must_use]
    pub fn from_args(args: &SmokeArgs) -> Self {
        Self {
            passes: args.passes.get(),
            books_per_shelf: args.books.get(),
            shelves: args
                .shelves
                .iter()
                .map(|shelf| ShelfId::from(shelf.as_str()))
                .collect(),
            seed: args.seed,
            verify: args.verify,
        }
    }

    /// Narrows the server's listing to the requested shelves, keeping the
    /// server's order.
    ///
    /// # Errors
    ///
    /// Returns an error when a requested shelf is not in the listing.
    pub fn select_shelves(&self, listed: &[ShelfId]) -> AppResult<Vec<ShelfId>> {
        if self.shelves.is_empty() {
            return Ok(listed.to_vec());
        }

        let missing: Vec<&str> = self
            .shelves
            .iter()
            .filter(|wanted| !listed.contains(wanted))
            .map(ShelfId::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::validation(ValidationError::UnknownShelves {
                missing: missing.join(", "),
            }));
        }

        Ok(listed
            .iter()
            .filter(|shelf| self.shelves.contains(shelf))
            .cloned()
            .collect())
    }
}

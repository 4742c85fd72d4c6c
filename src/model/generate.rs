use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Book;

/// Length of every generated title, author and isbn.
pub const FIELD_LEN: usize = 10;
pub const PAGES_MIN: u32 = 100;
pub const PAGES_MAX: u32 = 500;

/// Produces synthetic books. Seeded generators repeat their sequence.
#[derive(Debug)]
pub struct BookGenerator {
    rng: StdRng,
}

impl BookGenerator {
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// `len` ASCII letters, upper and lower case alike.
    pub fn letters(&mut self, len: usize) -> String {
        (&mut self.rng)
            .sample_iter(Alphanumeric)
            .map(char::from)
            .filter(char::is_ascii_alphabetic)
            .take(len)
            .collect()
    }

    pub fn next_book(&mut self) -> Book {
        Book {
            title: self.letters(FIELD_LEN),
            author: self.letters(FIELD_LEN),
            isbn: self.letters(FIELD_LEN),
            pages: self.rng.gen_range(PAGES_MIN..=PAGES_MAX),
        }
    }
}

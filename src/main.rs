mod entry;
mod logger;

use shelfcheck::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}

/// Address the bookshelf service listens on when nothing else is configured.
pub(crate) const DEFAULT_BASE_URL: &str = "http://0.0.0.0:8080";

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("shelfcheck/", env!("CARGO_PKG_VERSION"));

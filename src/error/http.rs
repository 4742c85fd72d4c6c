use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Base URL '{url}' cannot carry path segments.")]
    BaseUrlCannotBeABase { url: String },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} failed: {source}")]
    RequestFailed {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response body from {url}: {source}")]
    ReadBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Shelf listing from {url} returned status {status}: {body}")]
    ShelfListingStatus {
        url: String,
        status: u16,
        body: String,
    },
    #[error("Shelf listing from {url} was not a JSON array of ids: {source}")]
    ShelfListingDecode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

use std::time::Duration;

use reqwest::{Client, Url};
use tracing::debug;

use crate::args::{DEFAULT_USER_AGENT, SmokeArgs};
use crate::error::{AppError, AppResult, HttpError};
use crate::model::{Book, ShelfId};

use super::ApiResponse;

const SHELVES_SEGMENT: &str = "shelves";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Client for `/shelves`, `/shelves/{shelf}` and `/shelves/{shelf}/{isbn}`.
#[derive(Debug, Clone)]
pub struct ShelfClient {
    client: Client,
    base: Url,
}

impl ShelfClient {
    /// Builds a client rooted at `base_url`. A path on the base URL stays in
    /// front of `/shelves`.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> AppResult<Self> {
        let base = Url::parse(base_url).map_err(|err| {
            AppError::http(HttpError::InvalidBaseUrl {
                url: base_url.to_owned(),
                source: err,
            })
        })?;
        if base.cannot_be_a_base() {
            return Err(AppError::http(HttpError::BaseUrlCannotBeABase {
                url: base_url.to_owned(),
            }));
        }

        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))?;

        Ok(Self { client, base })
    }

    /// Builds a client from parsed CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or the HTTP client cannot be built.
    pub fn from_args(args: &SmokeArgs) -> AppResult<Self> {
        Self::new(&args.url, args.request_timeout, args.connect_timeout)
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /shelves`. The listing has to decode: every later call needs it.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or a body that
    /// is not a JSON array of strings.
    pub async fn list_shelves(&self) -> AppResult<Vec<ShelfId>> {
        let url = self.endpoint(&[])?;
        let response = self.send(HttpMethod::Get, url.clone(), None).await?;
        if !response.is_success() {
            return Err(AppError::http(HttpError::ShelfListingStatus {
                url: url.to_string(),
                status: response.status,
                body: response.text().to_owned(),
            }));
        }
        response.json().map_err(|err| {
            AppError::http(HttpError::ShelfListingDecode {
                url: url.to_string(),
                source: err,
            })
        })
    }

    /// `GET /shelves/{shelf}`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn list_books(&self, shelf: &ShelfId) -> AppResult<ApiResponse> {
        let url = self.endpoint(&[shelf.as_str()])?;
        self.send(HttpMethod::Get, url, None).await
    }

    /// `POST /shelves/{shelf}/{isbn}` with the book as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn create_book(&self, shelf: &ShelfId, book: &Book) -> AppResult<ApiResponse> {
        let url = self.endpoint(&[shelf.as_str(), &book.isbn])?;
        self.send(HttpMethod::Post, url, Some(book)).await
    }

    /// `GET /shelves/{shelf}/{isbn}`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn get_book(&self, shelf: &ShelfId, isbn: &str) -> AppResult<ApiResponse> {
        let url = self.endpoint(&[shelf.as_str(), isbn])?;
        self.send(HttpMethod::Get, url, None).await
    }

    /// `PATCH /shelves/{shelf}/{isbn}` with the whole, already mutated book.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn update_book(&self, shelf: &ShelfId, book: &Book) -> AppResult<ApiResponse> {
        let url = self.endpoint(&[shelf.as_str(), &book.isbn])?;
        self.send(HttpMethod::Patch, url, Some(book)).await
    }

    /// `DELETE /shelves/{shelf}/{isbn}`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn delete_book(&self, shelf: &ShelfId, isbn: &str) -> AppResult<ApiResponse> {
        let url = self.endpoint(&[shelf.as_str(), isbn])?;
        self.send(HttpMethod::Delete, url, None).await
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::http(HttpError::BaseUrlCannotBeABase {
                    url: self.base.to_string(),
                })
            })?
            .pop_if_empty()
            .push(SHELVES_SEGMENT)
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<&Book>,
    ) -> AppResult<ApiResponse> {
        let mut request = match method {
            HttpMethod::Get => self.client.get(url.clone()),
            HttpMethod::Post => self.client.post(url.clone()),
            HttpMethod::Patch => self.client.patch(url.clone()),
            HttpMethod::Delete => self.client.delete(url.clone()),
        };
        if let Some(book) = body {
            request = request.json(book);
        }

        let response = request.send().await.map_err(|err| {
            AppError::http(HttpError::RequestFailed {
                method: method.as_str(),
                url: url.to_string(),
                source: err,
            })
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| {
            AppError::http(HttpError::ReadBody {
                url: url.to_string(),
                source: err,
            })
        })?;
        debug!("{} {} -> {}", method.as_str(), url, status);

        Ok(ApiResponse { status, body })
    }
}

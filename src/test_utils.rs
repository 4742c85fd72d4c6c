//! In-process fake of the shelf service, used by unit tests.
//!
//! Behaves like the service the driver targets: fixed shelves, books keyed by
//! isbn, text confirmations for writes. Every call is recorded so tests can
//! assert the exact request sequence and payloads.

#![cfg(test)]

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::{Path, State},
    http::{Method, StatusCode},
    routing::get,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::error::{AppError, AppResult};
use crate::http::ShelfClient;
use crate::model::Book;

pub(crate) const FAKE_SHELVES: [&str; 4] = ["A-G", "H-J", "K-T", "U-Z"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

/// Ways the fake can misbehave, to exercise the driver's checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Fault {
    #[default]
    None,
    /// PATCH answers 200 but keeps the old book.
    IgnorePatch,
    /// DELETE answers 200 but keeps the book.
    IgnoreDelete,
    /// GET of a single book flips its page count.
    CorruptPages,
    /// DELETE also bumps the page count of every book left on the shelf.
    TouchSurvivors,
    /// Shelf listings answer 500.
    BrokenListing,
    /// Shelf listings answer 500 and DELETE keeps the book.
    BrokenListingIgnoreDelete,
}

#[derive(Debug, Default)]
struct FakeInner {
    shelves: BTreeMap<String, Vec<Book>>,
    calls: Vec<RecordedCall>,
    fault: Fault,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeShelves {
    inner: Arc<Mutex<FakeInner>>,
}

impl FakeShelves {
    pub(crate) fn new(fault: Fault) -> Self {
        let shelves = FAKE_SHELVES
            .iter()
            .map(|id| ((*id).to_owned(), Vec::new()))
            .collect();
        Self {
            inner: Arc::new(Mutex::new(FakeInner {
                shelves,
                calls: Vec::new(),
                fault,
            })),
        }
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.inner
            .lock()
            .map(|inner| inner.calls.clone())
            .unwrap_or_default()
    }

    pub(crate) fn book_count(&self, shelf: &str) -> Option<usize> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.shelves.get(shelf).map(Vec::len))
    }

    pub(crate) fn seed_book(&self, shelf: &str, book: Book) {
        if let Ok(mut inner) = self.inner.lock()
            && let Some(books) = inner.shelves.get_mut(shelf)
        {
            books.push(book);
        }
    }

    fn record(&self, method: Method, path: String, body: Option<&str>) -> Option<Fault> {
        let mut inner = self.inner.lock().ok()?;
        let body = body.and_then(|raw| serde_json::from_str(raw).ok());
        inner.calls.push(RecordedCall { method, path, body });
        Some(inner.fault)
    }
}

pub(crate) struct FakeServer {
    pub url: String,
    pub shelves: FakeShelves,
    task: JoinHandle<()>,
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl FakeServer {
    pub(crate) fn client(&self) -> AppResult<ShelfClient> {
        ShelfClient::new(&self.url, Duration::from_secs(5), Duration::from_secs(2))
    }
}

/// Binds the fake on an ephemeral port. Must run inside a tokio runtime.
pub(crate) async fn spawn_fake_server(fault: Fault) -> AppResult<FakeServer> {
    let shelves = FakeShelves::new(fault);
    let router = Router::new()
        .route("/shelves", get(list_shelves))
        .route("/shelves/:shelf", get(list_books))
        .route(
            "/shelves/:shelf/:isbn",
            get(get_book)
                .post(create_book)
                .patch(update_book)
                .delete(delete_book),
        )
        .with_state(shelves.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let task = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            tracing::error!("fake shelf server stopped: {}", err);
        }
    });

    Ok(FakeServer {
        url: format!("http://{}", addr),
        shelves,
        task,
    })
}

pub(crate) fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

type Reply = (StatusCode, String);

fn poisoned() -> Reply {
    (StatusCode::INTERNAL_SERVER_ERROR, "state poisoned".to_owned())
}

fn json_reply<T: serde::Serialize>(value: &T) -> Reply {
    match serde_json::to_string(value) {
        Ok(body) => (StatusCode::OK, body),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

async fn list_shelves(State(state): State<FakeShelves>) -> Reply {
    if state.record(Method::GET, "/shelves".to_owned(), None).is_none() {
        return poisoned();
    }
    let Ok(inner) = state.inner.lock() else {
        return poisoned();
    };
    let ids: Vec<&String> = inner.shelves.keys().collect();
    json_reply(&ids)
}

async fn list_books(State(state): State<FakeShelves>, Path(shelf): Path<String>) -> Reply {
    let Some(fault) = state.record(Method::GET, format!("/shelves/{}", shelf), None) else {
        return poisoned();
    };
    if matches!(fault, Fault::BrokenListing | Fault::BrokenListingIgnoreDelete) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_owned());
    }
    let Ok(inner) = state.inner.lock() else {
        return poisoned();
    };
    match inner.shelves.get(&shelf) {
        Some(books) => json_reply(books),
        None => (StatusCode::NOT_FOUND, "Shelf not found".to_owned()),
    }
}

async fn get_book(
    State(state): State<FakeShelves>,
    Path((shelf, isbn)): Path<(String, String)>,
) -> Reply {
    let Some(fault) = state.record(Method::GET, format!("/shelves/{}/{}", shelf, isbn), None)
    else {
        return poisoned();
    };
    let Ok(inner) = state.inner.lock() else {
        return poisoned();
    };
    let Some(books) = inner.shelves.get(&shelf) else {
        return (StatusCode::NOT_FOUND, "Shelf not found".to_owned());
    };
    match books.iter().find(|book| book.isbn == isbn) {
        Some(book) if fault == Fault::CorruptPages => {
            let mut corrupted = book.clone();
            corrupted.pages = corrupted.pages.saturating_add(1);
            json_reply(&corrupted)
        }
        Some(book) => json_reply(book),
        None => (
            StatusCode::NOT_FOUND,
            format!("Couldn't find isbn '{}'", isbn),
        ),
    }
}

async fn create_book(
    State(state): State<FakeShelves>,
    Path((shelf, isbn)): Path<(String, String)>,
    body: String,
) -> Reply {
    if state
        .record(
            Method::POST,
            format!("/shelves/{}/{}", shelf, isbn),
            Some(&body),
        )
        .is_none()
    {
        return poisoned();
    }
    let book: Book = match serde_json::from_str(&body) {
        Ok(book) => book,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()),
    };
    if book.isbn != isbn {
        return (
            StatusCode::BAD_REQUEST,
            "ISBN doesn't equal path param".to_owned(),
        );
    }
    let Ok(mut inner) = state.inner.lock() else {
        return poisoned();
    };
    match inner.shelves.get_mut(&shelf) {
        Some(books) => {
            books.push(book);
            (StatusCode::CREATED, "Success!".to_owned())
        }
        None => (StatusCode::NOT_FOUND, "Shelf not found".to_owned()),
    }
}

async fn update_book(
    State(state): State<FakeShelves>,
    Path((shelf, isbn)): Path<(String, String)>,
    body: String,
) -> Reply {
    let Some(fault) = state.record(
        Method::PATCH,
        format!("/shelves/{}/{}", shelf, isbn),
        Some(&body),
    ) else {
        return poisoned();
    };
    let book: Book = match serde_json::from_str(&body) {
        Ok(book) => book,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()),
    };
    let Ok(mut inner) = state.inner.lock() else {
        return poisoned();
    };
    let Some(books) = inner.shelves.get_mut(&shelf) else {
        return (StatusCode::NOT_FOUND, "Shelf not found".to_owned());
    };
    match books.iter_mut().find(|stored| stored.isbn == isbn) {
        Some(_) if fault == Fault::IgnorePatch => (StatusCode::OK, "Success!".to_owned()),
        Some(stored) => {
            *stored = book;
            (StatusCode::OK, "Success!".to_owned())
        }
        None => (StatusCode::NOT_FOUND, format!("Book not found: {}", isbn)),
    }
}

async fn delete_book(
    State(state): State<FakeShelves>,
    Path((shelf, isbn)): Path<(String, String)>,
) -> Reply {
    let Some(fault) = state.record(
        Method::DELETE,
        format!("/shelves/{}/{}", shelf, isbn),
        None,
    ) else {
        return poisoned();
    };
    let Ok(mut inner) = state.inner.lock() else {
        return poisoned();
    };
    let Some(books) = inner.shelves.get_mut(&shelf) else {
        return (StatusCode::NOT_FOUND, "Shelf not found".to_owned());
    };
    if matches!(fault, Fault::IgnoreDelete | Fault::BrokenListingIgnoreDelete) {
        return (StatusCode::OK, "Deleted!".to_owned());
    }
    match books.iter().position(|book| book.isbn == isbn) {
        Some(index) => {
            books.swap_remove(index);
            if fault == Fault::TouchSurvivors {
                for book in books.iter_mut() {
                    book.pages = book.pages.saturating_add(1);
                }
            }
            (StatusCode::OK, "Deleted!".to_owned())
        }
        None => (StatusCode::NOT_FOUND, format!("Book not found: {}", isbn)),
    }
}

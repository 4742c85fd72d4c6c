//! Typed client for the shelf service's REST contract.
mod client;
mod response;


pub use client::ShelfClient;
pub use response::ApiResponse;

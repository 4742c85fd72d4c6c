//! Core library for the `shelfcheck` CLI.
//!
//! This crate provides the building blocks used by the binary: CLI argument
//! types, configuration loading, the typed shelf-service client, the book
//! model, and the round-trip driver. The primary user-facing interface is the
//! `shelfcheck` command-line application.
pub mod args;
pub mod config;
pub mod driver;
pub mod error;
pub mod http;
pub mod model;

#[cfg(test)]
mod test_utils;

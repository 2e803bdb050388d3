//! Common types shared across the browser shell crates.

pub mod error;

pub use error::{BrowserError, BrowserResult};

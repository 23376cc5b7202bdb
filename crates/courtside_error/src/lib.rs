//! Error types for the Courtside media pipeline.
//!
//! This crate provides the foundation error types used throughout the Courtside
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use courtside_error::{CourtsideResult, HttpError};
//!
//! fn fetch_session() -> CourtsideResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_session() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod media;
mod record;

pub use config::ConfigError;
pub use error::{CourtsideError, CourtsideErrorKind, CourtsideResult};
pub use http::HttpError;
pub use media::{MediaError, MediaErrorKind};
pub use record::{RecordError, RecordErrorKind};

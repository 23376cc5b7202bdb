//! Record types and the media write boundary for Courtside.
//!
//! Records (posts, profiles, teams, tournaments) carry media slots as plain
//! descriptor strings filled in by the ingestion pipeline. This crate owns
//! the boundary between the two: the entry points record-writing code calls
//! to ingest media and resolve it for display, and the write-path guard that
//! refuses to persist a descriptor the pipeline would never legally produce.
//!
//! The hosted backend itself is out of scope; [`RecordStore`] abstracts it
//! and an in-memory implementation ships for tests and local runs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod boundary;
mod guard;
mod model;
mod store;

pub use boundary::MediaBoundary;
pub use guard::ensure_persistable;
pub use model::{Post, Team, Tournament, UserProfile};
pub use store::{MemoryRecordStore, RecordStore};

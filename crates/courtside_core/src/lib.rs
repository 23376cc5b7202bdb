//! Core media types for the Courtside pipeline.
//!
//! This crate defines the data model shared across the workspace: the media
//! kinds a record slot can hold, the transient payload consumed by one
//! ingestion call, the persisted descriptor classification, and the caller
//! identity that namespaces remote storage keys.
//!
//! # Example
//!
//! ```
//! use courtside_core::{Descriptor, MediaKind, MediaPayload};
//!
//! let payload = MediaPayload::new(
//!     vec![0xFF, 0xD8, 0xFF],
//!     MediaKind::Image,
//!     "image/jpeg",
//!     Some("net-practice.jpg".to_string()),
//! );
//! assert_eq!(payload.size_bytes(), 3);
//!
//! let descriptor = Descriptor::classify("data:image/jpeg;base64,AAAA");
//! assert!(descriptor.is_persistable());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod descriptor;
mod identity;
mod kind;
mod payload;
mod telemetry;

pub use descriptor::{Descriptor, EPHEMERAL_SCHEME, INLINE_SCHEME};
pub use identity::CallerIdentity;
pub use kind::MediaKind;
pub use payload::MediaPayload;
pub use telemetry::init_telemetry;

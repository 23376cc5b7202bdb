//! Process-local handles for materialized media bytes.
//!
//! Previews and forced-download resolution need somewhere to park bytes that
//! must never be persisted. The store hands out `mem://{uuid}` handles that
//! are valid only inside this process; the owner of a handle releases it when
//! the bytes are superseded or the consuming view goes away, so live handles
//! do not accumulate unboundedly.

use courtside_core::EPHEMERAL_SCHEME;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Entry {
    bytes: Arc<Vec<u8>>,
    mime_type: String,
}

/// Registry of process-lifetime media handles.
#[derive(Debug, Default)]
pub struct EphemeralStore {
    entries: RwLock<HashMap<Uuid, Entry>>,
}

impl EphemeralStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Park bytes and mint a `mem://{uuid}` handle for them.
    pub fn insert(&self, bytes: Vec<u8>, mime_type: impl Into<String>) -> String {
        let id = Uuid::new_v4();
        let entry = Entry {
            bytes: Arc::new(bytes),
            mime_type: mime_type.into(),
        };
        self.entries
            .write()
            .expect("ephemeral store lock poisoned")
            .insert(id, entry);
        tracing::debug!(handle = %id, "materialized ephemeral handle");
        format!("{}{}", EPHEMERAL_SCHEME, id)
    }

    /// Look up a handle, returning the bytes and MIME type if it is live.
    pub fn get(&self, handle: &str) -> Option<(Arc<Vec<u8>>, String)> {
        let id = Self::parse_handle(handle)?;
        let entries = self.entries.read().expect("ephemeral store lock poisoned");
        entries
            .get(&id)
            .map(|e| (Arc::clone(&e.bytes), e.mime_type.clone()))
    }

    /// Release a handle, dropping its bytes.
    ///
    /// Returns `true` if the handle was live.
    pub fn release(&self, handle: &str) -> bool {
        let Some(id) = Self::parse_handle(handle) else {
            return false;
        };
        let removed = self
            .entries
            .write()
            .expect("ephemeral store lock poisoned")
            .remove(&id)
            .is_some();
        if removed {
            tracing::debug!(handle = %id, "released ephemeral handle");
        }
        removed
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.entries.read().expect("ephemeral store lock poisoned").len()
    }

    /// Whether no handles are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn parse_handle(handle: &str) -> Option<Uuid> {
        handle
            .strip_prefix(EPHEMERAL_SCHEME)
            .and_then(|id| Uuid::parse_str(id).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_release_round_trip() {
        let store = EphemeralStore::new();
        let handle = store.insert(vec![1, 2, 3], "image/jpeg");
        assert!(handle.starts_with(EPHEMERAL_SCHEME));

        let (bytes, mime) = store.get(&handle).unwrap();
        assert_eq!(*bytes, vec![1, 2, 3]);
        assert_eq!(mime, "image/jpeg");

        assert!(store.release(&handle));
        assert!(store.get(&handle).is_none());
        assert!(!store.release(&handle));
    }

    #[test]
    fn foreign_strings_are_not_handles() {
        let store = EphemeralStore::new();
        assert!(store.get("https://example.com/x").is_none());
        assert!(store.get("mem://not-a-uuid").is_none());
        assert!(!store.release("data:image/png;base64,AA"));
    }

    #[test]
    fn released_handles_do_not_accumulate() {
        let store = EphemeralStore::new();
        for _ in 0..10 {
            let handle = store.insert(vec![0u8; 64], "application/pdf");
            store.release(&handle);
        }
        assert!(store.is_empty());
    }
}

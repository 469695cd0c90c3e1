//! Deterministic identifiers for documents and chunks.
//!
//! Both helpers hash a small byte string with UUIDv5 under a caller-chosen
//! namespace, so re-ingesting the same source yields the same ids. Producers
//! that already have stable ids can ignore this module entirely.
//!
//! ```text
//! document: UUIDv5(namespace, uri)                              no mtime
//!           UUIDv5(namespace, uri + "\0" + rfc3339(mtime))      with mtime
//! chunk:    UUIDv5(namespace, doc_id + "\0" + be_u64(order))
//! ```
//!
//! The null byte separator keeps `("ab", "c")` and `("a", "bc")` apart.
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Namespace used when configuration does not provide one.
pub const DEFAULT_ID_NAMESPACE: Uuid = Uuid::from_u128(0x5d0c_f1a2_7b3e_4c89_9f21_d0c5_e7a8_b463);

/// Stable id for the document at `uri`, optionally pinned to a modification
/// time so a changed file gets a new id.
///
/// ```rust
/// use document::{derive_document_id, DEFAULT_ID_NAMESPACE};
///
/// let a = derive_document_id(&DEFAULT_ID_NAMESPACE, "/notes/a.md", None);
/// let b = derive_document_id(&DEFAULT_ID_NAMESPACE, "/notes/a.md", None);
/// assert_eq!(a, b);
/// assert_ne!(a, derive_document_id(&DEFAULT_ID_NAMESPACE, "/notes/b.md", None));
/// ```
pub fn derive_document_id(
    namespace: &Uuid,
    uri: &str,
    modified: Option<DateTime<Utc>>,
) -> String {
    match modified {
        None => Uuid::new_v5(namespace, uri.as_bytes()).to_string(),
        Some(ts) => {
            let stamp = ts.to_rfc3339_opts(SecondsFormat::Nanos, true);
            let mut material = Vec::with_capacity(uri.len() + 1 + stamp.len());
            material.extend_from_slice(uri.as_bytes());
            material.push(0);
            material.extend_from_slice(stamp.as_bytes());
            Uuid::new_v5(namespace, &material).to_string()
        }
    }
}

/// Stable id for the chunk at position `order` within `doc_id`.
pub fn derive_chunk_id(namespace: &Uuid, doc_id: &str, order: usize) -> String {
    let mut material = Vec::with_capacity(doc_id.len() + 9);
    material.extend_from_slice(doc_id.as_bytes());
    material.push(0);
    material.extend_from_slice(&(order as u64).to_be_bytes());
    Uuid::new_v5(namespace, &material).to_string()
}

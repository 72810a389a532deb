//! S3 path-to-hierarchy core / S3路径层级翻译核心
//!
//! Everything that turns a flat browse path into buckets, directory
//! levels or object content, plus the credential store and access probe
//! backing the auth endpoints.

pub mod client;
pub mod listing;
pub mod path;
pub mod probe;

pub use client::{ClientFactory, ClientHandle, ClientOptions, S3Credentials};
pub use listing::{bucket_entries, fetch_object_entry, translate_page, Entry, EntryKind, ListingPage, ObjectSummary, Resolution};
pub use path::{resolve, RequestPath};
pub use probe::{check_access, probe, ProbeError};

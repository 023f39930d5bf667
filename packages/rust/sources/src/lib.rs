//! Backend adapters and the content repository.
//!
//! This crate provides:
//! - [`adapters`] — Backend-specific normalizers (Strapi, Directus)
//! - [`AdapterRegistry`] — Looks up the adapter for a configured backend kind
//! - [`ContentRepository`] — Fetches collections and returns normalized records

pub mod adapters;
pub mod repository;

pub use adapters::{AdapterRegistry, BackendAdapter, Collection, DirectusAdapter, StrapiAdapter};
pub use repository::{ContentRepository, RetryPolicy};

//! The fragment entity for the fragments core.
//!
//! A [`Fragment`] is the stored content unit: identity, ownership, a declared
//! content type that never changes after creation, the payload size, and
//! timestamps. The entity owns no I/O handles — the storage contract, the
//! conversion engine, and the clock are injected by reference into each
//! operation, so the embedding application decides the backends once at
//! startup.
//!
//! # Key Types
//!
//! - [`Fragment`] — the entity and its lifecycle operations
//! - [`FragmentDraft`] — construction inputs (required owner and type,
//!   optional id/timestamps/size)
//! - [`ModelError`] / [`ModelResult`] — failure taxonomy for boundary layers

pub mod error;
pub mod fragment;

pub use error::{ModelError, ModelResult};
pub use fragment::{Fragment, FragmentDraft};

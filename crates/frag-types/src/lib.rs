//! Foundation types for the fragments core.
//!
//! This crate provides the content-type registry, the conversion graph, and
//! the identifier and clock primitives used throughout the fragments system.
//! Every other fragments crate depends on `frag-types`.
//!
//! # Key Types
//!
//! - [`MediaType`] — Closed enum of supported bare media types and the
//!   directed conversion graph between them
//! - [`ContentType`] — Declared content type, exact-match over the fixed
//!   supported set (optionally carrying a `charset=utf-8` parameter)
//! - [`FragmentId`] — Random UUID fragment identifier
//! - [`OwnerId`] — Opaque identifier of the authenticated owning principal
//! - [`Clock`] — Injectable time source for deterministic timestamping

pub mod clock;
pub mod error;
pub mod identity;
pub mod media;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TypeError;
pub use identity::{FragmentId, OwnerId};
pub use media::{ContentType, MediaType};

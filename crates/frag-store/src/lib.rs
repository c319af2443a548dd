//! Storage contract for the fragments core.
//!
//! Fragment metadata and payload bytes are stored separately, both addressed
//! by the `(owner, id)` pair. Concrete backends (in-memory map, object store,
//! database) implement the [`FragmentStore`] trait; the core never depends on
//! a specific backend.
//!
//! # Design Rules
//!
//! 1. Metadata is written before payload bytes; the contract requires the
//!    order but is not transactional.
//! 2. Metadata and data are deleted together as one logical unit, never
//!    partially.
//! 3. Lookups are scoped to the owner — there is no cross-owner access.
//! 4. Backends provide read-after-write consistency per `(owner, id)` and
//!    serialize concurrent writers to the same pair if that guarantee is
//!    needed; the contract itself imposes no locking.
//! 5. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod record;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryFragmentStore;
pub use record::FragmentRecord;
pub use traits::{FragmentListing, FragmentStore};

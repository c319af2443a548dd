//! The [`FragmentStore`] trait defining the storage contract.
//!
//! Any backend (in-memory, object store, database) implements this trait to
//! persist fragment metadata and payload bytes for the fragments core.

use frag_types::{FragmentId, OwnerId};

use crate::error::StoreResult;
use crate::record::FragmentRecord;

/// The result of listing an owner's fragments.
///
/// Bare ids when the caller did not ask for expansion, full metadata records
/// otherwise. Ordering is backend-defined; the contract guarantees none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FragmentListing {
    Ids(Vec<FragmentId>),
    Records(Vec<FragmentRecord>),
}

impl FragmentListing {
    /// Number of fragments in the listing.
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Records(records) => records.len(),
        }
    }

    /// Returns `true` if the owner has no fragments.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Storage backend for fragment metadata and payload bytes.
///
/// Implementations must be thread-safe (`Send + Sync`) and provide
/// read-after-write consistency per `(owner, id)` pair. Metadata and data
/// live at the same address but are written by separate calls; deletion
/// removes both as one logical unit.
pub trait FragmentStore: Send + Sync {
    /// Write (create or replace) a fragment's metadata record.
    fn write_fragment(&self, record: &FragmentRecord) -> StoreResult<()>;

    /// Read a fragment's metadata record.
    ///
    /// Returns `Ok(None)` if no record exists for the exact `(owner, id)`
    /// pair. A record owned by a different principal is never returned.
    fn read_fragment(
        &self,
        owner: &OwnerId,
        id: &FragmentId,
    ) -> StoreResult<Option<FragmentRecord>>;

    /// Write (create or replace) a fragment's payload bytes.
    fn write_fragment_data(
        &self,
        owner: &OwnerId,
        id: &FragmentId,
        data: &[u8],
    ) -> StoreResult<()>;

    /// Read a fragment's payload bytes.
    ///
    /// Unlike [`read_fragment`](Self::read_fragment), absence is an error:
    /// fails with [`StoreError::NoData`](crate::StoreError::NoData).
    fn read_fragment_data(&self, owner: &OwnerId, id: &FragmentId) -> StoreResult<Vec<u8>>;

    /// List the owner's fragments: bare ids, or full records when `expand`
    /// is set.
    fn list_fragments(&self, owner: &OwnerId, expand: bool) -> StoreResult<FragmentListing>;

    /// Delete a fragment's metadata and payload bytes together.
    ///
    /// Fails with [`StoreError::NoFragment`](crate::StoreError::NoFragment)
    /// if the pair does not exist. Never deletes partially.
    fn delete_fragment(&self, owner: &OwnerId, id: &FragmentId) -> StoreResult<()>;
}

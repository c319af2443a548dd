use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use frag_types::{FragmentId, OwnerId};

use crate::error::{StoreError, StoreResult};
use crate::record::FragmentRecord;
use crate::traits::{FragmentListing, FragmentStore};

type Address = (OwnerId, FragmentId);

/// Metadata and payload maps guarded by one lock so that deletion removes
/// both entries as a single unit.
#[derive(Default)]
struct Tables {
    metadata: HashMap<Address, FragmentRecord>,
    data: HashMap<Address, Vec<u8>>,
}

/// In-memory, HashMap-based fragment store.
///
/// Intended for tests and embedding. Both tables are held behind a single
/// `RwLock`; records and payloads are cloned on read/write. The lock
/// serializes concurrent writers to the same `(owner, id)` pair.
pub struct InMemoryFragmentStore {
    tables: RwLock<Tables>,
}

impl InMemoryFragmentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Number of fragments currently stored.
    pub fn len(&self) -> usize {
        self.tables.read().expect("lock poisoned").metadata.len()
    }

    /// Returns `true` if the store holds no fragments.
    pub fn is_empty(&self) -> bool {
        self.tables
            .read()
            .expect("lock poisoned")
            .metadata
            .is_empty()
    }

    /// Total payload bytes across all stored fragments.
    pub fn total_bytes(&self) -> u64 {
        self.tables
            .read()
            .expect("lock poisoned")
            .data
            .values()
            .map(|bytes| bytes.len() as u64)
            .sum()
    }

    /// Remove all fragments from the store.
    pub fn clear(&self) {
        let mut tables = self.tables.write().expect("lock poisoned");
        tables.metadata.clear();
        tables.data.clear();
    }
}

impl Default for InMemoryFragmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentStore for InMemoryFragmentStore {
    fn write_fragment(&self, record: &FragmentRecord) -> StoreResult<()> {
        let address = (record.owner_id.clone(), record.id);
        let mut tables = self.tables.write().expect("lock poisoned");
        tables.metadata.insert(address, record.clone());
        debug!(owner = %record.owner_id, id = %record.id, "fragment metadata written");
        Ok(())
    }

    fn read_fragment(
        &self,
        owner: &OwnerId,
        id: &FragmentId,
    ) -> StoreResult<Option<FragmentRecord>> {
        let tables = self.tables.read().expect("lock poisoned");
        Ok(tables.metadata.get(&(owner.clone(), *id)).cloned())
    }

    fn write_fragment_data(
        &self,
        owner: &OwnerId,
        id: &FragmentId,
        data: &[u8],
    ) -> StoreResult<()> {
        let mut tables = self.tables.write().expect("lock poisoned");
        tables.data.insert((owner.clone(), *id), data.to_vec());
        debug!(%owner, %id, bytes = data.len(), "fragment data written");
        Ok(())
    }

    fn read_fragment_data(&self, owner: &OwnerId, id: &FragmentId) -> StoreResult<Vec<u8>> {
        let tables = self.tables.read().expect("lock poisoned");
        tables
            .data
            .get(&(owner.clone(), *id))
            .cloned()
            .ok_or_else(|| StoreError::NoData {
                owner: owner.clone(),
                id: *id,
            })
    }

    fn list_fragments(&self, owner: &OwnerId, expand: bool) -> StoreResult<FragmentListing> {
        let tables = self.tables.read().expect("lock poisoned");
        let owned = tables
            .metadata
            .iter()
            .filter(|((record_owner, _), _)| record_owner == owner);
        let listing = if expand {
            FragmentListing::Records(owned.map(|(_, record)| record.clone()).collect())
        } else {
            FragmentListing::Ids(owned.map(|((_, id), _)| *id).collect())
        };
        Ok(listing)
    }

    fn delete_fragment(&self, owner: &OwnerId, id: &FragmentId) -> StoreResult<()> {
        let address = (owner.clone(), *id);
        let mut tables = self.tables.write().expect("lock poisoned");
        if tables.metadata.remove(&address).is_none() {
            return Err(StoreError::NoFragment {
                owner: owner.clone(),
                id: *id,
            });
        }
        tables.data.remove(&address);
        debug!(%owner, %id, "fragment deleted");
        Ok(())
    }
}

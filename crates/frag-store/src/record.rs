use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use frag_types::{ContentType, FragmentId, OwnerId};

/// The metadata record exchanged over the storage contract.
///
/// This is the persisted shape of a fragment: everything except the payload
/// bytes, which are stored separately under the same `(owner, id)` address.
/// The store never interprets the payload — `size` is carried here so that
/// listings and metadata reads need not touch the data at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentRecord {
    /// Unique fragment identifier.
    pub id: FragmentId,
    /// The owning principal.
    pub owner_id: OwnerId,
    /// Declared content type, immutable after creation.
    pub content_type: ContentType,
    /// Byte length of the payload as of the last data write.
    pub size: u64,
    /// Set once at construction.
    pub created: DateTime<Utc>,
    /// Refreshed on every metadata save.
    pub updated: DateTime<Utc>,
}

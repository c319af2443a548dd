use chrono::{DateTime, Utc};
use tracing::{debug, info};

use frag_convert::ConversionEngine;
use frag_store::{FragmentListing, FragmentRecord, FragmentStore, StoreError};
use frag_types::{Clock, ContentType, FragmentId, MediaType, OwnerId};

use crate::error::{ModelError, ModelResult};

/// Construction inputs for a [`Fragment`].
///
/// Owner and content type are required; everything else is stamped or
/// generated when absent. Storage rehydration goes through
/// [`Fragment::from_record`] instead and re-validates nothing.
#[derive(Clone, Debug)]
pub struct FragmentDraft {
    pub id: Option<FragmentId>,
    pub owner_id: String,
    pub content_type: String,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub size: Option<u64>,
}

impl FragmentDraft {
    /// A draft with the required fields and every optional left unset.
    pub fn new(owner_id: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            id: None,
            owner_id: owner_id.into(),
            content_type: content_type.into(),
            created: None,
            updated: None,
            size: None,
        }
    }
}

/// The stored content unit: metadata plus separately-stored payload bytes,
/// owned by a principal.
///
/// Fields are private so the entity's invariants hold by construction: the
/// declared type has no mutator, and `size` only changes through
/// [`set_data`](Fragment::set_data).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    id: FragmentId,
    owner_id: OwnerId,
    content_type: ContentType,
    size: u64,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl Fragment {
    /// Validate a draft and construct the entity.
    ///
    /// Fails with [`ModelError::Validation`] if the content type is not in
    /// the supported set or the owner id is empty. Generates the id and
    /// stamps `created`/`updated` from the clock when the draft leaves them
    /// unset. No side effects beyond construction.
    pub fn build(draft: FragmentDraft, clock: &dyn Clock) -> ModelResult<Self> {
        let content_type = ContentType::parse(&draft.content_type)
            .map_err(|e| ModelError::Validation(e.to_string()))?;
        let owner_id =
            OwnerId::new(draft.owner_id).map_err(|e| ModelError::Validation(e.to_string()))?;

        let id = draft.id.unwrap_or_else(FragmentId::generate);
        let created = draft.created.unwrap_or_else(|| clock.now());
        let updated = draft.updated.unwrap_or(created);
        let fragment = Self {
            id,
            owner_id,
            content_type,
            size: draft.size.unwrap_or(0),
            created,
            updated,
        };
        info!(id = %fragment.id, owner = %fragment.owner_id, "created new fragment");
        debug!(?fragment, "fragment details");
        Ok(fragment)
    }

    /// All fragments for the given owner: bare ids, or full records when
    /// `expand` is set. Ordering is storage-defined.
    pub fn by_owner(
        store: &dyn FragmentStore,
        owner: &OwnerId,
        expand: bool,
    ) -> ModelResult<FragmentListing> {
        Ok(store.list_fragments(owner, expand)?)
    }

    /// Look up a fragment by the exact `(owner, id)` pair.
    ///
    /// Fails with [`ModelError::NotFound`] when absent; there is no
    /// cross-owner lookup.
    pub fn by_id(
        store: &dyn FragmentStore,
        owner: &OwnerId,
        id: &FragmentId,
    ) -> ModelResult<Self> {
        match store.read_fragment(owner, id)? {
            Some(record) => Ok(Self::from_record(record)),
            None => Err(ModelError::NotFound {
                owner: owner.clone(),
                id: *id,
            }),
        }
    }

    /// Delete the fragment's metadata and payload as one logical unit.
    ///
    /// Deletion is terminal: subsequent lookups of the pair yield
    /// [`ModelError::NotFound`], as does deleting a pair that never existed.
    pub fn delete(store: &dyn FragmentStore, owner: &OwnerId, id: &FragmentId) -> ModelResult<()> {
        store.delete_fragment(owner, id).map_err(|err| match err {
            StoreError::NoFragment { owner, id } => ModelError::NotFound { owner, id },
            other => ModelError::Store(other),
        })
    }

    /// Refresh `updated` and persist the metadata record. Payload bytes are
    /// untouched.
    pub fn save(&mut self, store: &dyn FragmentStore, clock: &dyn Clock) -> ModelResult<()> {
        self.updated = clock.now();
        store.write_fragment(&self.record())?;
        Ok(())
    }

    /// Fetch the payload bytes.
    ///
    /// A missing pair surfaces as [`ModelError::NotFound`]; any other
    /// backend failure is wrapped as [`ModelError::DataUnavailable`].
    pub fn get_data(&self, store: &dyn FragmentStore) -> ModelResult<Vec<u8>> {
        debug!(id = %self.id, "get_data called for fragment");
        store
            .read_fragment_data(&self.owner_id, &self.id)
            .map_err(|err| match err {
                StoreError::NoData { owner, id } | StoreError::NoFragment { owner, id } => {
                    ModelError::NotFound { owner, id }
                }
                other => ModelError::DataUnavailable(other),
            })
    }

    /// Replace the payload bytes.
    ///
    /// Recomputes `size` from the input (the only path that changes it),
    /// saves the metadata, then writes the payload. Metadata-then-data is a
    /// required order, not a transaction. The declared type is never altered
    /// by this call.
    pub fn set_data(
        &mut self,
        store: &dyn FragmentStore,
        clock: &dyn Clock,
        data: &[u8],
    ) -> ModelResult<()> {
        self.size = data.len() as u64;
        self.save(store, clock)?;
        store.write_fragment_data(&self.owner_id, &self.id, data)?;
        info!(id = %self.id, size = self.size, "data saved for fragment");
        Ok(())
    }

    /// Replace the payload bytes on behalf of a caller that re-declares the
    /// content type, as update requests do.
    ///
    /// The supplied type must equal the declared type exactly; otherwise the
    /// call fails with [`ModelError::TypeImmutable`] before touching any
    /// state.
    pub fn replace_data(
        &mut self,
        store: &dyn FragmentStore,
        clock: &dyn Clock,
        supplied_type: &str,
        data: &[u8],
    ) -> ModelResult<()> {
        let declared = self.content_type.to_string();
        if supplied_type != declared {
            return Err(ModelError::TypeImmutable {
                declared,
                supplied: supplied_type.to_string(),
            });
        }
        self.set_data(store, clock, data)
    }

    /// Convert the payload into the representation named by `target` (a file
    /// extension or full `type/subtype` string), using this fragment's
    /// declared type as the source.
    pub fn convert_to(
        &self,
        engine: &ConversionEngine,
        data: &[u8],
        target: &str,
    ) -> ModelResult<Vec<u8>> {
        Ok(engine.convert(data, self.media_type(), target)?)
    }

    /// The fragment's unique identifier.
    pub fn id(&self) -> &FragmentId {
        &self.id
    }

    /// The owning principal.
    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    /// The declared content type, immutable after creation.
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// The bare media type, parameters stripped.
    pub fn media_type(&self) -> MediaType {
        self.content_type.media_type()
    }

    /// Returns `true` if the declared type is a `text/*` type.
    pub fn is_text(&self) -> bool {
        self.media_type().is_text()
    }

    /// The media types this fragment can be converted into, self included.
    pub fn formats(&self) -> &'static [MediaType] {
        self.media_type().conversion_targets()
    }

    /// Byte length of the payload as of the last data write.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Creation timestamp, set once.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Timestamp of the last metadata save.
    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// Rehydrate from a stored metadata record. Records were validated on
    /// the way in, so this conversion is infallible.
    pub fn from_record(record: FragmentRecord) -> Self {
        Self {
            id: record.id,
            owner_id: record.owner_id,
            content_type: record.content_type,
            size: record.size,
            created: record.created,
            updated: record.updated,
        }
    }

    /// The persisted shape of this fragment.
    pub fn record(&self) -> FragmentRecord {
        FragmentRecord {
            id: self.id,
            owner_id: self.owner_id.clone(),
            content_type: self.content_type,
            size: self.size,
            created: self.created,
            updated: self.updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use frag_convert::ConvertError;
    use frag_store::{InMemoryFragmentStore, StoreResult};
    use frag_types::ManualClock;
    use proptest::prelude::*;

    fn clock() -> ManualClock {
        ManualClock::at_epoch()
    }

    fn markdown_fragment(clock: &ManualClock) -> Fragment {
        Fragment::build(FragmentDraft::new("owner-a", "text/markdown"), clock).unwrap()
    }

    #[test]
    fn build_rejects_unsupported_type() {
        let err =
            Fragment::build(FragmentDraft::new("owner-a", "application/pdf"), &clock()).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn build_rejects_empty_type() {
        let err = Fragment::build(FragmentDraft::new("owner-a", ""), &clock()).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn build_rejects_empty_owner() {
        let err = Fragment::build(FragmentDraft::new("", "text/plain"), &clock()).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn build_generates_id_and_stamps_timestamps() {
        let clock = clock();
        clock.advance(Duration::seconds(100));
        let fragment = markdown_fragment(&clock);
        assert_eq!(fragment.created(), clock.now());
        assert_eq!(fragment.updated(), clock.now());
        assert_eq!(fragment.size(), 0);
    }

    #[test]
    fn build_keeps_supplied_id_and_timestamps() {
        let clock = clock();
        let id = FragmentId::generate();
        let created = clock.now() - Duration::days(2);
        let updated = clock.now() - Duration::days(1);
        let fragment = Fragment::build(
            FragmentDraft {
                id: Some(id),
                owner_id: "owner-a".into(),
                content_type: "image/png".into(),
                created: Some(created),
                updated: Some(updated),
                size: Some(7),
            },
            &clock,
        )
        .unwrap();
        assert_eq!(*fragment.id(), id);
        assert_eq!(fragment.created(), created);
        assert_eq!(fragment.updated(), updated);
        assert_eq!(fragment.size(), 7);
    }

    #[test]
    fn derived_type_accessors() {
        let clock = clock();
        let fragment =
            Fragment::build(FragmentDraft::new("owner-a", "text/plain; charset=utf-8"), &clock)
                .unwrap();
        assert_eq!(fragment.content_type().to_string(), "text/plain; charset=utf-8");
        assert_eq!(fragment.media_type(), MediaType::TextPlain);
        assert!(fragment.is_text());
        assert_eq!(fragment.formats(), &[MediaType::TextPlain]);

        let json =
            Fragment::build(FragmentDraft::new("owner-a", "application/json"), &clock).unwrap();
        assert!(!json.is_text());
        assert_eq!(
            json.formats(),
            &[MediaType::ApplicationJson, MediaType::TextPlain]
        );
    }

    #[test]
    fn save_then_lookup_round_trips() {
        let store = InMemoryFragmentStore::new();
        let clock = clock();
        let mut fragment = markdown_fragment(&clock);
        fragment.save(&store, &clock).unwrap();

        let found = Fragment::by_id(&store, fragment.owner_id(), fragment.id()).unwrap();
        assert_eq!(found, fragment);
    }

    #[test]
    fn lookup_of_unknown_pair_is_not_found() {
        let store = InMemoryFragmentStore::new();
        let owner = OwnerId::new("owner-a").unwrap();
        let err = Fragment::by_id(&store, &owner, &FragmentId::generate()).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn lookup_never_crosses_owners() {
        let store = InMemoryFragmentStore::new();
        let clock = clock();
        let mut fragment = markdown_fragment(&clock);
        fragment.save(&store, &clock).unwrap();

        let other = OwnerId::new("owner-b").unwrap();
        let err = Fragment::by_id(&store, &other, fragment.id()).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn set_data_recomputes_size_and_bumps_updated() {
        let store = InMemoryFragmentStore::new();
        let clock = clock();
        let mut fragment = markdown_fragment(&clock);
        fragment.save(&store, &clock).unwrap();
        let before = fragment.updated();

        clock.advance(Duration::seconds(30));
        fragment.set_data(&store, &clock, b"# Hello").unwrap();

        assert_eq!(fragment.size(), 7);
        assert!(fragment.updated() > before);
        assert_eq!(fragment.get_data(&store).unwrap(), b"# Hello");

        // The stored record observed the same write.
        let found = Fragment::by_id(&store, fragment.owner_id(), fragment.id()).unwrap();
        assert_eq!(found.size(), 7);
        assert_eq!(found.updated(), fragment.updated());
    }

    #[test]
    fn set_data_never_changes_the_declared_type() {
        let store = InMemoryFragmentStore::new();
        let clock = clock();
        let mut fragment = markdown_fragment(&clock);
        let declared = *fragment.content_type();

        for payload in [&b"one"[..], b"{\"not\": \"markdown\"}", b""] {
            fragment.set_data(&store, &clock, payload).unwrap();
            fragment.save(&store, &clock).unwrap();
            assert_eq!(*fragment.content_type(), declared);
        }
    }

    #[test]
    fn save_refreshes_updated_without_touching_data() {
        let store = InMemoryFragmentStore::new();
        let clock = clock();
        let mut fragment = markdown_fragment(&clock);
        fragment.set_data(&store, &clock, b"payload").unwrap();

        clock.advance(Duration::seconds(5));
        let before = fragment.updated();
        fragment.save(&store, &clock).unwrap();
        assert!(fragment.updated() > before);
        assert_eq!(fragment.get_data(&store).unwrap(), b"payload");
    }

    #[test]
    fn replace_data_rejects_a_different_type() {
        let store = InMemoryFragmentStore::new();
        let clock = clock();
        let mut fragment = markdown_fragment(&clock);
        fragment.set_data(&store, &clock, b"# Hi").unwrap();
        let size = fragment.size();
        let updated = fragment.updated();

        clock.advance(Duration::seconds(10));
        let err = fragment
            .replace_data(&store, &clock, "text/plain", b"plain now")
            .unwrap_err();
        assert!(matches!(err, ModelError::TypeImmutable { .. }));
        // Nothing moved.
        assert_eq!(fragment.size(), size);
        assert_eq!(fragment.updated(), updated);
        assert_eq!(fragment.get_data(&store).unwrap(), b"# Hi");
    }

    #[test]
    fn replace_data_with_the_declared_type_succeeds() {
        let store = InMemoryFragmentStore::new();
        let clock = clock();
        let mut fragment = markdown_fragment(&clock);
        fragment.set_data(&store, &clock, b"v1").unwrap();
        fragment
            .replace_data(&store, &clock, "text/markdown", b"v2 longer")
            .unwrap();
        assert_eq!(fragment.size(), 9);
        assert_eq!(fragment.get_data(&store).unwrap(), b"v2 longer");
    }

    #[test]
    fn delete_is_terminal() {
        let store = InMemoryFragmentStore::new();
        let clock = clock();
        let mut fragment = markdown_fragment(&clock);
        fragment.set_data(&store, &clock, b"bytes").unwrap();

        Fragment::delete(&store, fragment.owner_id(), fragment.id()).unwrap();

        let err = Fragment::by_id(&store, fragment.owner_id(), fragment.id()).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
        let err = fragment.get_data(&store).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
        let err = Fragment::delete(&store, fragment.owner_id(), fragment.id()).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn by_owner_lists_ids_or_records() {
        let store = InMemoryFragmentStore::new();
        let clock = clock();
        let mut fragment = markdown_fragment(&clock);
        fragment.save(&store, &clock).unwrap();
        let owner = fragment.owner_id().clone();

        match Fragment::by_owner(&store, &owner, false).unwrap() {
            FragmentListing::Ids(ids) => assert_eq!(ids, vec![*fragment.id()]),
            other => panic!("expected ids, got {other:?}"),
        }
        match Fragment::by_owner(&store, &owner, true).unwrap() {
            FragmentListing::Records(records) => {
                assert_eq!(records, vec![fragment.record()]);
            }
            other => panic!("expected records, got {other:?}"),
        }
    }

    #[test]
    fn record_round_trip() {
        let fragment = markdown_fragment(&clock());
        assert_eq!(Fragment::from_record(fragment.record()), fragment);
    }

    /// A store whose payload reads always fail at the backend.
    struct BrokenDataStore(InMemoryFragmentStore);

    impl FragmentStore for BrokenDataStore {
        fn write_fragment(&self, record: &FragmentRecord) -> StoreResult<()> {
            self.0.write_fragment(record)
        }
        fn read_fragment(
            &self,
            owner: &OwnerId,
            id: &FragmentId,
        ) -> StoreResult<Option<FragmentRecord>> {
            self.0.read_fragment(owner, id)
        }
        fn write_fragment_data(
            &self,
            owner: &OwnerId,
            id: &FragmentId,
            data: &[u8],
        ) -> StoreResult<()> {
            self.0.write_fragment_data(owner, id, data)
        }
        fn read_fragment_data(&self, _: &OwnerId, _: &FragmentId) -> StoreResult<Vec<u8>> {
            Err(StoreError::Backend("connection reset".into()))
        }
        fn list_fragments(&self, owner: &OwnerId, expand: bool) -> StoreResult<FragmentListing> {
            self.0.list_fragments(owner, expand)
        }
        fn delete_fragment(&self, owner: &OwnerId, id: &FragmentId) -> StoreResult<()> {
            self.0.delete_fragment(owner, id)
        }
    }

    #[test]
    fn backend_read_failures_surface_as_data_unavailable() {
        let store = BrokenDataStore(InMemoryFragmentStore::new());
        let clock = clock();
        let mut fragment = markdown_fragment(&clock);
        fragment.set_data(&store, &clock, b"bytes").unwrap();

        let err = fragment.get_data(&store).unwrap_err();
        assert!(matches!(err, ModelError::DataUnavailable(_)));
    }

    #[test]
    fn markdown_fragment_converts_end_to_end() {
        let store = InMemoryFragmentStore::new();
        let clock = clock();
        let engine = ConversionEngine::new();
        let mut fragment = markdown_fragment(&clock);
        fragment.set_data(&store, &clock, b"# Hi").unwrap();

        let data = fragment.get_data(&store).unwrap();
        let html = fragment.convert_to(&engine, &data, "html").unwrap();
        assert!(String::from_utf8(html).unwrap().contains("<h1>Hi</h1>"));

        let plain = fragment.convert_to(&engine, &data, "txt").unwrap();
        assert_eq!(plain, b"# Hi");
    }

    #[test]
    fn json_fragment_flattens_end_to_end() {
        let store = InMemoryFragmentStore::new();
        let clock = clock();
        let engine = ConversionEngine::new();
        let mut fragment =
            Fragment::build(FragmentDraft::new("owner-a", "application/json"), &clock).unwrap();
        fragment
            .set_data(&store, &clock, br#"{"a":"1","b":"2"}"#)
            .unwrap();

        let data = fragment.get_data(&store).unwrap();
        let plain = fragment.convert_to(&engine, &data, "txt").unwrap();
        assert_eq!(plain, b"a: 1, b: 2");
    }

    #[test]
    fn png_fragment_reencodes_to_jpeg_end_to_end() {
        use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
        use std::io::Cursor;

        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(5, 2, Rgba([10, 200, 30, 255])))
            .write_to(&mut png, ImageFormat::Png)
            .unwrap();
        let png = png.into_inner();

        let store = InMemoryFragmentStore::new();
        let clock = clock();
        let engine = ConversionEngine::new();
        let mut fragment =
            Fragment::build(FragmentDraft::new("owner-a", "image/png"), &clock).unwrap();
        fragment.set_data(&store, &clock, &png).unwrap();

        let data = fragment.get_data(&store).unwrap();
        let jpeg = fragment.convert_to(&engine, &data, "jpg").unwrap();
        let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 2));
    }

    #[test]
    fn unknown_extension_fails_for_any_fragment() {
        let clock = clock();
        let engine = ConversionEngine::new();
        for content_type in ContentType::SUPPORTED {
            let fragment =
                Fragment::build(FragmentDraft::new("owner-a", content_type), &clock).unwrap();
            let err = fragment.convert_to(&engine, b"irrelevant", "pdf").unwrap_err();
            assert!(
                matches!(err, ModelError::Convert(ConvertError::UnknownTarget(_))),
                "{content_type}: expected unknown target, got {err:?}"
            );
        }
    }

    #[test]
    fn one_directional_conversion_is_enforced_through_the_entity() {
        let clock = clock();
        let engine = ConversionEngine::new();
        let html =
            Fragment::build(FragmentDraft::new("owner-a", "text/html"), &clock).unwrap();
        let err = html.convert_to(&engine, b"<p>hi</p>", "md").unwrap_err();
        assert!(matches!(
            err,
            ModelError::Convert(ConvertError::UnsupportedConversion { .. })
        ));
    }

    proptest! {
        #[test]
        fn size_always_equals_the_last_written_length(payload in proptest::collection::vec(any::<u8>(), 0..512)) {
            let store = InMemoryFragmentStore::new();
            let clock = ManualClock::at_epoch();
            let mut fragment =
                Fragment::build(FragmentDraft::new("owner-a", "text/plain"), &clock).unwrap();
            fragment.set_data(&store, &clock, &payload).unwrap();
            prop_assert_eq!(fragment.size(), payload.len() as u64);
            prop_assert_eq!(fragment.get_data(&store).unwrap(), payload);
        }
    }
}

use std::fmt;
use std::sync::Arc;

use cairn_crypto::{Suite, ZoneKeys};
use cairn_store::Accessor;
use cairn_tree::{
    list_snapshots, FileSize, Node, ObjectReader, ObjectWriter, Snapshot, TreeError, TreeResult,
};
use cairn_types::{shard_namespace, ContentId};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{ZoneError, ZoneResult};
use crate::identity::{PrivateKey, PublicKey};
use crate::root_pointer::{self, RootPointer, ROOT_POINTER_KEY};

/// The snapshot a zone currently points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Head {
    pub id: ContentId,
    pub snapshot: Snapshot,
}

/// Byte counters of a zone since it was created or opened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZoneStats {
    /// Plaintext bytes encrypted into new objects.
    pub written: u64,
    /// Bytes saved by compression.
    pub saved: u64,
}

impl ZoneStats {
    /// Saved bytes as a percentage of written bytes.
    pub fn saved_percent(&self) -> f64 {
        if self.written == 0 {
            0.0
        } else {
            self.saved as f64 / self.written as f64 * 100.0
        }
    }
}

/// An encrypted, deduplicating object namespace.
///
/// Objects are addressed by a keyed hash of their plaintext and stored
/// encrypted under `{name}/objects/{b0}/{b1}/{rest}`. The current head
/// snapshot is published through the root pointer at `{name}/RootPointer`.
pub struct Zone {
    name: String,
    persistence: Arc<dyn Accessor>,
    keys: ZoneKeys,
    head: Option<Head>,
    stats: ZoneStats,
}

fn now_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

impl Zone {
    fn with_secret(
        persistence: Arc<dyn Accessor>,
        name: &str,
        secret: &[u8],
    ) -> ZoneResult<Self> {
        Ok(Self {
            name: name.to_string(),
            persistence,
            keys: ZoneKeys::new(secret, Suite::default())?,
            head: None,
            stats: ZoneStats::default(),
        })
    }

    /// Create a zone with a fresh random secret.
    ///
    /// An empty root pointer is published so the zone can be reopened
    /// before the first snapshot. Add at least one identity, or the zone
    /// can never be opened again.
    pub fn create(persistence: Arc<dyn Accessor>, name: &str) -> ZoneResult<Self> {
        let secret = ZoneKeys::generate_secret(Suite::default())?;
        let zone = Self::with_secret(persistence, name, &secret)?;
        zone.set_root_pointer(&ContentId::undefined())?;
        info!(zone = %zone.name, suite = %zone.keys.suite(), "created zone");
        Ok(zone)
    }

    /// Open a zone with the first key that unlocks it, and resolve its head.
    pub fn open(
        persistence: Arc<dyn Accessor>,
        name: &str,
        keys: &[&dyn PrivateKey],
    ) -> ZoneResult<Self> {
        let identities = identities_namespace(name);
        for key in keys {
            let key_id = key.id();
            let wrapped = match persistence.get(&identities, &key_id) {
                Ok(wrapped) => wrapped,
                Err(e) if e.is_not_found() => {
                    debug!(zone = name, key = %key_id, "no identity for key");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let secret = match key.decrypt(&wrapped) {
                Ok(secret) => secret,
                Err(e) => {
                    debug!(zone = name, key = %key_id, error = %e, "key failed to unwrap zone secret");
                    continue;
                }
            };
            let mut zone = Self::with_secret(persistence, name, &secret)?;
            zone.load_head()?;
            info!(
                zone = name,
                key = %key_id,
                head = ?zone.head.as_ref().map(|h| h.id.to_string()),
                "opened zone"
            );
            return Ok(zone);
        }
        Err(ZoneError::NoKeyForZone(name.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn suite(&self) -> Suite {
        self.keys.suite()
    }

    pub fn head(&self) -> Option<&Head> {
        self.head.as_ref()
    }

    pub fn stats(&self) -> ZoneStats {
        self.stats
    }

    pub fn persistence(&self) -> &Arc<dyn Accessor> {
        &self.persistence
    }

    /// The ID `data` has (or would have) in this zone.
    pub fn id_of(&self, data: &[u8]) -> ContentId {
        self.keys.content_id(data)
    }

    fn object_location(&self, id: &ContentId) -> ZoneResult<(String, String)> {
        let shard = id.shard()?;
        Ok((shard.namespace(&self.name), shard.leaf))
    }

    /// Read and decrypt the object stored under `id`.
    pub fn read(&self, id: &ContentId) -> ZoneResult<Vec<u8>> {
        let (namespace, key) = self.object_location(id)?;
        let data = self.persistence.get(&namespace, &key).map_err(|e| {
            if e.is_not_found() {
                ZoneError::NotFound(id.clone())
            } else {
                ZoneError::Store(e)
            }
        })?;
        Ok(self.keys.open(&data)?)
    }

    /// Encrypt and store `data`, returning its ID.
    ///
    /// An object that already exists is not rewritten and does not count
    /// towards the zone's byte counters.
    pub fn write(&mut self, data: &[u8]) -> ZoneResult<ContentId> {
        let id = self.keys.content_id(data);
        let (namespace, key) = self.object_location(&id)?;
        if self.persistence.exists(&namespace, &key)? {
            return Ok(id);
        }
        let sealed = self.keys.seal(data)?;
        self.persistence.set(&namespace, &key, &sealed.data)?;
        self.stats.written += data.len() as u64;
        self.stats.saved += sealed.saved;
        Ok(id)
    }

    /// Store the zone secret wrapped for `key`.
    pub fn add_identity(&self, key: &dyn PublicKey) -> ZoneResult<()> {
        let wrapped = key.encrypt(self.keys.secret())?;
        let key_id = key.id();
        self.persistence
            .set(&identities_namespace(&self.name), &key_id, &wrapped)?;
        info!(zone = %self.name, key = %key_id, "added identity");
        Ok(())
    }

    /// Publish `id` as the zone's root.
    pub fn set_root_pointer(&self, id: &ContentId) -> ZoneResult<()> {
        let ptr = RootPointer::new(id.clone(), now_nanos(), &self.keys)?;
        let blob = root_pointer::encode_blob(&ptr)?;
        self.persistence.set(&self.name, ROOT_POINTER_KEY, &blob)?;
        debug!(zone = %self.name, root = %id, timestamp = ptr.timestamp, "published root pointer");
        Ok(())
    }

    /// Resolve the head through the root pointer, scanning the object
    /// store when the pointer is missing, corrupt or dangling.
    fn load_head(&mut self) -> ZoneResult<()> {
        let data = match self.persistence.get(&self.name, ROOT_POINTER_KEY) {
            Ok(data) => data,
            Err(e) => {
                warn!(zone = %self.name, error = %e, "root pointer unreadable");
                return self.brute_force_head();
            }
        };
        let Some(ptr) = root_pointer::select(&data, &self.keys) else {
            warn!(zone = %self.name, "no valid root pointer copy");
            return self.brute_force_head();
        };
        if ptr.pointer.is_undefined() {
            self.head = None;
            return Ok(());
        }

        let node = match self
            .read(&ptr.pointer)
            .and_then(|data| Ok(Node::deserialize(&data)?))
        {
            Ok(node) => node,
            Err(e @ ZoneError::Store(_)) => return Err(e),
            Err(e) => {
                warn!(zone = %self.name, root = %ptr.pointer, error = %e, "root snapshot unreadable");
                return self.brute_force_head();
            }
        };
        match node {
            Node::Snapshot(snapshot) => {
                self.head = Some(Head {
                    id: ptr.pointer,
                    snapshot,
                });
                Ok(())
            }
            other => Err(ZoneError::CorruptRoot {
                id: ptr.pointer,
                actual: other.node_type(),
            }),
        }
    }

    /// Find the newest snapshot object by scanning every shard, then
    /// republish it as the root.
    fn brute_force_head(&mut self) -> ZoneResult<()> {
        warn!(zone = %self.name, "scanning object store for the latest snapshot");
        let mut best: Option<Head> = None;
        let mut scanned = 0usize;

        for b0 in 0..=u8::MAX {
            for b1 in 0..=u8::MAX {
                let prefix = [b0, b1];
                let namespace = shard_namespace(&self.name, prefix);
                let objects = match self.persistence.get_all(&namespace) {
                    Ok(objects) => objects,
                    Err(e) if e.is_not_found() => continue,
                    Err(e) => return Err(e.into()),
                };
                for (leaf, blob) in objects {
                    scanned += 1;
                    let snapshot = match self
                        .keys
                        .open(&blob)
                        .map_err(ZoneError::from)
                        .and_then(|data| Ok(Node::deserialize(&data)?))
                    {
                        Ok(Node::Snapshot(snapshot)) => snapshot,
                        Ok(_) => continue,
                        Err(e) => {
                            debug!(namespace = %namespace, key = %leaf, error = %e, "skipping object");
                            continue;
                        }
                    };
                    if best
                        .as_ref()
                        .is_some_and(|b| snapshot.timestamp <= b.snapshot.timestamp)
                    {
                        continue;
                    }
                    match ContentId::from_shard(prefix, &leaf) {
                        Ok(id) => best = Some(Head { id, snapshot }),
                        Err(e) => {
                            debug!(namespace = %namespace, key = %leaf, error = %e, "skipping object")
                        }
                    }
                }
            }
        }

        let Some(head) = best else {
            return Err(ZoneError::NoRootFound);
        };
        info!(zone = %self.name, scanned, head = %head.id, "recovered head snapshot");
        if let Err(e) = self.set_root_pointer(&head.id) {
            warn!(zone = %self.name, error = %e, "failed to rewrite root pointer");
        }
        self.head = Some(head);
        Ok(())
    }

    /// Record a new snapshot of `root` on top of the current head and
    /// publish it.
    ///
    /// Returns `None` without writing anything when `root` is already the
    /// head's root.
    pub fn commit(&mut self, root: &ContentId, size: FileSize) -> ZoneResult<Option<ContentId>> {
        if self.head.as_ref().is_some_and(|h| &h.snapshot.root == root) {
            debug!(zone = %self.name, root = %root, "no changes");
            return Ok(None);
        }
        let (parent, timestamp) = match &self.head {
            // Snapshot times never go backwards along a chain.
            Some(h) => (
                h.id.clone(),
                now_nanos().max(h.snapshot.timestamp.saturating_add(1)),
            ),
            None => (ContentId::undefined(), now_nanos()),
        };
        let snapshot = Snapshot::new(timestamp, size, root.clone(), parent);
        let id = self.write(&Node::from(snapshot.clone()).serialize()?)?;
        self.head = Some(Head {
            id: id.clone(),
            snapshot,
        });
        self.set_root_pointer(&id)?;
        info!(zone = %self.name, snapshot = %id, root = %root, "committed snapshot");
        Ok(Some(id))
    }

    /// Snapshot history from the head, newest first.
    pub fn snapshots(&self) -> ZoneResult<Vec<(ContentId, Snapshot)>> {
        match &self.head {
            Some(head) => Ok(list_snapshots(&head.id, self)?),
            None => Ok(Vec::new()),
        }
    }
}

fn identities_namespace(zone: &str) -> String {
    format!("{zone}/identities")
}

impl fmt::Debug for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zone")
            .field("name", &self.name)
            .field("suite", &self.keys.suite())
            .field("head", &self.head.as_ref().map(|h| &h.id))
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl ObjectReader for Zone {
    fn read(&self, id: &ContentId) -> TreeResult<Vec<u8>> {
        Zone::read(self, id).map_err(TreeError::storage)
    }
}

impl ObjectWriter for Zone {
    fn write(&mut self, data: &[u8]) -> TreeResult<ContentId> {
        Zone::write(self, data).map_err(TreeError::storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::testing::TagKey;
    use cairn_codec::{from_bytes, to_bytes};
    use cairn_crypto::CryptoError;
    use cairn_store::{InMemoryAccessor, StoreError, StoreResult};
    use cairn_tree::{write_bytes, Directory, FileMode};
    use std::collections::HashMap;
    use std::io::{self, Read};
    use std::sync::Mutex;

    const ALICE: TagKey = TagKey("alice");

    fn new_zone(store: &Arc<InMemoryAccessor>) -> Zone {
        let zone = Zone::create(store.clone(), "home").unwrap();
        zone.add_identity(&ALICE).unwrap();
        zone
    }

    fn reopen(store: &Arc<InMemoryAccessor>) -> ZoneResult<Zone> {
        let key: &dyn PrivateKey = &ALICE;
        Zone::open(store.clone(), "home", &[key])
    }

    fn dir_with(zone: &mut Zone, name: &str) -> ContentId {
        let file = write_bytes(zone, name.as_bytes()).unwrap();
        let mut dir = Directory::new();
        dir.add_entry(name, FileMode::file(0o644), 0, file);
        zone.write(&Node::from(dir).serialize().unwrap()).unwrap()
    }

    fn object_count(store: &InMemoryAccessor) -> usize {
        store
            .namespaces()
            .iter()
            .filter(|ns| ns.starts_with("home/objects/"))
            .map(|ns| store.get_all(ns).unwrap().len())
            .sum()
    }

    fn stored_object(store: &InMemoryAccessor, id: &ContentId) -> (String, String, Vec<u8>) {
        let shard = id.shard().unwrap();
        let ns = shard.namespace("home");
        let data = store.get(&ns, &shard.leaf).unwrap();
        (ns, shard.leaf, data)
    }

    #[test]
    fn fresh_zone_reopens_without_head() {
        let store = Arc::new(InMemoryAccessor::new());
        let created = new_zone(&store);
        assert!(created.head().is_none());

        let zone = reopen(&store).unwrap();
        assert!(zone.head().is_none());
        assert_eq!(zone.name(), "home");
        assert!(zone.snapshots().unwrap().is_empty());
    }

    #[test]
    fn reopened_zone_shares_ids() {
        let store = Arc::new(InMemoryAccessor::new());
        let mut zone = new_zone(&store);
        let id = zone.write(b"shared plaintext").unwrap();

        let reopened = reopen(&store).unwrap();
        assert_eq!(reopened.id_of(b"shared plaintext"), id);
        assert_eq!(reopened.read(&id).unwrap(), b"shared plaintext");
    }

    #[test]
    fn zones_scope_ids() {
        let store = Arc::new(InMemoryAccessor::new());
        let a = Zone::create(store.clone(), "a").unwrap();
        let b = Zone::create(store.clone(), "b").unwrap();
        assert_ne!(a.id_of(b"same"), b.id_of(b"same"));
    }

    #[test]
    fn identical_writes_are_deduplicated() {
        let store = Arc::new(InMemoryAccessor::new());
        let mut zone = new_zone(&store);
        let data = vec![b'x'; 10_000];

        let first = zone.write(&data).unwrap();
        let after_first = zone.stats();
        let second = zone.write(&data).unwrap();

        assert_eq!(first, second);
        assert_eq!(object_count(&store), 1);
        assert_eq!(zone.stats(), after_first);
        assert_eq!(after_first.written, 10_000);
        assert!(after_first.saved > 9_000);
        assert!(after_first.saved_percent() > 90.0);
    }

    #[test]
    fn objects_are_stored_encrypted_at_shard_path() {
        let store = Arc::new(InMemoryAccessor::new());
        let mut zone = new_zone(&store);
        let id = zone.write(b"plaintext marker").unwrap();

        let (ns, leaf, blob) = stored_object(&store, &id);
        let bytes = id.as_bytes();
        assert_eq!(ns, format!("home/objects/{:02x}/{:02x}", bytes[0], bytes[1]));
        assert_eq!(leaf, hex_tail(&id));
        assert!(!blob.windows(6).any(|w| w == b"marker"));
    }

    fn hex_tail(id: &ContentId) -> String {
        id.to_hex()[4..].to_string()
    }

    #[test]
    fn missing_object_is_not_found() {
        let store = Arc::new(InMemoryAccessor::new());
        let zone = new_zone(&store);
        let id = ContentId::new(vec![5; 32]);
        assert!(matches!(zone.read(&id), Err(ZoneError::NotFound(missing)) if missing == id));
    }

    #[test]
    fn tampered_object_fails_integrity() {
        let store = Arc::new(InMemoryAccessor::new());
        let mut zone = new_zone(&store);
        let id = zone.write(b"do not touch").unwrap();

        let (ns, leaf, mut blob) = stored_object(&store, &id);
        blob[20] ^= 0x01;
        store.set(&ns, &leaf, &blob).unwrap();
        assert!(matches!(
            zone.read(&id),
            Err(ZoneError::Crypto(CryptoError::IntegrityError))
        ));
    }

    #[test]
    fn unknown_key_cannot_open() {
        let store = Arc::new(InMemoryAccessor::new());
        new_zone(&store);
        let mallory: &dyn PrivateKey = &TagKey("mallory");
        let err = Zone::open(store.clone(), "home", &[mallory]).unwrap_err();
        assert!(matches!(err, ZoneError::NoKeyForZone(name) if name == "home"));
    }

    #[test]
    fn second_key_unlocks_when_first_does_not() {
        let store = Arc::new(InMemoryAccessor::new());
        let zone = new_zone(&store);
        let bob = TagKey("bob");
        zone.add_identity(&bob).unwrap();
        let mallory = TagKey("mallory");
        let keys: [&dyn PrivateKey; 2] = [&mallory, &bob];
        assert!(Zone::open(store.clone(), "home", &keys).is_ok());
    }

    #[test]
    fn commit_builds_a_snapshot_chain() {
        let store = Arc::new(InMemoryAccessor::new());
        let mut zone = new_zone(&store);

        let mut ids = Vec::new();
        for name in ["one", "two", "three"] {
            let root = dir_with(&mut zone, name);
            let size = FileSize(zone.stats().written as i64);
            ids.push(zone.commit(&root, size).unwrap().unwrap());
        }

        let history = zone.snapshots().unwrap();
        assert_eq!(history.len(), 3);
        let listed: Vec<ContentId> = history.iter().map(|(id, _)| id.clone()).collect();
        ids.reverse();
        assert_eq!(listed, ids);
        assert!(history[2].1.parent.is_undefined());
        assert_eq!(history[0].1.parent, ids[1]);

        let reopened = reopen(&store).unwrap();
        assert_eq!(reopened.head().unwrap().id, ids[0]);
        assert_eq!(reopened.snapshots().unwrap().len(), 3);
    }

    #[test]
    fn unchanged_root_is_not_committed() {
        let store = Arc::new(InMemoryAccessor::new());
        let mut zone = new_zone(&store);
        let root = dir_with(&mut zone, "same");
        let first = zone.commit(&root, FileSize(0)).unwrap();
        assert!(first.is_some());
        let objects = object_count(&store);

        assert_eq!(zone.commit(&root, FileSize(0)).unwrap(), None);
        assert_eq!(object_count(&store), objects);
        assert_eq!(zone.head().unwrap().id, first.unwrap());
    }

    fn committed_zone(store: &Arc<InMemoryAccessor>, count: usize) -> Vec<ContentId> {
        let mut zone = new_zone(store);
        (0..count)
            .map(|i| {
                let root = dir_with(&mut zone, &format!("file-{i}"));
                zone.commit(&root, FileSize(0)).unwrap().unwrap()
            })
            .collect()
    }

    fn root_blob(store: &InMemoryAccessor) -> Vec<u8> {
        store.get("home", ROOT_POINTER_KEY).unwrap()
    }

    #[test]
    fn one_corrupt_copy_is_tolerated() {
        let store = Arc::new(InMemoryAccessor::new());
        let ids = committed_zone(&store, 2);

        let mut blob = root_blob(&store);
        for b in &mut blob[..64] {
            *b ^= 0xa5;
        }
        store.set("home", ROOT_POINTER_KEY, &blob).unwrap();

        let zone = reopen(&store).unwrap();
        assert_eq!(zone.head().unwrap().id, ids[1]);
    }

    #[test]
    fn both_copies_corrupt_recovers_latest_snapshot() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let store = Arc::new(InMemoryAccessor::new());
        let ids = committed_zone(&store, 3);
        store.set("home", ROOT_POINTER_KEY, b"garbage").unwrap();

        let zone = reopen(&store).unwrap();
        assert_eq!(zone.head().unwrap().id, ids[2]);
        assert_eq!(zone.snapshots().unwrap().len(), 3);

        // The pointer was rewritten, so it now verifies on its own.
        let keys = &zone.keys;
        let ptr = root_pointer::select(&root_blob(&store), keys).unwrap();
        assert_eq!(ptr.pointer, ids[2]);
        assert_eq!(reopen(&store).unwrap().head().unwrap().id, ids[2]);
    }

    #[test]
    fn copy_with_bad_digest_yields_to_the_other() {
        let store = Arc::new(InMemoryAccessor::new());
        let ids = committed_zone(&store, 2);
        let keys = reopen(&store).unwrap().keys;

        // Copy 1 is newer but its digest no longer matches.
        let newer = RootPointer::new(ids[1].clone(), i64::MAX, &keys).unwrap();
        let mut first = to_bytes(&newer).unwrap();
        let last = first.len() - 1;
        first[last] ^= 0x01;
        let (decoded, _) = from_bytes::<RootPointer>(&first).unwrap();
        assert!(!decoded.verify(&keys));

        let older = RootPointer::new(ids[0].clone(), 1, &keys).unwrap();
        let mut blob = vec![0u8; root_pointer::ROOT_DISTANCE];
        blob[..first.len()].copy_from_slice(&first);
        blob.extend_from_slice(&to_bytes(&older).unwrap());
        store.set("home", ROOT_POINTER_KEY, &blob).unwrap();

        let zone = reopen(&store).unwrap();
        assert_eq!(zone.head().unwrap().id, ids[0]);
    }

    /// Accessor that fails with an I/O error on reads of one namespace.
    struct FlakyAccessor {
        inner: Arc<InMemoryAccessor>,
        broken: Mutex<Option<String>>,
    }

    impl FlakyAccessor {
        fn new(inner: Arc<InMemoryAccessor>, namespace: String) -> Self {
            Self {
                inner,
                broken: Mutex::new(Some(namespace)),
            }
        }

        fn heal(&self) {
            *self.broken.lock().unwrap() = None;
        }

        fn check(&self, namespace: &str) -> StoreResult<()> {
            if self.broken.lock().unwrap().as_deref() == Some(namespace) {
                return Err(io::Error::new(io::ErrorKind::Other, "disk unavailable").into());
            }
            Ok(())
        }
    }

    impl Accessor for FlakyAccessor {
        fn exists(&self, namespace: &str, key: &str) -> StoreResult<bool> {
            self.inner.exists(namespace, key)
        }

        fn get(&self, namespace: &str, key: &str) -> StoreResult<Vec<u8>> {
            self.check(namespace)?;
            self.inner.get(namespace, key)
        }

        fn get_all(&self, namespace: &str) -> StoreResult<HashMap<String, Vec<u8>>> {
            self.check(namespace)?;
            self.inner.get_all(namespace)
        }

        fn set(&self, namespace: &str, key: &str, value: &[u8]) -> StoreResult<()> {
            self.inner.set(namespace, key, value)
        }
    }

    #[test]
    fn storage_error_during_scan_aborts_open() {
        let store = Arc::new(InMemoryAccessor::new());
        let ids = committed_zone(&store, 2);
        store.set("home", ROOT_POINTER_KEY, b"garbage").unwrap();

        let newest_shard = ids[1].shard().unwrap().namespace("home");
        let flaky = Arc::new(FlakyAccessor::new(store.clone(), newest_shard));
        let key: &dyn PrivateKey = &ALICE;
        let err = Zone::open(flaky.clone(), "home", &[key]).unwrap_err();
        assert!(matches!(err, ZoneError::Store(StoreError::Io(_))));
        // An older snapshot was not published in place of the newest.
        assert_eq!(root_blob(&store), b"garbage");

        flaky.heal();
        let zone = Zone::open(flaky.clone(), "home", &[key]).unwrap();
        assert_eq!(zone.head().unwrap().id, ids[1]);
    }

    #[test]
    fn storage_error_reading_identity_is_not_a_missing_key() {
        let store = Arc::new(InMemoryAccessor::new());
        new_zone(&store);
        let flaky = Arc::new(FlakyAccessor::new(store.clone(), "home/identities".into()));
        let key: &dyn PrivateKey = &ALICE;
        let err = Zone::open(flaky, "home", &[key]).unwrap_err();
        assert!(matches!(err, ZoneError::Store(StoreError::Io(_))));
    }

    #[test]
    fn commit_after_head_at_max_timestamp() {
        let store = Arc::new(InMemoryAccessor::new());
        let mut zone = new_zone(&store);
        let root = dir_with(&mut zone, "late");
        let snapshot = Snapshot::new(i64::MAX, FileSize(0), root, ContentId::undefined());
        let id = zone.write(&Node::from(snapshot).serialize().unwrap()).unwrap();
        zone.set_root_pointer(&id).unwrap();

        let mut zone = reopen(&store).unwrap();
        let next_root = dir_with(&mut zone, "later");
        let next = zone.commit(&next_root, FileSize(0)).unwrap().unwrap();
        let head = zone.head().unwrap();
        assert_eq!(head.id, next);
        assert_eq!(head.snapshot.timestamp, i64::MAX);
        assert_eq!(head.snapshot.parent, id);
    }

    #[test]
    fn dangling_pointer_recovers_by_scan() {
        let store = Arc::new(InMemoryAccessor::new());
        let ids = committed_zone(&store, 2);
        let zone = reopen(&store).unwrap();
        zone.set_root_pointer(&ContentId::new(vec![0xee; 32])).unwrap();

        let zone = reopen(&store).unwrap();
        assert_eq!(zone.head().unwrap().id, ids[1]);
    }

    #[test]
    fn no_snapshot_anywhere_is_no_root_found() {
        let store = Arc::new(InMemoryAccessor::new());
        let mut zone = new_zone(&store);
        zone.write(b"an object that is not a snapshot").unwrap();
        store.set("home", ROOT_POINTER_KEY, &[]).unwrap();

        assert!(matches!(reopen(&store), Err(ZoneError::NoRootFound)));
    }

    #[test]
    fn pointer_to_directory_is_corrupt_root() {
        let store = Arc::new(InMemoryAccessor::new());
        let mut zone = new_zone(&store);
        let dir = dir_with(&mut zone, "x");
        zone.set_root_pointer(&dir).unwrap();

        let err = reopen(&store).unwrap_err();
        assert!(matches!(
            err,
            ZoneError::CorruptRoot { id, actual: cairn_tree::NodeType::Directory } if id == dir
        ));
    }

    #[test]
    fn file_and_empty_subdirectory_resolve_after_reopen() {
        let store = Arc::new(InMemoryAccessor::new());
        let snapshot_id = {
            let mut zone = Zone::create(store.clone(), "home").unwrap();
            zone.add_identity(&ALICE).unwrap();

            let readme = write_bytes(&mut zone, b"0123456789").unwrap();
            let empty = zone
                .write(&Node::from(Directory::new()).serialize().unwrap())
                .unwrap();
            let mut root = Directory::new();
            root.add_entry("readme", FileMode::file(0o644), 1_700_000_000, readme);
            root.add_entry("empty", FileMode::dir(0o755), 1_700_000_001, empty);
            let root_id = zone.write(&Node::from(root).serialize().unwrap()).unwrap();

            let snapshot = Snapshot::new(
                1_700_000_002_000_000_000,
                FileSize(10),
                root_id,
                ContentId::undefined(),
            );
            let id = zone.write(&Node::from(snapshot).serialize().unwrap()).unwrap();
            zone.set_root_pointer(&id).unwrap();
            id
        };

        let zone = reopen(&store).unwrap();
        let head = zone.head().unwrap();
        assert_eq!(head.id, snapshot_id);
        assert!(head.snapshot.parent.is_undefined());

        let root = Node::deserialize_by_id(&head.snapshot.root, &zone)
            .unwrap()
            .into_directory()
            .unwrap();
        assert_eq!(root.len(), 2);

        let readme = &root.entries[0];
        assert_eq!(readme.name, "readme");
        assert!(!readme.mode.is_dir());
        let node = Node::deserialize_by_id(&readme.entry, &zone).unwrap();
        assert_eq!(node.node_type(), cairn_tree::NodeType::SimpleFile);
        assert_eq!(node.file().unwrap().size(), 10);

        let sub = &root.entries[1];
        assert_eq!(sub.name, "empty");
        assert!(sub.mode.is_dir());
        let sub = Node::deserialize_by_id(&sub.entry, &zone)
            .unwrap()
            .into_directory()
            .unwrap();
        assert!(sub.is_empty());
    }

    #[test]
    fn end_to_end_backup_and_restore() {
        let store = Arc::new(InMemoryAccessor::new());
        let big: Vec<u8> = (0..(cairn_tree::CHUNK_SIZE + 300))
            .map(|i| (i % 7) as u8)
            .collect();
        {
            let mut zone = Zone::create(store.clone(), "home").unwrap();
            zone.add_identity(&ALICE).unwrap();

            let notes = write_bytes(&mut zone, b"remember the milk").unwrap();
            let video = write_bytes(&mut zone, &big).unwrap();
            let mut root = Directory::new();
            root.add_entry("notes.txt", FileMode::file(0o644), 1_600_000_000, notes);
            root.add_entry("clip.bin", FileMode::file(0o600), 1_600_000_001, video);
            let root_id = zone.write(&Node::from(root).serialize().unwrap()).unwrap();

            let size = FileSize(zone.stats().written as i64);
            zone.commit(&root_id, size).unwrap().unwrap();
        }

        let zone = reopen(&store).unwrap();
        let head = zone.head().unwrap();
        let root = Node::deserialize_by_id(&head.snapshot.root, &zone)
            .unwrap()
            .into_directory()
            .unwrap();
        let names: Vec<&str> = root.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["notes.txt", "clip.bin"]);

        let read_file = |id: &ContentId| {
            let node = Node::deserialize_by_id(id, &zone).unwrap();
            let mut out = Vec::new();
            node.file().unwrap().reader(&zone).read_to_end(&mut out).unwrap();
            out
        };
        assert_eq!(read_file(&root.entries[0].entry), b"remember the milk");
        assert_eq!(read_file(&root.entries[1].entry), big);
        assert_eq!(root.entries[1].mod_time, 1_600_000_001);
    }
}

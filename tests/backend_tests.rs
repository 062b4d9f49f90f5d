use bytes::Bytes;
use s3_version_history::services::{external_mount_backend, primary_storage_backend};
use s3_version_history::{
    BucketName, ExternalMountStorage, FileHandle, FileStorage, InMemoryMetadataCache,
    InMemoryVersionStore, LocalStorage, ObjectVersionStore, PathRemapStorage, Permissions,
    PrimaryObjectStorage, RecordingChangeScanner, RevisionHistoryService, VersionBackend,
    VersionId,
};
use std::sync::Arc;
use tokio::io::AsyncReadExt;

fn history_service() -> RevisionHistoryService {
    let backends: Vec<Arc<dyn VersionBackend>> = vec![
        Arc::new(primary_storage_backend()),
        Arc::new(external_mount_backend()),
    ];
    RevisionHistoryService::new(backends)
}

async fn versioned_store() -> Arc<InMemoryVersionStore> {
    let store = Arc::new(InMemoryVersionStore::new(
        BucketName::new("test-bucket".to_string()).unwrap(),
    ));
    store.enable_versioning().await.unwrap();
    store
}

fn file_on(
    storage: Arc<FileStorage>,
    id: u64,
    name: &str,
    internal_path: &str,
    permissions: Permissions,
) -> FileHandle {
    FileHandle {
        id,
        name: name.to_string(),
        mime_type: "text/plain".to_string(),
        size: 3,
        internal_path: internal_path.to_string(),
        permissions,
        storage,
    }
}

fn primary_storage(
    store: &Arc<InMemoryVersionStore>,
    cache: &Arc<InMemoryMetadataCache>,
) -> Arc<FileStorage> {
    Arc::new(FileStorage::Primary(PrimaryObjectStorage {
        id: "primary".to_string(),
        connection: Arc::clone(store) as Arc<dyn ObjectVersionStore>,
        cache: Arc::clone(cache) as _,
    }))
}

#[tokio::test]
async fn local_files_have_no_object_store_history() {
    let history = history_service();
    let storage = Arc::new(FileStorage::Local(LocalStorage {
        id: "home".to_string(),
    }));
    let file = file_on(storage, 1, "notes.txt", "notes.txt", Permissions::ALL);

    let revisions = history.list_revisions(&file).await.unwrap();
    assert!(revisions.is_empty());

    // mutations on unresolved files are no-ops, not failures
    let fake = s3_version_history::RevisionRecord::new(
        1,
        VersionId::new("v".to_string()).unwrap(),
        "notes.txt".to_string(),
        0,
        "text/plain".to_string(),
        1,
        Default::default(),
    );
    assert!(!history.restore(&file, &fake).await.unwrap());
    history.set_label(&file, &fake, "x").await.unwrap();
    history.delete_revision(&file, &fake).await.unwrap();
}

#[tokio::test]
async fn unresolved_files_never_reach_the_store() {
    let history = history_service();
    let store = versioned_store().await;
    let calls_after_setup = store.operation_count();

    // external-mount storage whose remap chain bottoms out at local disk
    let storage = Arc::new(FileStorage::PathRemap(PathRemapStorage {
        root: "jail".to_string(),
        inner: Arc::new(FileStorage::Local(LocalStorage {
            id: "home".to_string(),
        })),
    }));
    let file = file_on(storage, 9, "notes.txt", "notes.txt", Permissions::ALL);

    assert!(history.list_revisions(&file).await.unwrap().is_empty());
    assert_eq!(store.operation_count(), calls_after_setup);
}

#[tokio::test]
async fn primary_storage_lists_restores_and_refreshes_cache() {
    let history = history_service();
    let store = versioned_store().await;
    let cache = Arc::new(InMemoryMetadataCache::new());
    let storage = primary_storage(&store, &cache);
    let file = file_on(storage, 42, "report.txt", "files/report.txt", Permissions::ALL);

    store.put_object("urn:oid:42", "bar").await;
    store.put_object("urn:oid:42", "foo").await;
    store.put_object("urn:oid:42", "asd").await;

    let revisions = history.list_revisions(&file).await.unwrap();
    assert_eq!(revisions.len(), 2);
    assert_eq!(revisions[0].display_name, "report.txt");
    assert_eq!(revisions[0].etag, format!("42/{}", revisions[0].timestamp));

    let restored = revisions[0].clone();
    assert!(history.restore(&file, &restored).await.unwrap());

    assert_eq!(
        store.current_content("urn:oid:42").await.unwrap(),
        Bytes::from("foo")
    );
    assert_eq!(history.list_revisions(&file).await.unwrap().len(), 3);

    // cache write-through after rollback
    let entry = cache.entry(42).await.expect("cache must be refreshed");
    assert_eq!(entry.size, restored.size);
    assert!(!entry.etag.is_empty());
    assert!(entry.mtime > 0);
}

#[tokio::test]
async fn restore_requires_update_permission() {
    let history = history_service();
    let store = versioned_store().await;
    let cache = Arc::new(InMemoryMetadataCache::new());
    let storage = primary_storage(&store, &cache);

    store.put_object("urn:oid:7", "one").await;
    store.put_object("urn:oid:7", "two").await;
    let writable = file_on(Arc::clone(&storage), 7, "a.txt", "a.txt", Permissions::ALL);
    let revisions = history.list_revisions(&writable).await.unwrap();
    let calls_before = store.operation_count();

    let read_only = file_on(storage, 7, "a.txt", "a.txt", Permissions::READ);
    let err = history
        .restore(&read_only, &revisions[0])
        .await
        .unwrap_err();
    assert!(err.is_permission_denied());
    // denied before any store call
    assert_eq!(store.operation_count(), calls_before);
    assert!(cache.entry(7).await.is_none());
}

#[tokio::test]
async fn delete_requires_delete_permission() {
    let history = history_service();
    let store = versioned_store().await;
    let cache = Arc::new(InMemoryMetadataCache::new());
    let storage = primary_storage(&store, &cache);

    store.put_object("urn:oid:8", "one").await;
    store.put_object("urn:oid:8", "two").await;
    let writable = file_on(Arc::clone(&storage), 8, "b.txt", "b.txt", Permissions::ALL);
    let revisions = history.list_revisions(&writable).await.unwrap();

    let no_delete = file_on(
        storage,
        8,
        "b.txt",
        "b.txt",
        Permissions::READ | Permissions::UPDATE,
    );
    let err = history
        .delete_revision(&no_delete, &revisions[0])
        .await
        .unwrap_err();
    assert!(err.is_permission_denied());
    assert_eq!(history.list_revisions(&writable).await.unwrap().len(), 1);
}

#[tokio::test]
async fn external_mount_unwinds_path_remap_layers() {
    let history = history_service();
    let store = versioned_store().await;
    let scanner = Arc::new(RecordingChangeScanner::new());

    let mount = Arc::new(FileStorage::ExternalMount(ExternalMountStorage {
        id: "mount".to_string(),
        connection: Arc::clone(&store) as Arc<dyn ObjectVersionStore>,
        scanner: Arc::clone(&scanner) as _,
    }));
    let storage = Arc::new(FileStorage::PathRemap(PathRemapStorage {
        root: "2024".to_string(),
        inner: Arc::new(FileStorage::PathRemap(PathRemapStorage {
            root: "reports".to_string(),
            inner: mount,
        })),
    }));
    let file = file_on(storage, 5, "q1.pdf", "q1.pdf", Permissions::ALL);

    store.put_object("reports/2024/q1.pdf", "draft").await;
    store.put_object("reports/2024/q1.pdf", "final").await;

    let revisions = history.list_revisions(&file).await.unwrap();
    assert_eq!(revisions.len(), 1);

    let mut stream = history
        .read_revision(&file, &revisions[0].revision_id)
        .await
        .unwrap();
    let mut content = Vec::new();
    stream.read_to_end(&mut content).await.unwrap();
    assert_eq!(content, b"draft");

    assert!(history.restore(&file, &revisions[0]).await.unwrap());
    assert_eq!(
        store.current_content("reports/2024/q1.pdf").await.unwrap(),
        Bytes::from("draft")
    );

    // rollback must trigger the mount's change scanner on the real path
    assert_eq!(
        scanner.scanned_paths().await,
        vec!["reports/2024/q1.pdf".to_string()]
    );
}

#[tokio::test]
async fn set_metadata_targets_revision_by_timestamp() {
    let history = history_service();
    let store = versioned_store().await;
    let cache = Arc::new(InMemoryMetadataCache::new());
    let storage = primary_storage(&store, &cache);
    let file = file_on(storage, 11, "c.txt", "c.txt", Permissions::ALL);

    store.put_object("urn:oid:11", "one").await;
    store.put_object("urn:oid:11", "two").await;
    store.put_object("urn:oid:11", "three").await;

    let revisions = history.list_revisions(&file).await.unwrap();
    let target = revisions[1].clone();

    history
        .set_metadata(&file, target.timestamp, "label", "quarterly")
        .await
        .unwrap();

    let revisions = history.list_revisions(&file).await.unwrap();
    let relabeled = revisions
        .iter()
        .find(|r| r.revision_id == target.revision_id)
        .unwrap();
    assert_eq!(relabeled.label(), "quarterly");

    // unknown timestamp is a no-op
    history
        .set_metadata(&file, 1, "label", "never lands")
        .await
        .unwrap();
}

#[tokio::test]
async fn set_label_round_trip_through_service() {
    let history = history_service();
    let store = versioned_store().await;
    let cache = Arc::new(InMemoryMetadataCache::new());
    let storage = primary_storage(&store, &cache);
    let file = file_on(storage, 12, "d.txt", "d.txt", Permissions::ALL);

    store.put_object("urn:oid:12", "one").await;
    store.put_object("urn:oid:12", "two").await;

    let revisions = history.list_revisions(&file).await.unwrap();
    history
        .set_label(&file, &revisions[0], "before rewrite")
        .await
        .unwrap();

    let revisions = history.list_revisions(&file).await.unwrap();
    assert_eq!(revisions[0].label(), "before rewrite");

    history.set_label(&file, &revisions[0], "").await.unwrap();
    let revisions = history.list_revisions(&file).await.unwrap();
    assert_eq!(revisions[0].label(), "");
}

#[tokio::test]
async fn revision_file_is_a_read_only_view() {
    let history = history_service();
    let store = versioned_store().await;
    let cache = Arc::new(InMemoryMetadataCache::new());
    let storage = primary_storage(&store, &cache);
    let file = file_on(storage, 13, "e.txt", "e.txt", Permissions::ALL);

    store.put_object("urn:oid:13", "historic").await;
    store.put_object("urn:oid:13", "current").await;

    let revisions = history.list_revisions(&file).await.unwrap();
    let view = history
        .revision_file(&file, &revisions[0].revision_id)
        .unwrap();

    assert_eq!(view.name(), "e.txt");
    assert_eq!(view.etag(), revisions[0].revision_id.as_str());
    assert_eq!(view.read_to_bytes().await.unwrap(), Bytes::from("historic"));

    assert!(view.write().unwrap_err().is_permission_denied());
    assert!(view.rename("f.txt").unwrap_err().is_permission_denied());
    assert!(view.delete().unwrap_err().is_permission_denied());
    assert!(view.lock().unwrap_err().is_permission_denied());
}

#[tokio::test]
async fn bucket_versioning_can_be_enabled_once() {
    let store = versioned_store().await;
    assert!(store.versioning_enabled().await.unwrap());

    let fresh = InMemoryVersionStore::new(BucketName::new("fresh-bucket".to_string()).unwrap());
    assert!(!fresh.versioning_enabled().await.unwrap());
    fresh.enable_versioning().await.unwrap();
    assert!(fresh.versioning_enabled().await.unwrap());
}

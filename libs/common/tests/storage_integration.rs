//! Integration tests for the artifact storage layer
//!
//! These tests verify that the generated-artifacts directory is created on
//! demand and that per-request naming keeps repeated conversions isolated.

use common::{request_id::RequestIdGenerator, storage::ArtifactStore};

#[tokio::test]
async fn test_store_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    let store = ArtifactStore::open(root.path())?;

    let ids = RequestIdGenerator::new();
    let id = ids.next_id();

    let video_name = ArtifactStore::video_file_name("The Home Depot", &id);
    let qr_name = ArtifactStore::qr_file_name(&id);

    tokio::fs::write(store.path_for(&video_name), b"mp4").await?;
    store.write(&qr_name, b"png")?;

    assert!(store.resolve(&video_name).is_some(), "video not resolvable");
    assert!(store.resolve(&qr_name).is_some(), "qr not resolvable");
    assert!(store.resolve("unknown.mp4").is_none());

    Ok(())
}

#[tokio::test]
async fn test_identical_input_never_collides() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    let store = ArtifactStore::open(root.path())?;

    // Same brand submitted twice: the request id keeps the outputs apart.
    let ids = RequestIdGenerator::new();
    let first = ids.next_id();
    let second = ids.next_id();

    let video_a = ArtifactStore::video_file_name("Acme", &first);
    let video_b = ArtifactStore::video_file_name("Acme", &second);
    assert_ne!(video_a, video_b);
    assert_ne!(
        ArtifactStore::qr_file_name(&first),
        ArtifactStore::qr_file_name(&second)
    );

    store.write(&video_a, b"first")?;
    store.write(&video_b, b"second")?;

    assert_eq!(std::fs::read(store.path_for(&video_a))?, b"first");
    assert_eq!(std::fs::read(store.path_for(&video_b))?, b"second");

    Ok(())
}

#[tokio::test]
async fn test_open_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;

    let first = ArtifactStore::open(root.path())?;
    first.write("kept.log", b"log")?;

    // Re-opening over an existing directory must not disturb its contents.
    let second = ArtifactStore::open(root.path())?;
    assert!(second.resolve("kept.log").is_some());

    Ok(())
}

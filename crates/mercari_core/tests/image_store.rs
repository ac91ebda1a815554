use mercari_core::{content_file_name, ImageError, ImageStore};

#[test]
fn identical_bytes_map_to_identical_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::open(dir.path()).unwrap();

    let first = store.store(b"same pixels").unwrap();
    let second = store.store(b"same pixels").unwrap();

    assert_eq!(first, second);
    assert_eq!(first, content_file_name(b"same pixels"));
    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1, "re-upload must not duplicate storage");
}

#[test]
fn different_bytes_map_to_different_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::open(dir.path()).unwrap();

    let a = store.store(b"image a").unwrap();
    let b = store.store(b"image b").unwrap();

    assert_ne!(a, b);
}

#[test]
fn stored_name_is_hex_digest_with_jpg_extension() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::open(dir.path()).unwrap();

    let name = store.store(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
    let (digest, extension) = name.split_once('.').unwrap();

    assert_eq!(extension, "jpg");
    assert_eq!(digest.len(), 64);
    assert!(digest
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}

#[test]
fn stored_bytes_are_readable_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::open(dir.path()).unwrap();

    let name = store.store(b"jpeg body").unwrap();

    assert!(store.contains(&name));
    assert_eq!(store.read(&name).unwrap(), b"jpeg body");
    assert_eq!(store.path_of(&name).unwrap(), dir.path().join(&name));
}

#[test]
fn empty_upload_is_rejected_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::open(dir.path()).unwrap();

    let err = store.store(&[]).unwrap_err();

    assert!(matches!(err, ImageError::EmptyContent));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn unknown_or_foreign_names_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::open(dir.path()).unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"not an image").unwrap();

    let missing = content_file_name(b"never stored");
    assert!(store.read(&missing).unwrap_err().is_not_found());
    assert!(store.read("notes.txt").unwrap_err().is_not_found());
    assert!(store.read("../etc/passwd").unwrap_err().is_not_found());
    assert!(store.path_of(&missing).unwrap_err().is_not_found());
    assert!(!store.contains("notes.txt"));
}

#[test]
fn open_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("images").join("uploads");

    let store = ImageStore::open(&nested).unwrap();

    assert!(nested.is_dir());
    assert_eq!(store.dir(), nested.as_path());
}

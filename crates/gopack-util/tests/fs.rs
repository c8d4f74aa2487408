use gopack_util::fs::{ensure_dir, symlink_dir, write_atomic};
use tempfile::TempDir;

#[test]
fn test_ensure_dir_creates_nested() {
    let tmp = TempDir::new().unwrap();
    let deep = tmp.path().join("x").join("y").join("z");
    assert!(!deep.exists());
    ensure_dir(&deep).unwrap();
    assert!(deep.is_dir());
}

#[cfg(unix)]
#[test]
fn test_symlink_dir_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("project");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("main.go"), "package main").unwrap();

    let link = tmp.path().join("vendor/src/github.com/me/project");
    symlink_dir(&target, &link).unwrap();
    symlink_dir(&target, &link).unwrap();

    assert!(link.join("main.go").is_file());
    let meta = std::fs::symlink_metadata(&link).unwrap();
    assert!(meta.file_type().is_symlink());
}

#[test]
fn test_write_atomic_replaces_contents() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(".gopack").join("checksum");
    write_atomic(&path, b"first").unwrap();
    write_atomic(&path, b"second").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
}

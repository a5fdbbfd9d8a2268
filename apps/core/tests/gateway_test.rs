mod support;

use std::fs;

use fastfind_core::gateway::{FilesystemGateway, LocalFilesystem};
use support::unique_temp_dir;

fn dir_text(path: &std::path::Path) -> String {
    format!("{}/", path.to_string_lossy())
}

#[test]
fn list_children_marks_directories_with_trailing_separator() {
    let root = unique_temp_dir("list");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("file.txt"), "x").unwrap();

    let gateway = LocalFilesystem::default();
    let mut children = gateway.list_children(&dir_text(&root)).unwrap();
    children.sort();

    let base = dir_text(&root);
    assert_eq!(children, vec![format!("{base}file.txt"), format!("{base}sub/")]);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn walk_respects_depth_and_skips_hidden_and_packages() {
    let root = unique_temp_dir("walk");
    fs::create_dir_all(root.join("a/b/c/d")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::create_dir_all(root.join("Tool.app/Contents")).unwrap();
    fs::write(root.join("top.rs"), "").unwrap();
    fs::write(root.join("a/b/c/depth4.rs"), "").unwrap();
    fs::write(root.join("a/b/c/d/depth5.rs"), "").unwrap();
    fs::write(root.join(".hidden.rs"), "").unwrap();
    fs::write(root.join(".git/config"), "").unwrap();
    fs::write(root.join("Tool.app/Contents/Info.plist"), "").unwrap();

    let gateway = LocalFilesystem::default();
    let base = dir_text(&root);
    let mut files = gateway.walk(&base, 4).unwrap();
    files.sort();

    let expected: Vec<String> = vec!["a/b/c/depth4.rs", "top.rs"]
        .into_iter()
        .map(|rel| root.join(rel).to_string_lossy().into_owned())
        .collect();
    assert_eq!(files, expected);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn walk_of_missing_root_is_an_error() {
    let root = unique_temp_dir("walk-missing");
    let gateway = LocalFilesystem::default();
    assert!(gateway.walk(&dir_text(&root), 4).is_err());
    assert!(gateway.list_children(&dir_text(&root)).is_err());
}

#[test]
fn create_directory_is_recursive_and_exists_reports_it() {
    let root = unique_temp_dir("mkdir");
    let nested = dir_text(&root.join("x/y/z"));

    let gateway = LocalFilesystem::default();
    assert!(!gateway.exists(&nested));
    gateway.create_directory(&nested).unwrap();
    assert!(gateway.exists(&nested));

    fs::remove_dir_all(&root).unwrap();
}

//! Symbolic and hard link handling.
//!
//! Symlinks are followed; directories reached more than once within an
//! operand are counted at their first visit only. Files are never
//! deduplicated.

#![cfg(unix)]

use super::common::{arg, line, run, sample_tree};
use std::fs;
use std::os::unix::fs::symlink;

#[test]
fn test_symlink_cycle_terminates() {
    let dir = sample_tree();
    let root = dir.path();
    symlink(root, root.join("b").join("loop")).unwrap();

    let result = run(&[&arg(root)]).unwrap();

    assert_eq!(result.lines, vec![line("2", &root.join("b")), line("3", root)]);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_mutual_symlink_cycle_terminates() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("x")).unwrap();
    fs::create_dir(root.join("y")).unwrap();
    fs::write(root.join("y").join("f"), vec![0u8; 10]).unwrap();
    symlink(root.join("y"), root.join("x").join("to_y")).unwrap();
    symlink(root.join("x"), root.join("y").join("to_x")).unwrap();

    let result = run(&["-s", &arg(root)]).unwrap();

    // y is counted once, whichever path reaches it first.
    assert_eq!(result.lines, vec![line("1", root)]);
}

#[test]
fn test_symlinked_directory_counted_once() {
    let dir = sample_tree();
    let root = dir.path();
    symlink(root.join("b"), root.join("alias")).unwrap();

    let result = run(&["-s", &arg(root)]).unwrap();

    assert_eq!(result.lines, vec![line("3", root)]);
}

#[test]
fn test_symlink_to_file_counts_target_size() {
    let dir = sample_tree();
    let root = dir.path();
    symlink(root.join("b").join("c"), root.join("c_link")).unwrap();

    let result = run(&["-a", &arg(root)]).unwrap();

    assert!(result.lines.contains(&line("2", &root.join("c_link"))));
    assert_eq!(result.lines.last().unwrap(), &line("5", root));
}

#[test]
fn test_hard_linked_files_counted_each_time() {
    let dir = sample_tree();
    let root = dir.path();
    fs::hard_link(root.join("b").join("c"), root.join("c_hard")).unwrap();

    let result = run(&["-s", &arg(root)]).unwrap();

    assert_eq!(result.lines, vec![line("5", root)]);
}

#[test]
fn test_dangling_symlink_warns() {
    let dir = sample_tree();
    let root = dir.path();
    symlink(root.join("gone"), root.join("dangling")).unwrap();

    let result = run(&[&arg(root)]).unwrap();

    assert_eq!(result.lines.last().unwrap(), &line("3", root));
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("dangling"));
}

#[test]
fn test_operand_reached_through_symlink() {
    let dir = sample_tree();
    let link_parent = tempfile::tempdir().unwrap();
    let link = link_parent.path().join("tree");
    symlink(dir.path(), &link).unwrap();

    let result = run(&["-s", &arg(&link)]).unwrap();

    assert_eq!(result.lines, vec![line("3", &link)]);
}

//! Inode and timestamp views replace the reported value, never the sums.

#![cfg(unix)]

use super::common::{arg, line, run, sample_tree};
use filetime::{set_file_atime, set_file_mtime, FileTime};
use std::fs;
use std::os::unix::fs::MetadataExt;

#[test]
fn test_inode_view_reports_hex_inode() {
    let dir = sample_tree();
    let root = dir.path();
    let root_ino = fs::metadata(root).unwrap().ino();
    let b_ino = fs::metadata(root.join("b")).unwrap().ino();

    let result = run(&["-q", &arg(root)]).unwrap();

    assert_eq!(
        result.lines,
        vec![
            line(&format!("{b_ino:x}"), &root.join("b")),
            line(&format!("{root_ino:x}"), root),
        ]
    );
}

#[test]
fn test_inode_view_ignores_display_mode() {
    let dir = sample_tree();
    let root = dir.path();
    let root_ino = fs::metadata(root).unwrap().ino();

    let result = run(&["-q", "-s", "-h", &arg(root)]).unwrap();

    assert_eq!(result.lines, vec![line(&format!("{root_ino:x}"), root)]);
}

#[test]
fn test_modification_time_view() {
    let dir = sample_tree();
    let root = dir.path();
    let file = root.join("a");
    set_file_mtime(&file, FileTime::from_unix_time(1_000_000, 0)).unwrap();
    set_file_mtime(root.join("b"), FileTime::from_unix_time(1_500_000, 0)).unwrap();

    let result = run(&["-t", "-a", &arg(root)]).unwrap();

    assert!(result.lines.contains(&line("1000000", &file)));
    assert!(result.lines.contains(&line("1500000", &root.join("b"))));
}

#[test]
fn test_access_time_view() {
    let dir = sample_tree();
    let root = dir.path();
    let file = root.join("a");
    set_file_atime(&file, FileTime::from_unix_time(2_000_000, 0)).unwrap();

    let result = run(&["-u", "-a", &arg(root)]).unwrap();

    assert!(result.lines.contains(&line("2000000", &file)));
}

#[test]
fn test_inode_view_wins_over_time_view() {
    let dir = sample_tree();
    let root = dir.path();
    let root_ino = fs::metadata(root).unwrap().ino();

    let result = run(&["-q", "-t", "-s", &arg(root)]).unwrap();

    assert_eq!(result.lines, vec![line(&format!("{root_ino:x}"), root)]);
}

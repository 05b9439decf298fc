use super::common::{arg, line, run, sample_tree};
use std::fs;

#[test]
fn test_each_operand_reported_in_order() {
    let first = sample_tree();
    let second = tempfile::tempdir().unwrap();
    fs::write(second.path().join("f"), vec![0u8; 5000]).unwrap();

    let result = run(&["-s", &arg(first.path()), &arg(second.path())]).unwrap();

    assert_eq!(
        result.lines,
        vec![line("3", first.path()), line("5", second.path())]
    );
}

#[test]
fn test_repeated_operand_skips_counted_subdirectories() {
    let dir = sample_tree();
    let root = arg(dir.path());

    let result = run(&["-s", &root, &root]).unwrap();

    // The second walk only sees the top-level file; `b` is already known
    assert_eq!(
        result.lines,
        vec![line("3", dir.path()), line("1", dir.path())]
    );
}

#[test]
fn test_inner_operand_first_is_not_counted_again() {
    let dir = sample_tree();
    let inner = dir.path().join("b");

    let result = run(&["-s", &arg(&inner), &arg(dir.path())]).unwrap();

    assert_eq!(result.lines, vec![line("2", &inner), line("1", dir.path())]);
}

#[test]
fn test_inner_operand_after_outer_is_still_walked() {
    let dir = sample_tree();
    let inner = dir.path().join("b");

    // Operands themselves are always walked, only their subdirectories
    // are deduplicated
    let result = run(&["-s", &arg(dir.path()), &arg(&inner)]).unwrap();

    assert_eq!(result.lines, vec![line("3", dir.path()), line("2", &inner)]);
}

#[test]
fn test_directories_shared_between_operands_print_once() {
    let dir = sample_tree();
    let root = arg(dir.path());

    let result = run(&[&root, &root]).unwrap();

    assert_eq!(
        result.lines,
        vec![
            line("2", &dir.path().join("b")),
            line("3", dir.path()),
            line("1", dir.path()),
        ]
    );
}

#[test]
fn test_mixed_file_and_directory_operands() {
    let dir = sample_tree();
    let file = dir.path().join("a");

    // -n lists every file, so the file appears again under the directory
    let result = run(&["-n", &arg(&file), &arg(dir.path())]).unwrap();

    assert_eq!(result.lines.len(), 5);
    assert_eq!(result.lines[0], line("100", &file));
    assert_eq!(result.lines.last().unwrap(), &line("2100", dir.path()));
    assert_eq!(
        result.lines.iter().filter(|l| **l == line("100", &file)).count(),
        2
    );
}

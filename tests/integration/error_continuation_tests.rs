use super::common::{arg, line, run, sample_tree};
use rustdu::config::ConfigError;
use rustdu::error::{ErrorKind, ExitCode, StructuredError};
use std::fs;

#[test]
fn test_missing_operand_warns_and_reports_zero() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let result = run(&[&arg(&missing)]).unwrap();

    assert_eq!(result.code, ExitCode::Success);
    assert_eq!(result.lines, vec![line("0", &missing)]);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("rustdu: "));
    assert!(result.warnings[0].contains("nope"));
}

#[test]
fn test_suppressed_warnings_are_silent() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let result = run(&["-f", &arg(&missing)]).unwrap();

    assert_eq!(result.lines, vec![line("0", &missing)]);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_missing_operand_does_not_stop_later_operands() {
    let dir = sample_tree();
    let missing = dir.path().join("nope");

    let result = run(&[&arg(&missing), &arg(dir.path())]).unwrap();

    assert_eq!(result.lines.first().unwrap(), &line("0", &missing));
    assert_eq!(result.lines.last().unwrap(), &line("3", dir.path()));
    assert_eq!(result.warnings.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = sample_tree();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("hidden"), vec![0u8; 5000]).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    let privileged = fs::read_dir(&locked).is_ok();

    let result = run(&[&arg(dir.path())]).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(result.code, ExitCode::Success);
    if privileged {
        // Permission bits do not apply; the subtree is counted normally
        assert!(result.lines.contains(&line("5", &locked)));
        assert_eq!(result.lines.last().unwrap(), &line("8", dir.path()));
        assert!(result.warnings.is_empty());
    } else {
        assert!(result.lines.contains(&line("0", &locked)));
        assert_eq!(result.lines.last().unwrap(), &line("3", dir.path()));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("locked"));
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_names_reach_output_unchanged() {
    use clap::Parser;
    use rustdu::cli::Cli;
    use rustdu::signal::ShutdownHandler;
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rustdu.toml");
    fs::write(&config, "").unwrap();
    let tree = dir.path().join("tree");
    fs::create_dir(&tree).unwrap();
    let name = tree.join(OsStr::from_bytes(b"caf\xe9"));
    fs::create_dir(&name).unwrap();

    let cli = Cli::try_parse_from([
        OsStr::new("rustdu"),
        OsStr::new("--config"),
        config.as_os_str(),
        tree.as_os_str(),
    ])
    .unwrap();
    let mut out = Vec::new();
    rustdu::run_with(&cli, &mut out, Vec::new(), &ShutdownHandler::new()).unwrap();

    let mut expected = b"0\t".to_vec();
    expected.extend_from_slice(name.as_os_str().as_bytes());
    expected.push(b'\n');
    assert!(out.starts_with(&expected), "got {out:?}");
}

#[test]
fn test_invalid_block_size_is_fatal() {
    let dir = sample_tree();

    let err = run(&["-b", "4q", &arg(dir.path())]).err().unwrap();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidBlockSize(_))
    ));
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert_eq!(ErrorKind::of(&err), ErrorKind::Config);
}

#[test]
fn test_zero_block_size_is_fatal() {
    let dir = sample_tree();
    let err = run(&["-b", "0", &arg(dir.path())]).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::ZeroBlockSize)
    ));
}

#[test]
fn test_unknown_prefix_is_fatal() {
    let dir = sample_tree();

    let err = run(&["-p", "q", &arg(dir.path())]).err().unwrap();
    let structured = StructuredError::new(&err, ExitCode::for_error(&err));

    assert_eq!(structured.code, "DU001");
    assert_eq!(structured.exit_code, 1);
    assert_eq!(structured.message, "unknown suffix q");
    assert!(!structured.interrupted);
}

#[test]
fn test_missing_config_file_is_fatal() {
    use clap::Parser;
    use rustdu::cli::Cli;
    use rustdu::signal::ShutdownHandler;

    let dir = sample_tree();
    let config = dir.path().join("absent.toml");
    let cli = Cli::try_parse_from([
        "rustdu",
        "--config",
        &arg(&config),
        &arg(dir.path()),
    ])
    .unwrap();

    let err = rustdu::run_with(&cli, Vec::new(), Vec::new(), &ShutdownHandler::new())
        .err()
        .unwrap();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingFile(_))
    ));
}

#[test]
fn test_interrupted_run_maps_to_exit_130() {
    use clap::Parser;
    use rustdu::cli::Cli;
    use rustdu::signal::ShutdownHandler;

    let dir = sample_tree();
    let config = dir.path().join("rustdu.toml");
    fs::write(&config, "").unwrap();
    let cli = Cli::try_parse_from(["rustdu", "--config", &arg(&config), &arg(dir.path())])
        .unwrap();

    let shutdown = ShutdownHandler::new();
    shutdown.request_shutdown();
    let mut out = Vec::new();
    let err = rustdu::run_with(&cli, &mut out, Vec::new(), &shutdown)
        .err()
        .unwrap();

    assert_eq!(ExitCode::for_error(&err), ExitCode::Interrupted);
    assert_eq!(ErrorKind::of(&err), ErrorKind::Interrupted);
    assert!(out.is_empty());
}

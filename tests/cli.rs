//! Exit-code behaviour of the built binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

fn opclock(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_opclock"));
    cmd.current_dir(dir)
        .env_remove("OPCLOCK_CONFIG")
        .env("RUST_LOG", "info");
    cmd
}

#[test]
fn test_file_source_aborts_with_exit_code_1() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("config.ini"),
        "event_source = FILE\nevent_source_file_filepath = /tmp/x\nbacklight_level = 100\n",
    )
    .unwrap();

    let output = opclock(dir.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("FILE event source not yet implemented"), "{}", stderr);
    // Nothing reached the display
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("[display] on"), "{}", stdout);
}

#[test]
fn test_missing_config_aborts_with_exit_code_1() {
    let dir = tempfile::tempdir().unwrap();
    let output = opclock(dir.path())
        .env("OPCLOCK_CONFIG", dir.path().join("missing.ini"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error loading config"), "{}", stderr);
}

#[test]
fn test_invalid_config_aborts_with_exit_code_1() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("config.ini"),
        "event_source = DEMO\nbacklight_level = 300\n",
    )
    .unwrap();

    let output = opclock(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_sigterm_shuts_down_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("config.ini"),
        "event_source = DEMO\nbacklight_level = 100\n",
    )
    .unwrap();

    let child = opclock(dir.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    thread::sleep(Duration::from_millis(1500));
    let killed = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(killed.success());

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Source: DEMO"), "{}", stdout);
    assert!(stdout.contains("[display] off"), "{}", stdout);
    assert!(stdout.trim_end().ends_with("All threads caught, exiting.."), "{}", stdout);

    // Joined newest first
    let stderr = String::from_utf8_lossy(&output.stderr);
    let joined: Vec<usize> = [
        "Events worker joined",
        "Clock worker joined",
        "Touch worker joined",
        "Screen worker joined",
    ]
    .iter()
    .map(|needle| {
        stderr
            .find(needle)
            .unwrap_or_else(|| panic!("{} missing: {}", needle, stderr))
    })
    .collect();
    assert!(joined.windows(2).all(|w| w[0] < w[1]), "{}", stderr);
}

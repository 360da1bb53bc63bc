//! Integration tests for enforcement_pack lints.
//!
//! These run `cargo dylint` against the chain-pipeline crate at the
//! repository root, the way the lints are used in practice.

use std::process::{Command, Output};

const REPO_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../..");

fn cargo_dylint(args: &[&str]) -> Output {
    Command::new("cargo")
        .arg("dylint")
        .args(args)
        .current_dir(REPO_ROOT)
        .output()
        .expect("Failed to run cargo dylint")
}

#[test]
fn chain_pipeline_library_has_no_raw_output() {
    // Only the library target: demos print to stdout on purpose.
    let output = cargo_dylint(&[
        "--lib",
        "enforcement_pack",
        "--",
        "--manifest-path",
        "Cargo.toml",
        "--lib",
    ]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        output.status.success(),
        "chain-pipeline library code should log through tracing, got: {}",
        stderr
    );
    assert!(
        !stderr.contains("enforcement_pack::no_println"),
        "no_println fired on library code: {}",
        stderr
    );
}

#[test]
fn no_println_is_registered_at_deny_and_points_at_phase_log() {
    let output = cargo_dylint(&["list", "--lib", "enforcement_pack"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        stdout.contains("enforcement_pack::no_println"),
        "no_println lint should be registered, got: {}",
        stdout
    );
    assert!(stdout.contains("deny"), "no_println lint should be at deny level");
    assert!(
        stdout.contains("PhaseLog"),
        "no_println should suggest PhaseLog, got: {}",
        stdout
    );
}

//! Build script: bakes the version and commit into the binary.
//!
//! - MPCHC_VERSION: release version, else CARGO_PKG_VERSION
//! - MPCHC_GIT_SHA: commit, else `git rev-parse --short HEAD`, else "unknown"

use std::env;
use std::process::Command;

fn main() {
    for var in ["MPCHC_VERSION", "MPCHC_GIT_SHA"] {
        println!("cargo:rerun-if-env-changed={}", var);
    }

    let version = env::var("MPCHC_VERSION")
        .or_else(|_| env::var("CARGO_PKG_VERSION"))
        .unwrap_or_else(|_| "unknown".into());
    let git_sha = env::var("MPCHC_GIT_SHA").unwrap_or_else(|_| head_commit());

    println!("cargo:rustc-env=MPCHC_VERSION={}", version);
    println!("cargo:rustc-env=MPCHC_GIT_SHA={}", git_sha);
}

fn head_commit() -> String {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output();
    match output {
        Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout).trim().to_string(),
        _ => "unknown".into(),
    }
}

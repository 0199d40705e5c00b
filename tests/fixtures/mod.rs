//! Shared test fixtures for service and E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use anyhow::{bail, Result};
use palettekit::storage::{KeyValueStore, MemoryStore};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tempfile::TempDir;

/// Path to the palettekit binary (set by cargo at compile time)
pub fn palettekit_bin() -> &'static str {
    env!("CARGO_BIN_EXE_palettekit")
}

/// Creates a Command with an isolated config and data directory.
pub fn isolated_command(args: &[&str], config_dir: &Path) -> Command {
    let mut cmd = Command::new(palettekit_bin());
    cmd.env("PALETTEKIT_CONFIG_DIR", config_dir);
    cmd.env_remove("RUST_LOG");
    cmd.args(args);
    cmd
}

/// Runs the binary in `config_dir` and returns its output.
pub fn run(args: &[&str], config_dir: &Path) -> Output {
    isolated_command(args, config_dir)
        .output()
        .expect("Failed to execute command")
}

/// Runs the binary and parses stdout as JSON, asserting success.
pub fn run_json(args: &[&str], config_dir: &Path) -> Value {
    let output = run(args, config_dir);
    assert_eq!(
        output.status.code(),
        Some(0),
        "Command {args:?} failed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Should parse JSON output")
}

/// Fresh temporary config directory.
pub fn temp_config_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Owned color list from string literals.
pub fn colors(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

/// RGBA buffer filled with `rgba`.
pub fn solid_rgba(rgba: [u8; 4], pixels: usize) -> Vec<u8> {
    rgba.repeat(pixels)
}

/// Writes an RGBA PNG and returns its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32, data: Vec<u8>) -> PathBuf {
    let path = dir.join(name);
    let image = image::RgbaImage::from_raw(width, height, data).expect("buffer matches size");
    image.save(&path).expect("Failed to write PNG");
    path
}

/// Memory store whose writes can be switched to fail.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `set`, `delete` and `clear` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("simulated storage failure");
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.check()?;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn clear(&self) -> Result<()> {
        self.check()?;
        self.inner.clear().await
    }
}

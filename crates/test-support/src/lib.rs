//! Shared fixtures for tests that touch process state.
//!
//! Everything in the workspace resolves its on-disk locations through
//! `TASKDECK_DATA_DIR`, so tests that hit the filesystem take a
//! [`TestEnvGuard`]: it serializes env mutation across the test binary,
//! points the data dir at a fresh temp directory, and restores the previous
//! environment on drop.

use std::{
    path::Path,
    sync::{Mutex, MutexGuard, OnceLock},
};

use tempfile::TempDir;

const DATA_DIR_ENV: &str = "TASKDECK_DATA_DIR";

pub fn test_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

pub struct TestEnvGuard {
    _lock: MutexGuard<'static, ()>,
    temp: TempDir,
    saved: Vec<(&'static str, Option<String>)>,
}

impl TestEnvGuard {
    pub fn new() -> Self {
        let lock = test_lock().lock().unwrap_or_else(|err| err.into_inner());
        let temp = TempDir::new().expect("failed to create temp data dir");
        let saved = vec![(DATA_DIR_ENV, std::env::var(DATA_DIR_ENV).ok())];

        // SAFETY: tests using TestEnvGuard are serialized by test_lock.
        unsafe {
            std::env::set_var(DATA_DIR_ENV, temp.path());
        }

        Self {
            _lock: lock,
            temp,
            saved,
        }
    }

    /// Override another env var for the guard's lifetime.
    pub fn set_var(&mut self, key: &'static str, value: &str) {
        self.saved.push((key, std::env::var(key).ok()));
        // SAFETY: tests using TestEnvGuard are serialized by test_lock.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    /// Unset an env var for the guard's lifetime.
    pub fn remove_var(&mut self, key: &'static str) {
        self.saved.push((key, std::env::var(key).ok()));
        // SAFETY: tests using TestEnvGuard are serialized by test_lock.
        unsafe {
            std::env::remove_var(key);
        }
    }

    pub fn data_dir(&self) -> &Path {
        self.temp.path()
    }
}

impl Default for TestEnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestEnvGuard {
    fn drop(&mut self) {
        // SAFETY: tests using TestEnvGuard are serialized by test_lock.
        unsafe {
            for (key, prev) in self.saved.drain(..).rev() {
                match prev {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}

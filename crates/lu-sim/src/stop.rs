//! Operator stop signals, polled once at the end of every simulated year.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative request to end the run after the current year.
pub trait StopSignal: Send {
    fn should_stop(&self) -> bool;
}

/// Stops when a file exists at `path`.
#[derive(Clone, Debug)]
pub struct StopperFile {
    path: PathBuf,
}

impl StopperFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StopSignal for StopperFile {
    fn should_stop(&self) -> bool {
        self.path.exists()
    }
}

/// In-process stop flag.  Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl StopSignal for StopFlag {
    fn should_stop(&self) -> bool {
        self.is_requested()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NeverStop;

impl StopSignal for NeverStop {
    fn should_stop(&self) -> bool {
        false
    }
}

//! Legacy runtime sessions.
//!
//! Record-type lookup and query execution run inside a session of the legacy
//! runtime. [`LegacySession`] opens one and closes it when dropped, so every
//! exit path of a provider releases it.

use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::{ServiceError, ServiceResult};

/// Bootstrap and teardown of the legacy runtime.
pub trait LegacyRuntime: Send + Sync {
    /// Initialize the runtime and start a session.
    fn acquire(&self) -> ServiceResult<()>;

    /// Close a session started by [`LegacyRuntime::acquire`].
    fn release(&self);
}

/// Scoped legacy session. Released on drop.
#[must_use = "the session is released as soon as the guard is dropped"]
pub struct LegacySession<'a> {
    runtime: &'a dyn LegacyRuntime,
}

impl<'a> LegacySession<'a> {
    pub fn open(runtime: &'a dyn LegacyRuntime) -> ServiceResult<Self> {
        runtime.acquire()?;
        Ok(Self { runtime })
    }
}

impl Drop for LegacySession<'_> {
    fn drop(&mut self) {
        self.runtime.release();
    }
}

/// In-process runtime that counts open sessions.
#[derive(Debug, Default)]
pub struct LocalRuntime {
    active: AtomicUsize,
    opened: AtomicUsize,
    unavailable: bool,
}

impl LocalRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runtime whose sessions always fail to open.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Sessions currently open.
    pub fn active_sessions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Sessions opened since creation.
    pub fn total_sessions(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl LegacyRuntime for LocalRuntime {
    fn acquire(&self) -> ServiceResult<()> {
        if self.unavailable {
            return Err(ServiceError::Session(
                "legacy runtime unavailable".to_string(),
            ));
        }
        self.active.fetch_add(1, Ordering::SeqCst);
        self.opened.fetch_add(1, Ordering::SeqCst);
        debug!("Legacy session opened");
        Ok(())
    }

    fn release(&self) {
        let _ = self
            .active
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        debug!("Legacy session closed");
    }
}

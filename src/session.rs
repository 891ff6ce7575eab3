//! Shared browsing session for chained agents.
//!
//! A session is the state that agents in one chain have in common: every
//! finished task and its outcome is logged, and later agents see that log
//! in their prompt. This is how a second agent can work with "all open tabs"
//! left behind by the first.
//!
//! # Example
//!
//! ```ignore
//! use wikiscout::Session;
//!
//! let session = Session::scoped();
//! runner.run(&open_tabs, &session).await?;
//! let history = runner.run(&collect_tabs, &session).await?;
//! // session released here, on every exit path
//! ```

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// One finished task in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub task: String,
    pub outcome: Option<String>,
}

#[derive(Default)]
struct Inner {
    log: Mutex<Vec<SessionEntry>>,
    closed: AtomicBool,
}

/// Shared session handle.
///
/// Cloning is cheap (Arc-based); all clones refer to the same session.
#[derive(Clone, Default)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    /// Open a new, empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session that is released when the returned guard is dropped.
    pub fn scoped() -> SessionGuard {
        SessionGuard {
            session: Self::new(),
        }
    }

    fn log(&self) -> MutexGuard<'_, Vec<SessionEntry>> {
        self.inner.log.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fail with [`Error::SessionClosed`] once the session has been released.
    pub fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(Error::SessionClosed)
        } else {
            Ok(())
        }
    }

    /// Record a finished task.
    pub fn record(&self, task: &str, outcome: Option<&str>) -> Result<()> {
        self.ensure_open()?;
        self.log().push(SessionEntry {
            task: task.to_string(),
            outcome: outcome.map(str::to_string),
        });
        Ok(())
    }

    /// Snapshot of everything done in this session so far.
    pub fn entries(&self) -> Vec<SessionEntry> {
        self.log().clone()
    }

    /// Render the session log for inclusion in a prompt.
    ///
    /// Returns `None` when nothing has happened yet.
    pub fn render(&self) -> Option<String> {
        let log = self.log();
        if log.is_empty() {
            return None;
        }

        let rendered: Vec<String> = log
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let outcome = entry.outcome.as_deref().unwrap_or("(no result)");
                format!("=== STEP {} ===\nTask: {}\nResult: {}", i + 1, entry.task, outcome)
            })
            .collect();
        Some(rendered.join("\n\n"))
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Release the session.
    ///
    /// Only the first call releases; it returns `true`. Later calls are no-ops.
    pub fn close(&self) -> bool {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        let released = std::mem::take(&mut *self.log());
        tracing::debug!(entries = released.len(), "browsing session closed");
        true
    }
}

/// Owns a [`Session`] and closes it on drop.
pub struct SessionGuard {
    session: Session,
}

impl SessionGuard {
    /// Get a handle to the guarded session.
    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl std::ops::Deref for SessionGuard {
    type Target = Session;

    fn deref(&self) -> &Session {
        &self.session
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.session.close();
    }
}

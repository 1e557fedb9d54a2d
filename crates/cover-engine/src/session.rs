//! Request versioning for superseded-result discarding
//!
//! Each input change begins a new request with a strictly larger token.
//! Work started for an older token is allowed to finish, but its results
//! are dropped instead of reaching the surface.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::types::{CoverError, Result};

/// Identifies one requested input set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Generation counter shared by everyone issuing or checking requests
#[derive(Debug, Default)]
pub struct CoverSession {
    latest: AtomicU64,
    closed: AtomicBool,
}

impl CoverSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier token
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Most recently issued token, if any
    pub fn latest(&self) -> Option<RequestToken> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            value => Some(RequestToken(value)),
        }
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        !self.closed.load(Ordering::SeqCst) && self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Fail with [`CoverError::Superseded`] unless `token` is still current
    pub fn ensure_current(&self, token: RequestToken) -> Result<()> {
        if self.is_current(token) {
            Ok(())
        } else {
            log::debug!("Discarding results of superseded request {}", token);
            Err(CoverError::Superseded(token))
        }
    }

    /// Tear down: every outstanding and future token is stale
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

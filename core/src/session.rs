//! Shared session token.
//!
//! The token is written when a login completes and read by
//! `AuthInterceptor` on every request, possibly from different threads, so
//! it lives behind a `parking_lot::RwLock`. Handles are cheap to clone and
//! all clones see the same value.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

/// Thread-safe holder for the bearer token of the current session.
///
/// A blank token is never stored: setting `""` or whitespace clears the
/// session.
#[derive(Clone, Default)]
pub struct SessionToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl SessionToken {
    /// A fresh, unauthenticated session independent of [`SessionToken::global`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide session.
    pub fn global() -> &'static SessionToken {
        static GLOBAL: OnceLock<SessionToken> = OnceLock::new();
        GLOBAL.get_or_init(SessionToken::new)
    }

    pub fn get(&self) -> Option<String> {
        self.inner.read().clone()
    }

    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        if token.trim().is_empty() {
            self.clear();
            return;
        }
        *self.inner.write() = Some(token);
        tracing::info!("session token stored");
    }

    pub fn clear(&self) {
        if self.inner.write().take().is_some() {
            tracing::info!("session token cleared");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_some()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

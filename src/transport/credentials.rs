//! Ambient session credentials.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Read-only access to the bearer credential attached to outgoing requests.
pub trait CredentialStore: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// A store that never has a credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialStore for NoCredentials {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Credential holder that can be swapped while requests are in flight
/// (login, logout, token refresh).
#[derive(Debug)]
pub struct SessionCredentials {
    token: ArcSwapOption<String>,
}

impl SessionCredentials {
    pub fn new() -> Self {
        Self {
            token: ArcSwapOption::empty(),
        }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_token(token);
        store
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.token.store(Some(Arc::new(token.into())));
    }

    pub fn clear(&self) {
        self.token.store(None);
    }
}

impl Default for SessionCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for SessionCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token
            .load_full()
            .map(|token| token.as_ref().clone())
            .filter(|token| !token.is_empty())
    }
}

//! Authentication state management.

use std::sync::Arc;
use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::models::UserId;

/// Identity issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthInfo {
    /// Access token.
    pub token: String,
    /// User ID.
    pub uid: UserId,
    /// Display name, used as the author of new listings.
    pub display_name: Option<String>,
}

impl AuthInfo {
    /// Create new auth info.
    pub fn new(token: impl Into<String>, uid: impl Into<UserId>) -> Self {
        Self {
            token: token.into(),
            uid: uid.into(),
            display_name: None,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Check if auth looks valid.
    pub fn is_valid(&self) -> bool {
        !self.token.is_empty() && !self.uid.is_empty()
    }

    /// Display name, or the user id when none is set.
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(self.uid.as_str())
    }
}

/// Shared, observable sign-in state.
///
/// Clones observe the same state.
#[derive(Debug, Clone)]
pub struct AuthState {
    tx: Arc<watch::Sender<Option<AuthInfo>>>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthState {
    /// Signed-out state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// State that starts signed in.
    pub fn signed_in(info: AuthInfo) -> Self {
        let state = Self::new();
        state.sign_in(info);
        state
    }

    /// Current identity.
    pub fn current(&self) -> Option<AuthInfo> {
        self.tx.borrow().clone()
    }

    /// Current user id.
    pub fn uid(&self) -> Option<UserId> {
        self.tx.borrow().as_ref().map(|a| a.uid.clone())
    }

    /// Current identity or [`Error::AuthRequired`].
    pub fn require(&self) -> Result<AuthInfo> {
        self.current().ok_or(Error::AuthRequired)
    }

    /// Replace the current identity.
    pub fn sign_in(&self, info: AuthInfo) {
        log::debug!("signed in as {}", info.uid);
        self.tx.send_replace(Some(info));
    }

    /// Clear the current identity.
    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }

    /// Observe identity changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthInfo>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_info_validity() {
        let valid = AuthInfo::new("token123", "u1");
        assert!(valid.is_valid());

        let empty_token = AuthInfo::new("", "u1");
        assert!(!empty_token.is_valid());

        let empty_uid = AuthInfo::new("token123", "");
        assert!(!empty_uid.is_valid());
    }

    #[test]
    fn test_auth_info_name() {
        assert_eq!(AuthInfo::new("t", "u1").name(), "u1");
        assert_eq!(AuthInfo::new("t", "u1").with_name("Divya").name(), "Divya");
    }

    #[tokio::test]
    async fn test_auth_state_notifies() {
        let state = AuthState::new();
        let mut rx = state.subscribe();
        assert!(state.require().is_err());

        state.sign_in(AuthInfo::new("t", "u1"));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().map(|a| a.uid.as_str()), Some("u1"));

        state.sign_out();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
        assert!(state.uid().is_none());
    }
}

//! Credential sources consulted on every outgoing request.

use std::sync::{Arc, RwLock};

use serde_json::Value;

/// Supplies the per-user bearer token at request time.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// No signed-in user.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CredentialProvider for Anonymous {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// A fixed token, mostly useful for scripts and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

#[derive(Debug, Default)]
struct Session {
    token: Option<String>,
    user: Option<Value>,
}

/// In-memory signed-in session. Clones share the same session, so a login
/// through one handle is visible to the client holding another.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful login. Missing parts leave the previous value.
    pub fn login(&self, user: Option<Value>, token: Option<String>) {
        let mut session = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = token {
            session.token = Some(token);
        }
        if let Some(user) = user {
            session.user = Some(user);
        }
        tracing::debug!(has_token = session.token.is_some(), "Session updated");
    }

    pub fn logout(&self) {
        let mut session = self.inner.write().unwrap_or_else(|e| e.into_inner());
        session.token = None;
        session.user = None;
        tracing::debug!("Session cleared");
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .token
            .clone()
    }

    pub fn user(&self) -> Option<Value> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .user
            .clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }
}

impl CredentialProvider for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_login_logout() {
        let store = SessionStore::new();
        assert!(!store.is_signed_in());
        assert_eq!(store.bearer_token(), None);

        store.login(Some(json!({"username": "neo"})), Some("tok".to_string()));
        assert_eq!(store.bearer_token().as_deref(), Some("tok"));
        assert_eq!(store.user(), Some(json!({"username": "neo"})));

        store.logout();
        assert!(!store.is_signed_in());
        assert_eq!(store.user(), None);
    }

    #[test]
    fn partial_login_keeps_token() {
        let store = SessionStore::new();
        store.login(None, Some("tok".to_string()));
        store.login(Some(json!({"email": "new@x.test"})), None);
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert_eq!(store.user(), Some(json!({"email": "new@x.test"})));
    }

    #[test]
    fn clones_share_state() {
        let store = SessionStore::new();
        let provider: Arc<dyn CredentialProvider> = Arc::new(store.clone());
        assert_eq!(provider.bearer_token(), None);
        store.login(None, Some("rotated".to_string()));
        assert_eq!(provider.bearer_token().as_deref(), Some("rotated"));
    }

    #[test]
    fn fixed_providers() {
        assert_eq!(Anonymous.bearer_token(), None);
        assert_eq!(StaticToken("x".into()).bearer_token().as_deref(), Some("x"));
    }
}

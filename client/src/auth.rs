use secrecy::SecretString;
use std::sync::{Arc, Mutex};

/// Read-only access to the bearer token the host application keeps in its
/// durable store. The token is looked up at call time, so a refreshed
/// token is picked up without reconstructing any client.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<SecretString>;
}

/// Fixed token, used by tests and command-line tooling.
pub struct StaticTokenProvider(SecretString);

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().into())
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> Option<SecretString> {
        Some(self.0.clone())
    }
}

/// In-memory stand-in for the host's token store. Cloning shares the
/// stored token, so a login flow can store a token that clients created
/// earlier will observe.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    inner: Arc<Mutex<Option<SecretString>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, token: impl Into<String>) {
        *self.inner.lock().unwrap() = Some(token.into().into());
    }

    pub fn clear(&self) {
        *self.inner.lock().unwrap() = None;
    }
}

impl TokenProvider for MemoryTokenStore {
    fn token(&self) -> Option<SecretString> {
        self.inner.lock().unwrap().clone()
    }
}

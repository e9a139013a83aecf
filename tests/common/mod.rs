//! Test helper module for auth-core integration tests.
//!
//! Builds a `SessionManager` over the in-memory store and the capturing
//! notifier, so flow tests exercise the full orchestration without
//! PostgreSQL.

#![allow(dead_code)]

use std::sync::{Arc, Once};
use std::time::Duration;

use auth_core::{
    AuthConfig, ClientMeta, MemoryStore, MockNotifier, Principal, Role, SessionManager,
};

pub struct TestApp {
    pub sessions: SessionManager,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<MockNotifier>,
}

impl TestApp {
    /// Build a fresh app over empty storage.
    pub fn spawn() -> Self {
        init_tracing();

        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let sessions =
            SessionManager::new(&AuthConfig::for_tests(), store.clone(), notifier.clone());

        Self {
            sessions,
            store,
            notifier,
        }
    }

    /// Provision an active employee principal.
    pub async fn seed_principal(&self, email: &str, secret: &str) -> Principal {
        self.sessions
            .create_principal(email, "Test User", secret, Role::Employee, None, None, &meta())
            .await
            .expect("Failed to seed principal")
    }

    /// Wait for spawned audit and notifier tasks to settle.
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// Request metadata used across the flow tests.
pub fn meta() -> ClientMeta {
    ClientMeta {
        ip_address: Some("127.0.0.1".to_string()),
        user_agent: Some("integration-test".to_string()),
    }
}

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

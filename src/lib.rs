//! auth-core: credential and session lifecycle for the task management
//! backend.
//!
//! Issues, validates, and revokes the four credential families (access,
//! refresh, password-reset, and invite tokens), orchestrates the session
//! flows over them, and records every privileged transition on an
//! append-only audit trail. Persistence sits behind the [`store::AuthStore`]
//! trait with in-memory and PostgreSQL backends.
//!
//! The embedding service drives everything through a [`SessionManager`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use auth_core::{AuthConfig, ClientMeta, LogNotifier, MemoryStore, SessionManager};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = AuthConfig::from_env()?;
//! let sessions = SessionManager::new(
//!     &config,
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(LogNotifier),
//! );
//!
//! let pair = sessions.login("jane@example.com", "secret", &ClientMeta::default()).await?;
//! let _claims = sessions.verify_access_token(&pair.access_token)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

pub use config::{AuthConfig, ConfigError, DatabaseConfig, Environment, JwtConfig};
pub use models::{AuditAction, AuditEntry, ClientMeta, Invite, Principal, Role};
pub use services::{
    AccessClaims, AuthError, LogNotifier, MockNotifier, Notice, Notifier, SessionManager,
    TokenPair,
};
pub use store::{AuthStore, MemoryStore, PgStore, StoreError};

//! Services layer: the credential, token, invite, session, and audit
//! components and their shared error type.

mod audit;
mod credentials;
pub mod error;
mod invite_ledger;
mod jwt;
mod notifier;
mod session;
mod token_ledger;

pub use audit::AuditRecorder;
pub use credentials::CredentialStore;
pub use error::AuthError;
pub use invite_ledger::InviteLedger;
pub use jwt::{AccessClaims, JwtSigner};
pub use notifier::{LogNotifier, MockNotifier, Notice, Notifier, NotifyError};
pub use session::{SessionManager, TokenPair};
pub use token_ledger::TokenLedger;

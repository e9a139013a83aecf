pub mod audit;
pub mod invite;
pub mod principal;
pub mod refresh_token;
pub mod reset_token;

pub use audit::{AuditAction, AuditEntry, ClientMeta};
pub use invite::Invite;
pub use principal::{Principal, Role};
pub use refresh_token::RefreshToken;
pub use reset_token::PasswordResetToken;

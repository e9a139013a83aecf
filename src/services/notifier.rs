use async_trait::async_trait;
use tokio::sync::Mutex;

/// Notification delivery error.
#[derive(Debug, thiserror::Error)]
#[error("Notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound delivery seam for token notices.
///
/// The session flows spawn these calls and never await delivery; an
/// implementation failing does not fail the flow that issued the token.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_password_reset_notice(
        &self,
        email: &str,
        reset_token: &str,
    ) -> Result<(), NotifyError>;

    async fn send_invite_notice(
        &self,
        email: &str,
        invite_token: &str,
        inviter_name: &str,
    ) -> Result<(), NotifyError>;
}

/// Tracing-backed notifier for development deployments. Logs that a notice
/// was dispatched; token values are never written to the log.
#[derive(Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_password_reset_notice(
        &self,
        email: &str,
        _reset_token: &str,
    ) -> Result<(), NotifyError> {
        tracing::info!(to = %email, "Password reset notice dispatched");
        Ok(())
    }

    async fn send_invite_notice(
        &self,
        email: &str,
        _invite_token: &str,
        inviter_name: &str,
    ) -> Result<(), NotifyError> {
        tracing::info!(to = %email, inviter = %inviter_name, "Invite notice dispatched");
        Ok(())
    }
}

/// A notice captured by `MockNotifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PasswordReset {
        email: String,
        token: String,
    },
    Invite {
        email: String,
        token: String,
        inviter_name: String,
    },
}

/// Capturing notifier for tests.
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<Notice>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices delivered so far, oldest first.
    pub async fn sent(&self) -> Vec<Notice> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_password_reset_notice(
        &self,
        email: &str,
        reset_token: &str,
    ) -> Result<(), NotifyError> {
        self.sent.lock().await.push(Notice::PasswordReset {
            email: email.to_string(),
            token: reset_token.to_string(),
        });
        Ok(())
    }

    async fn send_invite_notice(
        &self,
        email: &str,
        invite_token: &str,
        inviter_name: &str,
    ) -> Result<(), NotifyError> {
        self.sent.lock().await.push(Notice::Invite {
            email: email.to_string(),
            token: invite_token.to_string(),
            inviter_name: inviter_name.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_notifier_captures_in_order() {
        let notifier = MockNotifier::new();
        notifier
            .send_password_reset_notice("a@x.com", "tok1")
            .await
            .unwrap();
        notifier
            .send_invite_notice("b@x.com", "tok2", "Admin")
            .await
            .unwrap();

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0],
            Notice::PasswordReset {
                email: "a@x.com".to_string(),
                token: "tok1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        let notifier = LogNotifier;
        assert!(notifier
            .send_password_reset_notice("a@x.com", "tok")
            .await
            .is_ok());
    }
}

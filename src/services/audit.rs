use std::sync::Arc;

use crate::models::AuditEntry;
use crate::store::AuthStore;

/// Appends audit entries without blocking the operation being recorded.
///
/// Persistence failures are reported to the operational log only; the
/// primary flow never observes them.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuthStore>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuthStore>) -> Self {
        Self { store }
    }

    /// Fire-and-forget append of an audit entry.
    pub fn record(&self, entry: AuditEntry) {
        let store = self.store.clone();
        tokio::spawn(async move {
            if let Err(e) = store.append_audit_entry(&entry).await {
                tracing::error!(
                    error = %e,
                    action = %entry.action_code,
                    "Failed to write audit entry"
                );
            }
        });
    }
}

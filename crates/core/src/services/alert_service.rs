use std::sync::Arc;

use crate::errors::CoreError;
use crate::gateway::traits::AlertsApi;
use crate::models::alert::{AlertRule, AlertSpec, DeleteAlert};
use crate::services::identity_service::IdentityService;
use crate::services::sync_service::SnapshotStore;

/// User-initiated alert mutations: create and delete.
///
/// Unlike polling reads, mutation errors are never swallowed — they
/// surface synchronously to the caller so the presentation layer can show
/// a failure dialog.
pub struct AlertService {
    api: Arc<dyn AlertsApi>,
    identity: Arc<IdentityService>,
    alerts: Arc<SnapshotStore<AlertRule>>,
}

impl AlertService {
    pub fn new(
        api: Arc<dyn AlertsApi>,
        identity: Arc<IdentityService>,
        alerts: Arc<SnapshotStore<AlertRule>>,
    ) -> Self {
        Self {
            api,
            identity,
            alerts,
        }
    }

    /// Create a new alert rule for `symbol`.
    ///
    /// Validation runs before the request is issued; a validation failure
    /// never reaches the network. The created rule is NOT inserted into the
    /// local snapshot — it arrives with the next poll tick.
    pub async fn create(
        &self,
        symbol: &str,
        spec: AlertSpec,
    ) -> Result<Option<AlertRule>, CoreError> {
        let user = self
            .identity
            .resolve()
            .ok_or(CoreError::IdentityUnavailable)?;
        let rule = spec.into_rule(symbol, &user);
        rule.validate()?;
        let created = self.api.create_alert(&rule).await?;
        tracing::debug!(symbol = %rule.symbol, kind = %rule.kind, "alert created");
        Ok(created)
    }

    /// Delete a previously fetched rule.
    ///
    /// On success the rule is removed from the local snapshot right away,
    /// independent of the next poll tick — the view should not keep showing
    /// a rule the user just deleted for up to a full period.
    pub async fn delete(&self, rule: &AlertRule) -> Result<(), CoreError> {
        let request = DeleteAlert::from_rule(rule)?;
        self.api.delete_alert(&request).await?;

        let id = request.id;
        self.alerts
            .mutate(|items| items.iter().filter(|r| r.id != Some(id)).cloned().collect());
        tracing::debug!(id, symbol = %request.symbol, "alert deleted");
        Ok(())
    }
}

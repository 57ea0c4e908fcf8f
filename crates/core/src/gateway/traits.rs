use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::alert::{AlertRule, DeleteAlert};
use crate::models::identity::Identity;
use crate::models::price::PricePoint;

/// Trait abstraction over the backend API surface.
///
/// The polling synchronizer and the mutation services only ever talk to
/// this trait, so the whole core can be exercised against an in-memory
/// implementation — the REST transport is just one impl.
#[async_trait]
pub trait AlertsApi: Send + Sync {
    /// Fetch the full live price list (one entry per tradable symbol).
    async fn list_prices(&self) -> Result<Vec<PricePoint>, CoreError>;

    /// Fetch the current price of a single symbol.
    async fn price_for(&self, symbol: &str) -> Result<PricePoint, CoreError>;

    /// Fetch every alert rule belonging to an identity.
    async fn list_alerts(&self, user: &Identity) -> Result<Vec<AlertRule>, CoreError>;

    /// Create a new alert rule. Returns the created resource when the
    /// backend echoes one back (it may reply with an empty body instead).
    async fn create_alert(&self, rule: &AlertRule) -> Result<Option<AlertRule>, CoreError>;

    /// Delete a previously created alert rule.
    async fn delete_alert(&self, request: &DeleteAlert) -> Result<(), CoreError>;
}

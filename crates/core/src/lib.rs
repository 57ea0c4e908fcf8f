pub mod errors;
pub mod gateway;
pub mod models;
pub mod services;
pub mod storage;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use gateway::rest::RestApi;
use gateway::traits::AlertsApi;
use models::alert::{AlertRule, AlertSpec};
use models::identity::Identity;
use models::price::{self, PricePoint};
use models::push::PushMessage;
use models::settings::Settings;
use services::alert_service::AlertService;
use services::identity_service::IdentityService;
use services::push_service::PushService;
use services::sync_service::{spawn_poller, PollHandle, Snapshot, SnapshotStore};
use services::view_service;
use storage::identity_store::IdentityStore;

use errors::CoreError;

/// Main entry point for the crypto-alerts core library.
///
/// Owns the identity, both live snapshot stores (prices and alert rules)
/// and the services that operate on them. The presentation layer holds one
/// of these, starts/stops the polling loops around view visibility, reads
/// the derived projections on every render, and issues mutations through
/// `create_alert` / `delete_alert`.
#[must_use]
pub struct CryptoAlerts {
    settings: Settings,
    api: Arc<dyn AlertsApi>,
    identity: Arc<IdentityService>,
    prices: Arc<SnapshotStore<PricePoint>>,
    alerts: Arc<SnapshotStore<AlertRule>>,
    alert_service: AlertService,
    push_service: PushService,
}

impl std::fmt::Debug for CryptoAlerts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoAlerts")
            .field("base_url", &self.settings.base_url)
            .field("prices", &self.prices.latest().len())
            .field("alerts", &self.alerts.latest().len())
            .finish()
    }
}

impl CryptoAlerts {
    /// Build a client against the REST backend described by `settings`.
    pub fn new(settings: Settings) -> Self {
        let api: Arc<dyn AlertsApi> = Arc::new(RestApi::new(settings.base_url.clone()));
        let identity_store = IdentityStore::new(settings.identity_path.clone());
        Self::build(settings, api, identity_store)
    }

    /// Build a client over any `AlertsApi` implementation — alternate
    /// transports, or in-memory mocks in tests.
    pub fn with_api(
        settings: Settings,
        api: Arc<dyn AlertsApi>,
        identity_store: IdentityStore,
    ) -> Self {
        Self::build(settings, api, identity_store)
    }

    fn build(settings: Settings, api: Arc<dyn AlertsApi>, identity_store: IdentityStore) -> Self {
        let identity = Arc::new(IdentityService::new(identity_store));
        let prices = Arc::new(SnapshotStore::new());
        let alerts = Arc::new(SnapshotStore::new());
        let alert_service =
            AlertService::new(Arc::clone(&api), Arc::clone(&identity), Arc::clone(&alerts));
        Self {
            settings,
            api,
            identity,
            prices,
            alerts,
            alert_service,
            push_service: PushService::new(),
        }
    }

    // ── Identity ────────────────────────────────────────────────────

    /// The per-installation identity, or `None` while the durable store is
    /// unavailable (resolution is retried on the next call).
    pub fn identity(&self) -> Option<Identity> {
        self.identity.resolve()
    }

    // ── Polling ─────────────────────────────────────────────────────

    /// Start the full-price-list polling loop. Intended for a long-lived
    /// provider scope that outlives individual view visits; the returned
    /// handle stops the loop when dropped.
    pub fn start_price_polling(&self) -> PollHandle {
        let api = Arc::clone(&self.api);
        spawn_poller(
            Arc::clone(&self.prices),
            self.settings.poll_interval,
            move || {
                let api = Arc::clone(&api);
                async move {
                    let mut prices = api.list_prices().await?;
                    price::sort_desc(&mut prices);
                    Ok(prices)
                }
            },
        )
    }

    /// Start the alert-rules polling loop. Intended to be bound to the
    /// visibility of the consuming view: call on focus, stop the handle on
    /// blur. While the identity is unresolved each tick is skipped and the
    /// previous snapshot stays in place.
    pub fn start_alert_polling(&self) -> PollHandle {
        let api = Arc::clone(&self.api);
        let identity = Arc::clone(&self.identity);
        spawn_poller(
            Arc::clone(&self.alerts),
            self.settings.poll_interval,
            move || {
                let api = Arc::clone(&api);
                let identity = Arc::clone(&identity);
                async move {
                    let user = identity.resolve().ok_or(CoreError::IdentityUnavailable)?;
                    api.list_alerts(&user).await
                }
            },
        )
    }

    // ── Snapshots ───────────────────────────────────────────────────

    pub fn prices(&self) -> Arc<Vec<PricePoint>> {
        self.prices.latest()
    }

    pub fn alerts(&self) -> Arc<Vec<AlertRule>> {
        self.alerts.latest()
    }

    pub fn subscribe_prices(&self) -> watch::Receiver<Snapshot<PricePoint>> {
        self.prices.subscribe()
    }

    pub fn subscribe_alerts(&self) -> watch::Receiver<Snapshot<AlertRule>> {
        self.alerts.subscribe()
    }

    // ── Derived views ───────────────────────────────────────────────

    /// Alert-rule count per symbol, recomputed from the current snapshot.
    pub fn alert_counts(&self) -> HashMap<String, usize> {
        view_service::alert_counts(&self.alerts.latest())
    }

    /// Prices of symbols the user has at least one alert on.
    pub fn tracked_prices(&self) -> Vec<PricePoint> {
        let counts = self.alert_counts();
        view_service::tracked_prices(&self.prices.latest(), &counts)
    }

    /// The full price list minus non-positive entries.
    pub fn visible_prices(&self) -> Vec<PricePoint> {
        view_service::visible_prices(&self.prices.latest())
    }

    /// Free-text search over the full price list.
    pub fn search_prices(&self, query: &str) -> Vec<PricePoint> {
        view_service::search_prices(&self.prices.latest(), query)
    }

    /// All rules attached to one symbol.
    pub fn alerts_for(&self, symbol: &str) -> Vec<AlertRule> {
        view_service::alerts_for(&self.alerts.latest(), symbol)
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Create an alert rule for `symbol`. Validates before submitting;
    /// errors surface synchronously to the caller.
    pub async fn create_alert(
        &self,
        symbol: &str,
        spec: AlertSpec,
    ) -> Result<Option<AlertRule>, CoreError> {
        self.alert_service.create(symbol, spec).await
    }

    /// Delete a previously fetched rule and optimistically drop it from
    /// the local snapshot.
    pub async fn delete_alert(&self, rule: &AlertRule) -> Result<(), CoreError> {
        self.alert_service.delete(rule).await
    }

    // ── One-off fetches ─────────────────────────────────────────────

    /// Current price of a single symbol, bypassing the polled snapshot.
    pub async fn price_for(&self, symbol: &str) -> Result<PricePoint, CoreError> {
        self.api.price_for(symbol).await
    }

    // ── Push ────────────────────────────────────────────────────────

    /// Hand a foreground push payload to the core; returns the parsed
    /// message (also fanned out to `subscribe_push` listeners), or `None`
    /// for payloads without title/body.
    pub fn deliver_push(&self, payload: &serde_json::Value) -> Option<PushMessage> {
        self.push_service.deliver(payload)
    }

    pub fn subscribe_push(&self) -> broadcast::Receiver<PushMessage> {
        self.push_service.subscribe()
    }
}

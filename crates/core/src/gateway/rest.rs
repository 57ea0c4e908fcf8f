use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::CoreError;
use crate::models::alert::{AlertRule, DeleteAlert};
use crate::models::identity::Identity;
use crate::models::price::PricePoint;

use super::http::HttpGateway;
use super::traits::AlertsApi;

/// The production `AlertsApi`: a thin mapping of the trait onto the
/// backend's REST endpoints via [`HttpGateway`].
pub struct RestApi {
    gateway: HttpGateway,
}

impl RestApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            gateway: HttpGateway::new(base_url),
        }
    }
}

impl std::fmt::Debug for RestApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestApi").field("gateway", &self.gateway).finish()
    }
}

/// The notifications endpoint has been observed returning either a JSON
/// array or a single bare object; both are accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[async_trait]
impl AlertsApi for RestApi {
    async fn list_prices(&self) -> Result<Vec<PricePoint>, CoreError> {
        self.gateway.get("crypto/list").await
    }

    async fn price_for(&self, symbol: &str) -> Result<PricePoint, CoreError> {
        self.gateway.get(&format!("crypto/symbol/{symbol}")).await
    }

    async fn list_alerts(&self, user: &Identity) -> Result<Vec<AlertRule>, CoreError> {
        let rules: OneOrMany<AlertRule> = self
            .gateway
            .get(&format!("user/{user}/notifications"))
            .await?;
        Ok(rules.into())
    }

    async fn create_alert(&self, rule: &AlertRule) -> Result<Option<AlertRule>, CoreError> {
        self.gateway.post("notification/", rule).await
    }

    async fn delete_alert(&self, request: &DeleteAlert) -> Result<(), CoreError> {
        self.gateway.delete("notification/", Some(request)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE_JSON: &str =
        r#"{"id":1,"type":"n-above","symbol":"BTCUSDT","userId":"abc","price":50000}"#;

    #[test]
    fn one_or_many_accepts_array() {
        let parsed: OneOrMany<AlertRule> =
            serde_json::from_str(&format!("[{RULE_JSON}]")).unwrap();
        let rules: Vec<AlertRule> = parsed.into();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn one_or_many_accepts_bare_object() {
        let parsed: OneOrMany<AlertRule> = serde_json::from_str(RULE_JSON).unwrap();
        let rules: Vec<AlertRule> = parsed.into();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id, Some(1));
        assert_eq!(rules[0].symbol, "BTCUSDT");
    }
}

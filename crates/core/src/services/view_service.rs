//! Pure projections over the two live snapshots. Nothing here touches the
//! network or holds state; everything is recomputed from scratch on each
//! call, so the results are always consistent with their inputs.

use std::collections::HashMap;

use crate::models::alert::{AlertKind, AlertRule, DEFAULT_WINDOW_MIN};
use crate::models::price::PricePoint;

/// Count alert rules per symbol. The sum of all counts equals the number
/// of rules; absent symbols simply have no entry.
pub fn alert_counts(alerts: &[AlertRule]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for rule in alerts {
        *counts.entry(rule.symbol.clone()).or_insert(0) += 1;
    }
    counts
}

/// The home view's "tracked" projection: prices whose symbol carries at
/// least one alert rule, input order preserved.
pub fn tracked_prices(
    prices: &[PricePoint],
    counts: &HashMap<String, usize>,
) -> Vec<PricePoint> {
    prices
        .iter()
        .filter(|p| counts.get(&p.symbol).copied().unwrap_or(0) > 0)
        .cloned()
        .collect()
}

/// Presentation-facing filter: entries with a non-positive price are not
/// shown to the user.
pub fn visible_prices(prices: &[PricePoint]) -> Vec<PricePoint> {
    prices.iter().filter(|p| p.price > 0.0).cloned().collect()
}

/// Case-insensitive substring search over the raw symbol and its display
/// variant, so both "btcusdt" and "btc/usd" find BTCUSDT. A blank query
/// returns the list unchanged.
pub fn search_prices(prices: &[PricePoint], query: &str) -> Vec<PricePoint> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return prices.to_vec();
    }
    prices
        .iter()
        .filter(|p| {
            p.symbol.to_lowercase().contains(&needle)
                || display_symbol(&p.symbol).to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// All rules attached to one symbol (the tracked-symbol detail view).
pub fn alerts_for(alerts: &[AlertRule], symbol: &str) -> Vec<AlertRule> {
    alerts.iter().filter(|r| r.symbol == symbol).cloned().collect()
}

/// Display form of a raw symbol: the trailing quote-currency code becomes
/// a separator plus currency, e.g. `BTCUSDT` → `BTC/USD`.
pub fn display_symbol(symbol: &str) -> String {
    match symbol.strip_suffix("USDT") {
        Some(base) => format!("{base}/USD"),
        None => symbol.to_string(),
    }
}

/// One-line, user-facing description of a rule's condition.
pub fn describe_rule(rule: &AlertRule) -> String {
    match rule.kind {
        AlertKind::Above => "When price goes Above".to_string(),
        AlertKind::Below => "When price goes Below".to_string(),
        AlertKind::PercentAbove => format!(
            "When price Rises by {}%",
            rule.percentage.map_or_else(|| "?".to_string(), |p| p.to_string())
        ),
        AlertKind::PercentBelow => format!(
            "When price Falls by {}%",
            rule.percentage.map_or_else(|| "?".to_string(), |p| p.to_string())
        ),
        AlertKind::Rally => format!(
            "Short term rally within {} min",
            rule.time.unwrap_or(DEFAULT_WINDOW_MIN)
        ),
        AlertKind::DirectionChange => format!(
            "Change of direction within {} min",
            rule.time.unwrap_or(DEFAULT_WINDOW_MIN)
        ),
    }
}

use serde::{Deserialize, Serialize};

/// A single entry of the live market snapshot: one tradable instrument and
/// its latest price.
///
/// The whole collection is replaced atomically on each successful poll —
/// there is no incremental patching, and `symbol` is the unique key within
/// one snapshot. `price` is expected to be a non-negative finite number;
/// entries with a non-positive price are kept in the raw snapshot and only
/// filtered out of user-facing projections (see `services::view_service`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub symbol: String,
    pub price: f64,
}

impl PricePoint {
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
        }
    }
}

/// Sort a refreshed snapshot descending by price, the order the home list
/// renders in. `total_cmp` keeps the sort total even if a backend ever
/// sends NaN.
pub fn sort_desc(points: &mut [PricePoint]) {
    points.sort_by(|a, b| b.price.total_cmp(&a.price));
}

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::identity::Identity;

/// Default observation window for rally / direction-change rules, in minutes.
pub const DEFAULT_WINDOW_MIN: u32 = 60;

/// The kind of condition a rule watches for. Serialized as the backend's
/// wire names (`n-above`, `n-rally`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    /// Fire when the price rises above an absolute target
    #[serde(rename = "n-above")]
    Above,
    /// Fire when the price falls below an absolute target
    #[serde(rename = "n-below")]
    Below,
    /// Fire when the price rises by a percentage from its creation-time baseline
    #[serde(rename = "n-percent-above")]
    PercentAbove,
    /// Fire when the price falls by a percentage from its creation-time baseline
    #[serde(rename = "n-percent-below")]
    PercentBelow,
    /// Fire on a short-term rapid move within a fixed window
    #[serde(rename = "n-rally")]
    Rally,
    /// Fire on a trend direction reversal within a fixed window
    #[serde(rename = "n-change")]
    DirectionChange,
}

impl AlertKind {
    /// The backend wire name for this kind.
    pub fn wire_name(&self) -> &'static str {
        match self {
            AlertKind::Above => "n-above",
            AlertKind::Below => "n-below",
            AlertKind::PercentAbove => "n-percent-above",
            AlertKind::PercentBelow => "n-percent-below",
            AlertKind::Rally => "n-rally",
            AlertKind::DirectionChange => "n-change",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// One notification configuration as it travels over the wire.
///
/// `id` is server-assigned and absent until the rule has been created.
/// Which optional fields are populated is fully determined by `kind`
/// (see [`AlertSpec`]); `spec()` is the validating view of that contract.
/// Rules are never mutated in place — changing one means delete + recreate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(rename = "type")]
    pub kind: AlertKind,

    pub symbol: String,

    #[serde(rename = "userId")]
    pub user_id: String,

    /// Absolute target (above/below) or creation-time baseline (percent kinds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Percent delta from the baseline, percent kinds only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,

    /// Observation window in minutes, rally/direction kinds only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u32>,
}

/// The four alert families as a sum type: each variant carries exactly the
/// fields its kind requires, so a spec cannot express an invalid field
/// combination. `into_rule` is the total mapping onto the wire shape;
/// [`AlertRule::spec`] is the partial mapping back.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertSpec {
    Above { target: f64 },
    Below { target: f64 },
    PercentAbove { baseline: f64, percentage: f64 },
    PercentBelow { baseline: f64, percentage: f64 },
    Rally { window_min: u32 },
    DirectionChange { window_min: u32 },
}

impl AlertSpec {
    /// Rally spec with the default 60-minute window.
    pub fn rally() -> Self {
        AlertSpec::Rally {
            window_min: DEFAULT_WINDOW_MIN,
        }
    }

    /// Direction-change spec with the default 60-minute window.
    pub fn direction_change() -> Self {
        AlertSpec::DirectionChange {
            window_min: DEFAULT_WINDOW_MIN,
        }
    }

    pub fn kind(&self) -> AlertKind {
        match self {
            AlertSpec::Above { .. } => AlertKind::Above,
            AlertSpec::Below { .. } => AlertKind::Below,
            AlertSpec::PercentAbove { .. } => AlertKind::PercentAbove,
            AlertSpec::PercentBelow { .. } => AlertKind::PercentBelow,
            AlertSpec::Rally { .. } => AlertKind::Rally,
            AlertSpec::DirectionChange { .. } => AlertKind::DirectionChange,
        }
    }

    /// Build the wire rule for this spec, scoped to a symbol and identity.
    /// The result carries no `id` — that is assigned by the backend.
    pub fn into_rule(self, symbol: impl Into<String>, user: &Identity) -> AlertRule {
        let (price, percentage, time) = match self {
            AlertSpec::Above { target } | AlertSpec::Below { target } => {
                (Some(target), None, None)
            }
            AlertSpec::PercentAbove {
                baseline,
                percentage,
            }
            | AlertSpec::PercentBelow {
                baseline,
                percentage,
            } => (Some(baseline), Some(percentage), None),
            AlertSpec::Rally { window_min } | AlertSpec::DirectionChange { window_min } => {
                (None, None, Some(window_min))
            }
        };
        AlertRule {
            id: None,
            kind: self.kind(),
            symbol: symbol.into(),
            user_id: user.as_str().to_string(),
            price,
            percentage,
            time,
        }
    }
}

impl AlertRule {
    /// Interpret this wire rule as a typed spec, verifying that the set of
    /// populated optional fields matches the rule's kind exactly: required
    /// fields present and finite, everything else absent.
    pub fn spec(&self) -> Result<AlertSpec, CoreError> {
        match self.kind {
            AlertKind::Above | AlertKind::Below => {
                let target = require_finite("price", self.price)?;
                require_absent("percentage", self.percentage.is_some())?;
                require_absent("time", self.time.is_some())?;
                Ok(match self.kind {
                    AlertKind::Above => AlertSpec::Above { target },
                    _ => AlertSpec::Below { target },
                })
            }
            AlertKind::PercentAbove | AlertKind::PercentBelow => {
                let baseline = require_finite("price", self.price)?;
                let percentage = require_finite("percentage", self.percentage)?;
                require_absent("time", self.time.is_some())?;
                Ok(match self.kind {
                    AlertKind::PercentAbove => AlertSpec::PercentAbove {
                        baseline,
                        percentage,
                    },
                    _ => AlertSpec::PercentBelow {
                        baseline,
                        percentage,
                    },
                })
            }
            AlertKind::Rally | AlertKind::DirectionChange => {
                let window_min = self
                    .time
                    .ok_or_else(|| CoreError::invalid("time", "window is required"))?;
                require_absent("price", self.price.is_some())?;
                require_absent("percentage", self.percentage.is_some())?;
                Ok(match self.kind {
                    AlertKind::Rally => AlertSpec::Rally { window_min },
                    _ => AlertSpec::DirectionChange { window_min },
                })
            }
        }
    }

    /// Full pre-submission validation: non-empty scope fields plus the
    /// per-kind field contract. Fails fast — callers must not issue the
    /// network request when this errors.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.symbol.trim().is_empty() {
            return Err(CoreError::invalid("symbol", "must not be empty"));
        }
        if self.user_id.trim().is_empty() {
            return Err(CoreError::invalid("userId", "must not be empty"));
        }
        self.spec().map(|_| ())
    }
}

fn require_finite(field: &str, value: Option<f64>) -> Result<f64, CoreError> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(CoreError::invalid(field, format!("{v} is not a finite number"))),
        None => Err(CoreError::invalid(field, "is required for this alert type")),
    }
}

fn require_absent(field: &str, present: bool) -> Result<(), CoreError> {
    if present {
        return Err(CoreError::invalid(
            field,
            "must not be set for this alert type",
        ));
    }
    Ok(())
}

/// Deletion request body: the rule's `id` plus a restated copy of its
/// defining fields. The backend is the source of truth for matching — the
/// client forwards its last-known snapshot of the rule being removed.
/// `time` is intentionally not part of the deletion contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteAlert {
    pub id: i64,

    #[serde(rename = "type")]
    pub kind: AlertKind,

    #[serde(rename = "userId")]
    pub user_id: String,

    pub symbol: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl DeleteAlert {
    /// Restate a fetched rule as a deletion request. Only rules that have
    /// been created (and therefore carry a server-assigned id) can be
    /// deleted.
    pub fn from_rule(rule: &AlertRule) -> Result<Self, CoreError> {
        let id = rule
            .id
            .ok_or_else(|| CoreError::invalid("id", "rule has not been created yet"))?;
        Ok(Self {
            id,
            kind: rule.kind,
            user_id: rule.user_id.clone(),
            symbol: rule.symbol.clone(),
            price: rule.price,
            percentage: rule.percentage,
        })
    }
}

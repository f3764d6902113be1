//! Settlement configuration

use serde::{Deserialize, Serialize};

use crate::types::Strategy;

/// Tunables for the distributors and the group ledger facade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Fractional digits of the ledger currency; shares are rounded half-up to this scale
    #[serde(default = "default_currency_scale")]
    pub currency_scale: i64,
    /// Strategy used when a caller does not name one
    #[serde(default)]
    pub default_strategy: Strategy,
}

fn default_currency_scale() -> i64 {
    2
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            currency_scale: default_currency_scale(),
            default_strategy: Strategy::default(),
        }
    }
}

impl SettlementConfig {
    /// Config for a currency with the given number of fractional digits
    pub fn with_scale(currency_scale: i64) -> Self {
        Self {
            currency_scale,
            ..Self::default()
        }
    }
}

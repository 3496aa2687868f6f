use serde::{Deserialize, Serialize};

/// Names of the three key-value slots the ledger persists to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    pub income: String,
    pub cost: String,
    pub goals: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            income: "shop_ledger_income_v1".to_string(),
            cost: "shop_ledger_cost_v1".to_string(),
            goals: "shop_ledger_goal_v1".to_string(),
        }
    }
}

/// Host-supplied configuration for a `ShopLedger`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage_keys: StorageKeys,

    /// Number of months in the default trend window.
    pub rolling_window: usize,

    /// Reject snapshots whose `version` is not the current one.
    /// Off by default: unknown versions are imported as-is.
    pub strict_import_version: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_keys: StorageKeys::default(),
            rolling_window: 6,
            strict_import_version: false,
        }
    }
}

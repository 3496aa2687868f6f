use serde::{Deserialize, Serialize};

use super::goal::GoalMap;
use super::ledger::Ledger;
use super::record::{CostRecord, IncomeRecord};

/// Portable export document: the whole ledger plus a version tag and the
/// time it was taken.
///
/// ```text
/// { "version": 1, "exportedAt": "...", "income": [...], "cost": [...], "goals": {...} }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u64,

    /// ISO-8601 UTC timestamp
    pub exported_at: String,

    pub income: Vec<IncomeRecord>,

    pub cost: Vec<CostRecord>,

    pub goals: GoalMap,
}

impl Snapshot {
    /// Drop the envelope and keep the ledger data.
    pub fn into_ledger(self) -> Ledger {
        Ledger {
            income: self.income,
            cost: self.cost,
            goals: self.goals,
        }
    }
}

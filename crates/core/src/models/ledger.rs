use serde::{Deserialize, Serialize};

use super::goal::GoalMap;
use super::record::{CostRecord, IncomeRecord};

/// The main data container: both record collections plus monthly goals.
///
/// Each collection is persisted to its own storage slot, and the whole thing
/// is what a snapshot exports and an import replaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// Income records in insertion order
    pub income: Vec<IncomeRecord>,

    /// Cost records in insertion order
    pub cost: Vec<CostRecord>,

    /// Revenue target per month
    pub goals: GoalMap,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.cost.is_empty() && self.goals.is_empty()
    }
}

use crate::models::ledger::Ledger;
use crate::models::month::YearMonth;
use crate::models::record::{new_record_id, CostRecord, Entry, IncomeRecord};

/// Applies record and goal mutations to a ledger.
///
/// Pure business logic: no storage, no logging of its own. The facade
/// persists after each call.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Append an income record, giving it a fresh id if its id is empty or
    /// already taken. Returns the id it was stored under.
    pub fn add_income(&self, ledger: &mut Ledger, mut record: IncomeRecord) -> String {
        record.id = Self::unique_id(&ledger.income, record.id);
        let id = record.id.clone();
        ledger.income.push(record);
        id
    }

    /// Append a cost record. Same id rules as [`Self::add_income`].
    pub fn add_cost(&self, ledger: &mut Ledger, mut record: CostRecord) -> String {
        record.id = Self::unique_id(&ledger.cost, record.id);
        let id = record.id.clone();
        ledger.cost.push(record);
        id
    }

    /// Remove every income record with this id. Returns how many were removed;
    /// an unknown id is not an error.
    pub fn remove_income(&self, ledger: &mut Ledger, id: &str) -> usize {
        let before = ledger.income.len();
        ledger.income.retain(|r| r.id != id);
        before - ledger.income.len()
    }

    pub fn remove_cost(&self, ledger: &mut Ledger, id: &str) -> usize {
        let before = ledger.cost.len();
        ledger.cost.retain(|r| r.id != id);
        before - ledger.cost.len()
    }

    /// Store `max(0, floor(value))` as the goal for `month`.
    pub fn set_goal(&self, ledger: &mut Ledger, month: &YearMonth, value: f64) -> u64 {
        ledger.goals.set(month, value)
    }

    fn unique_id<E: Entry>(existing: &[E], candidate: String) -> String {
        let mut id = candidate;
        while id.is_empty() || existing.iter().any(|e| e.id() == id) {
            id = new_record_id();
        }
        id
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

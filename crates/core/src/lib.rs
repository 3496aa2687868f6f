pub mod errors;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

use chrono::{DateTime, NaiveDate, Utc};
use models::{
    goal::GoalMap,
    ledger::Ledger,
    month::YearMonth,
    record::{CostCategory, CostRecord, IncomeCategory, IncomeRecord},
    settings::Settings,
    snapshot::Snapshot,
    summary::MonthSummary,
};
use services::{aggregation_service::AggregationService, ledger_service::LedgerService};
use storage::{format, kv::KeyValueStore, manager::StorageManager};

use errors::CoreError;

/// Main entry point for the shop ledger core library.
///
/// Owns the ledger and the store it writes through to. Every mutation is
/// persisted before it returns; if the write fails the in-memory change is
/// rolled back and the error returned.
///
/// Single-threaded by construction (`&mut self` on every mutation). A
/// multi-threaded host should wrap it in one `Mutex`.
#[must_use]
pub struct ShopLedger<S: KeyValueStore> {
    ledger: Ledger,
    store: S,
    settings: Settings,
    ledger_service: LedgerService,
    aggregation_service: AggregationService,
}

impl<S: KeyValueStore> std::fmt::Debug for ShopLedger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopLedger")
            .field("income", &self.ledger.income.len())
            .field("cost", &self.ledger.cost.len())
            .field("goals", &self.ledger.goals.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl<S: KeyValueStore> ShopLedger<S> {
    /// Load the ledger from `store` using default settings.
    /// Missing or corrupt slots start empty; opening never fails.
    pub fn open(store: S) -> Self {
        Self::open_with_settings(store, Settings::default())
    }

    /// Load the ledger from `store` using the given slot names and options.
    pub fn open_with_settings(store: S, settings: Settings) -> Self {
        let ledger = StorageManager::load(&store, &settings.storage_keys);
        tracing::debug!(
            income = ledger.income.len(),
            cost = ledger.cost.len(),
            goals = ledger.goals.len(),
            "ledger loaded"
        );
        Self {
            ledger,
            store,
            settings,
            ledger_service: LedgerService::new(),
            aggregation_service: AggregationService::new(),
        }
    }

    // ── Records ─────────────────────────────────────────────────────

    /// Record income. Negative or non-finite amounts are stored as 0.
    /// Returns the new record's id.
    pub fn add_income(
        &mut self,
        date: NaiveDate,
        amount: f64,
        category: IncomeCategory,
    ) -> Result<String, CoreError> {
        self.add_income_record(IncomeRecord::new(date, amount, category, ""))
    }

    /// Record income with a note attached.
    pub fn add_income_with_note(
        &mut self,
        date: NaiveDate,
        amount: f64,
        category: IncomeCategory,
        note: impl Into<String>,
    ) -> Result<String, CoreError> {
        self.add_income_record(IncomeRecord::new(date, amount, category, note))
    }

    /// Append a prepared income record. Its id is replaced if empty or taken.
    pub fn add_income_record(&mut self, record: IncomeRecord) -> Result<String, CoreError> {
        let id = self.ledger_service.add_income(&mut self.ledger, record);
        if let Err(e) = self.persist_income() {
            self.ledger.income.pop();
            return Err(e);
        }
        tracing::debug!(id = %id, "income added");
        Ok(id)
    }

    /// Record a cost. Negative or non-finite amounts are stored as 0.
    pub fn add_cost(
        &mut self,
        date: NaiveDate,
        amount: f64,
        category: CostCategory,
    ) -> Result<String, CoreError> {
        self.add_cost_record(CostRecord::new(date, amount, category, ""))
    }

    /// Record a cost with a note attached.
    pub fn add_cost_with_note(
        &mut self,
        date: NaiveDate,
        amount: f64,
        category: CostCategory,
        note: impl Into<String>,
    ) -> Result<String, CoreError> {
        self.add_cost_record(CostRecord::new(date, amount, category, note))
    }

    pub fn add_cost_record(&mut self, record: CostRecord) -> Result<String, CoreError> {
        let id = self.ledger_service.add_cost(&mut self.ledger, record);
        if let Err(e) = self.persist_cost() {
            self.ledger.cost.pop();
            return Err(e);
        }
        tracing::debug!(id = %id, "cost added");
        Ok(id)
    }

    /// Remove an income record by id. Unknown ids are a no-op.
    pub fn remove_income(&mut self, id: &str) -> Result<(), CoreError> {
        let previous = self.ledger.income.clone();
        if self.ledger_service.remove_income(&mut self.ledger, id) == 0 {
            return Ok(());
        }
        if let Err(e) = self.persist_income() {
            self.ledger.income = previous;
            return Err(e);
        }
        tracing::debug!(id, "income removed");
        Ok(())
    }

    /// Remove a cost record by id. Unknown ids are a no-op.
    pub fn remove_cost(&mut self, id: &str) -> Result<(), CoreError> {
        let previous = self.ledger.cost.clone();
        if self.ledger_service.remove_cost(&mut self.ledger, id) == 0 {
            return Ok(());
        }
        if let Err(e) = self.persist_cost() {
            self.ledger.cost = previous;
            return Err(e);
        }
        tracing::debug!(id, "cost removed");
        Ok(())
    }

    /// Get all income records in insertion order.
    #[must_use]
    pub fn income(&self) -> &[IncomeRecord] {
        &self.ledger.income
    }

    /// Get all cost records in insertion order.
    #[must_use]
    pub fn cost(&self) -> &[CostRecord] {
        &self.ledger.cost
    }

    /// Income records dated in `month`, newest first (table order).
    #[must_use]
    pub fn income_for_month(&self, month: &YearMonth) -> Vec<&IncomeRecord> {
        self.aggregation_service
            .entries_for_month(&self.ledger.income, month)
    }

    /// Cost records dated in `month`, newest first (table order).
    #[must_use]
    pub fn cost_for_month(&self, month: &YearMonth) -> Vec<&CostRecord> {
        self.aggregation_service
            .entries_for_month(&self.ledger.cost, month)
    }

    // ── Goals ───────────────────────────────────────────────────────

    /// Save the revenue goal for `month`, clamped to `max(0, floor(value))`.
    /// Saving 0 clears it. Returns the stored value.
    pub fn set_goal(&mut self, month: &YearMonth, value: f64) -> Result<u64, CoreError> {
        let key = month.to_string();
        let previous = self.ledger.goals.raw(&key);
        let goal = self.ledger_service.set_goal(&mut self.ledger, month, value);
        if let Err(e) = self.persist_goals() {
            self.ledger.goals.restore(key, previous);
            return Err(e);
        }
        tracing::debug!(month = %month, goal, "goal saved");
        Ok(goal)
    }

    /// Goal for `month`, 0 when unset.
    #[must_use]
    pub fn goal(&self, month: &YearMonth) -> u64 {
        self.ledger.goals.get(month)
    }

    #[must_use]
    pub fn goals(&self) -> &GoalMap {
        &self.ledger.goals
    }

    // ── Summaries ───────────────────────────────────────────────────

    #[must_use]
    pub fn month_summary(&self, month: &YearMonth) -> MonthSummary {
        self.aggregation_service.month_summary(&self.ledger, month)
    }

    /// `n` consecutive months ending at `end`, oldest first.
    #[must_use]
    pub fn rolling_months(&self, end: YearMonth, n: usize) -> Vec<YearMonth> {
        self.aggregation_service.rolling_months(end, n)
    }

    /// Per-month summaries for the `n` months ending at `end`, oldest first.
    #[must_use]
    pub fn rolling_summaries(&self, end: YearMonth, n: usize) -> Vec<MonthSummary> {
        self.aggregation_service
            .rolling_summaries(&self.ledger, end, n)
    }

    /// Rolling summaries over the configured trend window.
    #[must_use]
    pub fn trend(&self, end: YearMonth) -> Vec<MonthSummary> {
        self.rolling_summaries(end, self.settings.rolling_window)
    }

    /// Percent of the goal reached in `month` (0..=999).
    #[must_use]
    pub fn goal_progress(&self, month: &YearMonth) -> u32 {
        self.aggregation_service.goal_progress(&self.ledger, month)
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Snapshot of the whole ledger, stamped with the current time.
    #[must_use]
    pub fn export_snapshot(&self) -> Snapshot {
        self.export_snapshot_at(Utc::now())
    }

    #[must_use]
    pub fn export_snapshot_at(&self, exported_at: DateTime<Utc>) -> Snapshot {
        format::export_snapshot(&self.ledger, exported_at)
    }

    /// Export the whole ledger as pretty-printed snapshot JSON.
    pub fn export_json(&self) -> Result<String, CoreError> {
        format::encode(&self.export_snapshot())
    }

    /// Validate a snapshot document and, only if it is valid, replace the
    /// entire ledger with its contents. On any error the ledger is untouched.
    pub fn import_json(&mut self, text: &str) -> Result<(), CoreError> {
        let imported = match format::import_snapshot(text, self.settings.strict_import_version) {
            Ok(ledger) => ledger,
            Err(e) => {
                tracing::warn!(error = %e, "snapshot rejected");
                return Err(e.into());
            }
        };
        self.replace_all(imported)?;
        tracing::info!(
            income = self.ledger.income.len(),
            cost = self.ledger.cost.len(),
            goals = self.ledger.goals.len(),
            "snapshot imported"
        );
        Ok(())
    }

    /// Swap in a complete, already-validated ledger and persist all slots.
    ///
    /// If a slot write fails, memory is restored and the previous ledger is
    /// written back to every slot, so storage does not keep a mix of old and
    /// new data.
    pub fn replace_all(&mut self, ledger: Ledger) -> Result<(), CoreError> {
        let previous = std::mem::replace(&mut self.ledger, ledger);
        if let Err(e) = self.persist_all() {
            self.ledger = previous;
            if let Err(restore) = self.persist_all() {
                tracing::warn!(error = %restore, "failed to restore slots after an interrupted replace");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Clear every record and goal, and persist the empty state.
    pub fn reset_all(&mut self) -> Result<(), CoreError> {
        self.replace_all(Ledger::new())?;
        tracing::info!("ledger reset");
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    // ── Internal ────────────────────────────────────────────────────

    fn persist_income(&mut self) -> Result<(), CoreError> {
        StorageManager::save_income(&mut self.store, &self.settings.storage_keys, &self.ledger.income)
    }

    fn persist_cost(&mut self) -> Result<(), CoreError> {
        StorageManager::save_cost(&mut self.store, &self.settings.storage_keys, &self.ledger.cost)
    }

    fn persist_goals(&mut self) -> Result<(), CoreError> {
        StorageManager::save_goals(&mut self.store, &self.settings.storage_keys, &self.ledger.goals)
    }

    fn persist_all(&mut self) -> Result<(), CoreError> {
        StorageManager::save_all(&mut self.store, &self.settings.storage_keys, &self.ledger)
    }
}

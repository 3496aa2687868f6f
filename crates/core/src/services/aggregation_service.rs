use crate::models::ledger::Ledger;
use crate::models::month::YearMonth;
use crate::models::record::Entry;
use crate::models::summary::MonthSummary;

/// Upper bound on goal progress, in percent.
pub const MAX_GOAL_PROGRESS: u32 = 999;

/// Derives monthly and rolling-window figures from a ledger.
///
/// Stateless: everything is recomputed from the full collections on every
/// call, so there is no cached total that can drift out of sync.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Totals for one month. Records are bucketed purely by the `YYYY-MM`
    /// prefix of their date; records with malformed dates match no month.
    pub fn month_summary(&self, ledger: &Ledger, month: &YearMonth) -> MonthSummary {
        let mut summary = MonthSummary::empty(*month);

        for record in ledger.income.iter().filter(|r| r.month() == Some(*month)) {
            summary.total_income += record.amount;
            summary.income_by_category.add(&record.category, record.amount);
        }

        summary.total_cost = ledger
            .cost
            .iter()
            .filter(|r| r.month() == Some(*month))
            .map(|r| r.amount)
            .sum();

        summary.profit = summary.total_income - summary.total_cost;
        summary
    }

    /// `n` consecutive months ending at `end`, oldest first.
    ///
    /// `rolling_months(2026-02, 6)` is `2025-09 ..= 2026-02`. `n == 0` gives an
    /// empty list; months that would fall before `0000-01` are left out.
    pub fn rolling_months(&self, end: YearMonth, n: usize) -> Vec<YearMonth> {
        (0..n)
            .rev()
            .filter_map(|back| u32::try_from(back).ok())
            .filter_map(|back| end.checked_sub_months(back))
            .collect()
    }

    /// One summary per month of the rolling window ending at `end`.
    pub fn rolling_summaries(&self, ledger: &Ledger, end: YearMonth, n: usize) -> Vec<MonthSummary> {
        self.rolling_months(end, n)
            .iter()
            .map(|month| self.month_summary(ledger, month))
            .collect()
    }

    /// Income for `month` as a percentage of its goal, rounded and capped at
    /// [`MAX_GOAL_PROGRESS`]. 0 when no goal (or a zero goal) is set.
    pub fn goal_progress(&self, ledger: &Ledger, month: &YearMonth) -> u32 {
        let goal = ledger.goals.get(month);
        if goal == 0 {
            return 0;
        }
        let income = self.month_summary(ledger, month).total_income;
        let pct = (income / goal as f64 * 100.0).round();
        pct.clamp(0.0, f64::from(MAX_GOAL_PROGRESS)) as u32
    }

    /// Records dated in `month`, newest date first.
    pub fn entries_for_month<'a, E: Entry>(&self, records: &'a [E], month: &YearMonth) -> Vec<&'a E> {
        let mut entries: Vec<&E> = records
            .iter()
            .filter(|r| r.month() == Some(*month))
            .collect();
        entries.sort_by(|a, b| b.date().cmp(a.date()));
        entries
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}

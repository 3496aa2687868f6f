use serde::{Deserialize, Serialize};

use super::month::YearMonth;
use super::record::IncomeCategory;

/// Income split across the three income categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    pub market: f64,
    pub online: f64,
    pub other: f64,
}

impl IncomeBreakdown {
    /// Sum for `category`; unrecognized names read the `other` bucket.
    pub fn get(&self, category: &IncomeCategory) -> f64 {
        *self.slot(category)
    }

    pub fn add(&mut self, category: &IncomeCategory, amount: f64) {
        *self.slot_mut(category) += amount;
    }

    fn slot(&self, category: &IncomeCategory) -> &f64 {
        match category {
            IncomeCategory::Market => &self.market,
            IncomeCategory::Online => &self.online,
            IncomeCategory::Other | IncomeCategory::Unrecognized(_) => &self.other,
        }
    }

    fn slot_mut(&mut self, category: &IncomeCategory) -> &mut f64 {
        match category {
            IncomeCategory::Market => &mut self.market,
            IncomeCategory::Online => &mut self.online,
            IncomeCategory::Other | IncomeCategory::Unrecognized(_) => &mut self.other,
        }
    }

    /// Sum of all three buckets.
    pub fn total(&self) -> f64 {
        self.market + self.online + self.other
    }
}

/// Derived totals for one month. Never stored; recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    /// The month these totals cover
    pub month: YearMonth,

    /// Sum of income amounts dated in this month
    pub total_income: f64,

    /// Sum of cost amounts dated in this month
    pub total_cost: f64,

    /// `total_income - total_cost`
    pub profit: f64,

    pub income_by_category: IncomeBreakdown,
}

impl MonthSummary {
    /// An all-zero summary for `month`.
    pub fn empty(month: YearMonth) -> Self {
        Self {
            month,
            total_income: 0.0,
            total_cost: 0.0,
            profit: 0.0,
            income_by_category: IncomeBreakdown::default(),
        }
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::month::YearMonth;
use super::record::amount_from_value;

/// Clamp a requested revenue target to a non-negative whole number.
pub fn clamp_goal(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        // `as` saturates at u64::MAX
        value.floor() as u64
    } else {
        0
    }
}

/// Monthly revenue targets keyed by `"YYYY-MM"`.
///
/// Keys are kept as strings so snapshots round-trip unchanged; values are
/// always non-negative integers. Setting a month to 0 is how a goal is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GoalMap(BTreeMap<String, u64>);

impl GoalMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target for `month`, or 0 when none was saved.
    pub fn get(&self, month: &YearMonth) -> u64 {
        self.0.get(&month.to_string()).copied().unwrap_or(0)
    }

    /// Create or overwrite the target for `month`. Returns the stored value.
    pub fn set(&mut self, month: &YearMonth, value: f64) -> u64 {
        let goal = clamp_goal(value);
        self.0.insert(month.to_string(), goal);
        goal
    }

    pub(crate) fn restore(&mut self, key: String, previous: Option<u64>) {
        match previous {
            Some(goal) => self.0.insert(key, goal),
            None => self.0.remove(&key),
        };
    }

    pub(crate) fn raw(&self, key: &str) -> Option<u64> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// All entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<'de> Deserialize<'de> for GoalMap {
    /// Values are coerced the same way goals are saved: numeric strings are
    /// accepted, fractions floored, negatives and junk become 0.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .map(|(month, value)| (month, clamp_goal(amount_from_value(&value))))
                .collect(),
        ))
    }
}

impl FromIterator<(YearMonth, u64)> for GoalMap {
    fn from_iter<I: IntoIterator<Item = (YearMonth, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(m, v)| (m.to_string(), v)).collect())
    }
}

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::CoreError;
use crate::models::goal::GoalMap;
use crate::models::ledger::Ledger;
use crate::models::record::{CostRecord, IncomeRecord};
use crate::models::settings::StorageKeys;

use super::kv::KeyValueStore;

/// High-level storage operations: load/save the ledger's three slots.
pub struct StorageManager;

impl StorageManager {
    /// Load all three slots. A slot that is missing, empty, unreadable or not
    /// valid JSON falls back to an empty collection; loading never fails.
    /// Individual records that do not decode are dropped from the result.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, keys: &StorageKeys) -> Ledger {
        Ledger {
            income: Self::load_records(store, &keys.income),
            cost: Self::load_records(store, &keys.cost),
            goals: Self::load_slot(store, &keys.goals),
        }
    }

    pub fn save_income<S: KeyValueStore + ?Sized>(
        store: &mut S,
        keys: &StorageKeys,
        income: &[IncomeRecord],
    ) -> Result<(), CoreError> {
        Self::save_slot(store, &keys.income, income)
    }

    pub fn save_cost<S: KeyValueStore + ?Sized>(
        store: &mut S,
        keys: &StorageKeys,
        cost: &[CostRecord],
    ) -> Result<(), CoreError> {
        Self::save_slot(store, &keys.cost, cost)
    }

    pub fn save_goals<S: KeyValueStore + ?Sized>(
        store: &mut S,
        keys: &StorageKeys,
        goals: &GoalMap,
    ) -> Result<(), CoreError> {
        Self::save_slot(store, &keys.goals, goals)
    }

    /// Write every slot. All three are serialized before the first write, so
    /// an encoding failure touches nothing.
    pub fn save_all<S: KeyValueStore + ?Sized>(
        store: &mut S,
        keys: &StorageKeys,
        ledger: &Ledger,
    ) -> Result<(), CoreError> {
        let slots = [
            (keys.income.as_str(), Self::encode_slot(&keys.income, &ledger.income)?),
            (keys.cost.as_str(), Self::encode_slot(&keys.cost, &ledger.cost)?),
            (keys.goals.as_str(), Self::encode_slot(&keys.goals, &ledger.goals)?),
        ];
        for (key, json) in &slots {
            Self::write_slot(store, key, json)?;
        }
        Ok(())
    }

    /// Read a collection slot element by element. A record that does not
    /// decode is skipped with a warning instead of discarding the whole slot.
    fn load_records<S, T>(store: &S, key: &str) -> Vec<T>
    where
        S: KeyValueStore + ?Sized,
        T: DeserializeOwned,
    {
        let items: Vec<Value> = Self::load_slot(store, key);
        let total = items.len();
        let records: Vec<T> = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    let e = CoreError::from(e);
                    tracing::warn!(slot = key, index, error = %e, "skipping undecodable record");
                    None
                }
            })
            .collect();
        if records.len() < total {
            tracing::warn!(slot = key, kept = records.len(), total, "slot loaded with records skipped");
        }
        records
    }

    fn load_slot<S, T>(store: &S, key: &str) -> T
    where
        S: KeyValueStore + ?Sized,
        T: DeserializeOwned + Default,
    {
        let raw = match store.get(key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return T::default(),
            Err(e) => {
                tracing::warn!(slot = key, error = %e, "failed to read slot, starting empty");
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                let e = CoreError::from(e);
                tracing::warn!(slot = key, error = %e, "unparseable slot, starting empty");
                T::default()
            }
        }
    }

    fn save_slot<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), CoreError>
    where
        S: KeyValueStore + ?Sized,
        T: Serialize + ?Sized,
    {
        let json = Self::encode_slot(key, value)?;
        Self::write_slot(store, key, &json)
    }

    fn encode_slot<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, CoreError> {
        serde_json::to_string(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize slot '{key}': {e}")))
    }

    fn write_slot<S: KeyValueStore + ?Sized>(store: &mut S, key: &str, json: &str) -> Result<(), CoreError> {
        store.set(key, json)?;
        tracing::debug!(slot = key, bytes = json.len(), "slot persisted");
        Ok(())
    }
}

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::errors::{CoreError, ImportError};
use crate::models::goal::GoalMap;
use crate::models::ledger::Ledger;
use crate::models::record::{CostRecord, IncomeRecord};
use crate::models::snapshot::Snapshot;

/// Current snapshot format version.
pub const CURRENT_VERSION: u64 = 1;

/// Build a snapshot of `ledger` stamped with `exported_at`.
pub fn export_snapshot(ledger: &Ledger, exported_at: DateTime<Utc>) -> Snapshot {
    Snapshot {
        version: CURRENT_VERSION,
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        income: ledger.income.clone(),
        cost: ledger.cost.clone(),
        goals: ledger.goals.clone(),
    }
}

/// Pretty-printed JSON text of a snapshot, ready to be written to a file.
pub fn encode(snapshot: &Snapshot) -> Result<String, CoreError> {
    serde_json::to_string_pretty(snapshot)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize snapshot: {e}")))
}

/// Suggested download name for an export taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("shop-ledger-data-{}.json", date.format("%Y-%m-%d"))
}

/// Parse and validate an untrusted snapshot document.
///
/// Flow: text → JSON value → shape check (object, `income`/`cost` arrays,
/// `goals` object) → version check → typed records.
///
/// Nothing is committed here; the caller swaps the returned ledger in only
/// on `Ok`. `version` is accepted as-is unless `strict_version` is set.
pub fn import_snapshot(text: &str, strict_version: bool) -> Result<Ledger, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::MalformedJson(e.to_string()))?;

    let Value::Object(mut doc) = value else {
        return Err(ImportError::InvalidShape(
            "top-level value is not an object".into(),
        ));
    };

    let income = take_field(&mut doc, "income", Value::is_array, "an array")?;
    let cost = take_field(&mut doc, "cost", Value::is_array, "an array")?;
    let goals = take_field(&mut doc, "goals", Value::is_object, "an object")?;

    check_version(doc.get("version"), strict_version)?;

    let income: Vec<IncomeRecord> = serde_json::from_value(income)
        .map_err(|e| ImportError::InvalidShape(format!("income record: {e}")))?;
    let cost: Vec<CostRecord> = serde_json::from_value(cost)
        .map_err(|e| ImportError::InvalidShape(format!("cost record: {e}")))?;
    let goals: GoalMap = serde_json::from_value(goals)
        .map_err(|e| ImportError::InvalidShape(format!("goals: {e}")))?;

    Ok(Ledger { income, cost, goals })
}

fn take_field(
    doc: &mut Map<String, Value>,
    name: &str,
    is_expected: fn(&Value) -> bool,
    expected: &str,
) -> Result<Value, ImportError> {
    match doc.remove(name) {
        Some(value) if is_expected(&value) => Ok(value),
        Some(_) => Err(ImportError::InvalidShape(format!("`{name}` is not {expected}"))),
        None => Err(ImportError::InvalidShape(format!("`{name}` is missing"))),
    }
}

fn check_version(version: Option<&Value>, strict: bool) -> Result<(), ImportError> {
    let parsed = version.and_then(Value::as_u64);
    if parsed == Some(CURRENT_VERSION) {
        return Ok(());
    }
    if strict {
        return Err(ImportError::UnsupportedVersion(parsed.unwrap_or(0)));
    }
    tracing::warn!(version = ?version, "snapshot version not recognized, importing anyway");
    Ok(())
}

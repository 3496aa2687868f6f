use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use super::month::{month_of, YearMonth};

/// Where a piece of income came from.
///
/// Names outside the known set are kept verbatim in `Unrecognized` so they
/// survive a load/save or import/export cycle; they are labelled and
/// aggregated as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum IncomeCategory {
    /// Sales at a physical market or fair
    Market,
    /// Online shop sales
    Online,
    #[default]
    Other,
    Unrecognized(String),
}

impl IncomeCategory {
    pub const ALL: [IncomeCategory; 3] = [
        IncomeCategory::Market,
        IncomeCategory::Online,
        IncomeCategory::Other,
    ];

    /// Wire name used in storage and snapshots.
    pub fn as_str(&self) -> &str {
        match self {
            IncomeCategory::Market => "market",
            IncomeCategory::Online => "online",
            IncomeCategory::Other => "other",
            IncomeCategory::Unrecognized(raw) => raw,
        }
    }

    /// Strict lookup by wire name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Lenient lookup: unknown names are kept as `Unrecognized`.
    pub fn from_wire(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::warn!(category = %s, "unknown income category, treating as other");
            IncomeCategory::Unrecognized(s.to_string())
        })
    }

    /// The known category this one is counted under.
    pub fn bucket(&self) -> IncomeCategory {
        match self {
            IncomeCategory::Unrecognized(_) => IncomeCategory::Other,
            known => known.clone(),
        }
    }
}

/// What a cost was spent on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CostCategory {
    Material,
    Packaging,
    /// Market stall / booth fees
    Booth,
    Shipping,
    #[default]
    Other,
    Unrecognized(String),
}

impl CostCategory {
    pub const ALL: [CostCategory; 5] = [
        CostCategory::Material,
        CostCategory::Packaging,
        CostCategory::Booth,
        CostCategory::Shipping,
        CostCategory::Other,
    ];

    /// Wire name used in storage and snapshots.
    pub fn as_str(&self) -> &str {
        match self {
            CostCategory::Material => "material",
            CostCategory::Packaging => "packaging",
            CostCategory::Booth => "booth",
            CostCategory::Shipping => "shipping",
            CostCategory::Other => "other",
            CostCategory::Unrecognized(raw) => raw,
        }
    }

    /// Strict lookup by wire name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    pub fn from_wire(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::warn!(category = %s, "unknown cost category, treating as other");
            CostCategory::Unrecognized(s.to_string())
        })
    }

    pub fn bucket(&self) -> CostCategory {
        match self {
            CostCategory::Unrecognized(_) => CostCategory::Other,
            known => known.clone(),
        }
    }
}

/// Display label: unrecognized names show as `other`.
impl std::fmt::Display for IncomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.bucket().as_str())
    }
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.bucket().as_str())
    }
}

// Serialized as the wire name, raw text included. A missing or null name
// reads as `Other`.

impl Serialize for IncomeCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IncomeCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            Some(raw) => Self::from_wire(&raw),
            None => IncomeCategory::Other,
        })
    }
}

impl Serialize for CostCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CostCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            Some(raw) => Self::from_wire(&raw),
            None => CostCategory::Other,
        })
    }
}

// ── Amount coercion ─────────────────────────────────────────────────

/// Clamp an amount to a finite, non-negative number. Everything else is 0.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parse free-form amount input (e.g. a form field).
///
/// Blank, non-numeric, non-finite and negative input all coerce to 0.
pub fn coerce_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().map(sanitize_amount).unwrap_or(0.0)
}

/// Coerce an arbitrary JSON value to an amount: numbers and numeric strings
/// are kept, anything else is 0.
pub(crate) fn amount_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map(sanitize_amount).unwrap_or(0.0),
        Value::String(s) => coerce_amount(s),
        _ => 0.0,
    }
}

fn deserialize_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value))
}

fn deserialize_note<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fresh opaque record id.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ── Records ─────────────────────────────────────────────────────────

/// Common read access to income and cost records.
pub trait Entry {
    fn id(&self) -> &str;

    /// ISO date string (`YYYY-MM-DD`) as stored.
    fn date(&self) -> &str;

    fn amount(&self) -> f64;

    /// The month this entry is bucketed into, if its date is well-formed.
    fn month(&self) -> Option<YearMonth> {
        month_of(self.date())
    }
}

/// A single income entry.
///
/// Records are never edited in place: create, then remove by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    /// Unique identifier within the income collection
    pub id: String,

    /// Day the income was received, `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,

    /// Non-negative amount; malformed input is stored as 0
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,

    #[serde(rename = "type", default)]
    pub category: IncomeCategory,

    /// Free-text note, empty when none was given
    #[serde(default, deserialize_with = "deserialize_note")]
    pub note: String,
}

impl IncomeRecord {
    pub fn new(
        date: NaiveDate,
        amount: f64,
        category: IncomeCategory,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id: new_record_id(),
            date: iso_date(date),
            amount: sanitize_amount(amount),
            category,
            note: note.into(),
        }
    }
}

impl Entry for IncomeRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

/// A single cost entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub id: String,

    #[serde(default)]
    pub date: String,

    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,

    #[serde(rename = "type", default)]
    pub category: CostCategory,

    #[serde(default, deserialize_with = "deserialize_note")]
    pub note: String,
}

impl CostRecord {
    pub fn new(
        date: NaiveDate,
        amount: f64,
        category: CostCategory,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id: new_record_id(),
            date: iso_date(date),
            amount: sanitize_amount(amount),
            category,
            note: note.into(),
        }
    }
}

impl Entry for CostRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

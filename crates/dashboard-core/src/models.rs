use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Normalised product identifier used as the join key.
///
/// Spreadsheet cells holding `101` come back as the float `101.0`; both that
/// and the text `"101"` normalise to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Build an id from text, trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    /// Build an id from a numeric cell. Integral values drop the fraction.
    pub fn from_number(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < 1e15 {
            Self(format!("{}", value as i64))
        } else {
            Self(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar month bucket (`YYYY-MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Truncate a date to its containing month.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Grouping key for descriptive fields that may be null after the join.
///
/// Named groups order alphabetically; `Unknown` always orders last.
/// Serialises as the name, or `null` for `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Named(String),
    Unknown,
}

impl GroupKey {
    /// Display label used when a null group has to be shown.
    pub const UNKNOWN_LABEL: &'static str = "(none)";

    pub fn from_option(value: Option<&str>) -> Self {
        match value {
            Some(v) => GroupKey::Named(v.to_string()),
            None => GroupKey::Unknown,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            GroupKey::Named(name) => name,
            GroupKey::Unknown => Self::UNKNOWN_LABEL,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, GroupKey::Unknown)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the product dimension table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: Option<String>,
    pub category: Option<String>,
}

/// One row of the inventory fact table, typed and validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryFact {
    pub product_id: ProductId,
    pub date: NaiveDate,
    pub opening_stock: f64,
    pub closing_stock: f64,
    pub stock_used: f64,
    pub stock_received: f64,
    pub stockout_days: u32,
    /// Inventory turnover ratio ("Invt TO").
    pub turnover: f64,
}

/// A fact row joined with its product metadata.
///
/// `product_name` / `category` are `None` when the fact's product id has no
/// dimension row (or the dimension cell was empty).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRecord {
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub date: NaiveDate,
    pub month: YearMonth,
    pub opening_stock: f64,
    pub closing_stock: f64,
    pub stock_used: f64,
    pub stock_received: f64,
    pub stockout_days: u32,
    pub turnover: f64,
}

impl InventoryRecord {
    /// Left-join a fact with an optional product row.
    pub fn join(fact: InventoryFact, product: Option<&Product>) -> Self {
        let (product_name, category) = match product {
            Some(p) => (p.name.clone(), p.category.clone()),
            None => (None, None),
        };
        Self {
            month: YearMonth::from_date(fact.date),
            product_id: fact.product_id,
            product_name,
            category,
            date: fact.date,
            opening_stock: fact.opening_stock,
            closing_stock: fact.closing_stock,
            stock_used: fact.stock_used,
            stock_received: fact.stock_received,
            stockout_days: fact.stockout_days,
            turnover: fact.turnover,
        }
    }

    pub fn product_key(&self) -> GroupKey {
        GroupKey::from_option(self.product_name.as_deref())
    }

    pub fn category_key(&self) -> GroupKey {
        GroupKey::from_option(self.category.as_deref())
    }
}

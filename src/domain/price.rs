use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{PriceAmount, PriceId};

/// A stored price row.
///
/// This domain struct mirrors the `prices` table and is independent from any
/// persistence layer representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Price {
    pub id: PriceId,
    pub name: String,
    pub category: String,
    pub price: PriceAmount,
    pub create_date: NaiveDate,
}

/// Data required to insert a new [`Price`].
///
/// Built from a single parsed input line. A missing `id` lets the store
/// assign one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPrice {
    pub id: Option<PriceId>,
    pub name: String,
    pub category: String,
    pub price: PriceAmount,
    pub create_date: NaiveDate,
}

/// Aggregate statistics returned after an ingestion or a totals query.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PriceTotals {
    pub total_items: usize,
    pub total_categories: usize,
    pub total_price: f64,
}

/// Column layout of the delimited price files, shared by import and export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSchema {
    /// `id,name,category,price,create_date`
    #[default]
    Full,
    /// `category,price`
    Compact,
}

impl RecordSchema {
    /// Column names in file order.
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Full => &["id", "name", "category", "price", "create_date"],
            Self::Compact => &["category", "price"],
        }
    }

    /// Canonical header line.
    pub const fn header(self) -> &'static str {
        match self {
            Self::Full => "id,name,category,price,create_date",
            Self::Compact => "category,price",
        }
    }

    pub const fn field_count(self) -> usize {
        self.columns().len()
    }
}

/// Date stored when an input line leaves `create_date` empty.
pub fn default_create_date() -> NaiveDate {
    DateTime::<Utc>::UNIX_EPOCH.date_naive()
}

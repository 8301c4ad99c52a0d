//! POZ line items and the dataset they accumulate into.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// One cost-estimation entry recovered from a single text line.
///
/// Every emitted item carries a non-empty code and description; lines that
/// cannot satisfy this are dropped by the extractor, never emitted partially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// POZ code, e.g. `15.010.1001` or `ÇŞM.003`.
    pub code: String,

    /// Free text remaining after the code, unit and price are removed.
    pub description: String,

    /// Unit-of-measure token as it appeared in the source, `Adet` when none
    /// was recognized.
    pub unit: String,

    /// Unit price in canonical decimal form. Zero means the price was not
    /// readable on the line.
    #[serde(rename = "unitPrice", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

impl LineItem {
    /// Whether the price is the "unknown" sentinel rather than a real value.
    pub fn price_unknown(&self) -> bool {
        self.unit_price.is_zero()
    }
}

/// An ordered collection of line items accumulated across pages and
/// documents. Insertion order is preserved; no de-duplication is performed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    items: Vec<LineItem>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn push(&mut self, item: LineItem) {
        self.items.push(item);
    }

    /// Append a batch of items, keeping their order.
    pub fn extend(&mut self, items: impl IntoIterator<Item = LineItem>) {
        self.items.extend(items);
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Write the dataset as a JSON array, the on-disk format the reference
    /// catalogues are distributed in.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(path, json)?;
        debug!("wrote {} items to {}", self.items.len(), path.display());
        Ok(())
    }

    /// Read a dataset back from a JSON array file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let items: Vec<LineItem> = serde_json::from_str(&content)?;
        Ok(Self { items })
    }
}

impl IntoIterator for Dataset {
    type Item = LineItem;
    type IntoIter = std::vec::IntoIter<LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<LineItem> for Dataset {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Outcome envelope for one processed document, matching the ingestion
/// endpoint contract: `{"status":"success","items":[...],"count":n}` or
/// `{"status":"error","message":"..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessReport {
    Success { items: Vec<LineItem>, count: usize },
    Error { message: String },
}

impl ProcessReport {
    pub fn success(items: Vec<LineItem>) -> Self {
        let count = items.len();
        Self::Success { items, count }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row's worth of column → value data.
///
/// Keys keep their insertion order so the JSON wire shape and the
/// exported sheet both reflect the source column order.
pub type Record = IndexMap<String, Value>;

/// Ordered sequence of records, the shape both endpoints exchange.
///
/// Serializes transparently as a JSON array of objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset(pub Vec<Record>);

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self(records)
    }

    pub fn records(&self) -> &[Record] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column set for output: the union of keys across all records,
    /// in order of first appearance.
    pub fn columns(&self) -> Vec<String> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        for record in &self.0 {
            for key in record.keys() {
                seen.insert(key.as_str());
            }
        }
        seen.into_iter().map(str::to_string).collect()
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self(records)
    }
}

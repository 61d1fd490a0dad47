//! FILENAME: core/pivot-engine/src/cache.rs
//! Group Cache - Hashable group keys and the row index per group.
//!
//! The cache is designed for:
//! - A single O(n) pass over the filtered rows
//! - Grouping without repeated linear searches (hash lookup per row)
//! - Remembering which source rows belong to each group
//!
//! Group ordering is not decided here; callers sort the finished groups.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use engine::CellValue;

// ============================================================================
// KEY VALUES
// ============================================================================

/// A normalized, hashable representation of a cell value.
///
/// Keys are typed: a number and the text spelling of that number are distinct
/// keys, ordered numbers first (see `CellValue::compare`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyValue {
    Empty,
    Number(OrderedFloat),
    Text(String),
    Boolean(bool),
}

impl From<&CellValue> for KeyValue {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Empty => KeyValue::Empty,
            CellValue::Number(n) if n.is_nan() => KeyValue::Empty,
            CellValue::Number(n) => KeyValue::Number(OrderedFloat(*n)),
            CellValue::Text(s) if s.is_empty() => KeyValue::Empty,
            CellValue::Text(s) => KeyValue::Text(s.clone()),
            CellValue::Boolean(b) => KeyValue::Boolean(*b),
        }
    }
}

impl KeyValue {
    pub fn to_cell(&self) -> CellValue {
        match self {
            KeyValue::Empty => CellValue::Empty,
            KeyValue::Number(n) => CellValue::Number(n.as_f64()),
            KeyValue::Text(s) => CellValue::Text(s.clone()),
            KeyValue::Boolean(b) => CellValue::Boolean(*b),
        }
    }
}

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other, and so are the two zeros.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

// ============================================================================
// GROUP INDEX
// ============================================================================

/// Key of one group: one value per group column, outermost first.
/// Most reports group on a handful of columns, so keys stay inline.
pub type GroupKey = SmallVec<[KeyValue; 4]>;

/// Maps each distinct group key to the source rows that carry it.
#[derive(Debug, Default)]
pub struct GroupIndex {
    slots: FxHashMap<GroupKey, usize>,
    keys: Vec<GroupKey>,
    members: Vec<Vec<usize>>,
}

impl GroupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `row` under `key`, creating the group on first sight.
    pub fn insert(&mut self, key: GroupKey, row: usize) {
        if let Some(&slot) = self.slots.get(&key) {
            self.members[slot].push(row);
            return;
        }
        let slot = self.keys.len();
        self.slots.insert(key.clone(), slot);
        self.keys.push(key);
        self.members.push(vec![row]);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Consumes the index, yielding `(key, rows)` in first-seen order.
    pub fn into_groups(self) -> Vec<(GroupKey, Vec<usize>)> {
        self.keys.into_iter().zip(self.members).collect()
    }
}

/// Lexicographic comparison of two keys using the cell value order.
pub fn compare_keys(a: &GroupKey, b: &GroupKey) -> std::cmp::Ordering {
    for (va, vb) in a.iter().zip(b.iter()) {
        let ord = va.to_cell().compare(&vb.to_cell());
        if ord != std::cmp::Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

//! Repeatable list-valued fields
//!
//! Three lists back the form: measured-data file paths (fixed paths mode),
//! additional GPU indices, and the runs to concatenate (BIDS concatenated
//! mode). Rows have no required minimum; the assembler substitutes a
//! placeholder when a list has nothing usable.

use gemprf_core::prelude::*;
use serde::{Deserialize, Serialize};

/// Identifier of a list-valued field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListId {
    DataPaths,
    Gpus,
    ConcatItems,
}

impl ListId {
    pub const ALL: [ListId; 3] = [ListId::DataPaths, ListId::Gpus, ListId::ConcatItems];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListId::DataPaths => "data_paths",
            ListId::Gpus => "gpus",
            ListId::ConcatItems => "concat_items",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|list| list.as_str() == id)
    }
}

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered, variable-length list of rows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DynamicList<T> {
    id: Option<ListId>,
    rows: Vec<T>,
}

impl<T: Default + Clone> DynamicList<T> {
    pub fn new(id: ListId, rows: Vec<T>) -> Self {
        Self { id: Some(id), rows }
    }

    fn name(&self) -> &'static str {
        self.id.map(|id| id.as_str()).unwrap_or("list")
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(Error::list_index(self.name(), index, self.rows.len()))
        }
    }

    /// Append an empty row, returning its index
    pub fn add(&mut self) -> usize {
        self.rows.push(T::default());
        self.rows.len() - 1
    }

    /// Delete exactly the row at `index`, keeping the others in order
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(self.rows.remove(index))
    }

    /// Reset the row at `index` to empty without changing the length
    pub fn clear_at(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.rows[index] = T::default();
        Ok(())
    }

    pub fn set_at(&mut self, index: usize, value: T) -> Result<()> {
        self.check_index(index)?;
        self.rows[index] = value;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.rows.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        self.check_index(index)?;
        Ok(&mut self.rows[index])
    }

    pub fn replace_all(&mut self, rows: Vec<T>) {
        self.rows = rows;
    }

    pub fn values(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl DynamicList<String> {
    /// Trimmed rows that contain something
    pub fn non_blank(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(|row| row.trim())
            .filter(|row| !row.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Concatenation items
// ─────────────────────────────────────────────────────────────────────────────

/// One run to concatenate in BIDS concatenated mode
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConcatItem {
    pub ses: String,
    pub task: String,
    pub run: String,
}

impl ConcatItem {
    pub fn new(ses: impl Into<String>, task: impl Into<String>, run: impl Into<String>) -> Self {
        Self {
            ses: ses.into(),
            task: task.into(),
            run: run.into(),
        }
    }

    /// Row substituted when the list has nothing usable
    pub fn placeholder() -> Self {
        Self::new("01", "fixedbar", "1")
    }

    pub fn is_blank(&self) -> bool {
        self.ses.trim().is_empty() && self.task.trim().is_empty() && self.run.trim().is_empty()
    }

    pub fn part_mut(&mut self, part: ConcatPart) -> &mut String {
        match part {
            ConcatPart::Ses => &mut self.ses,
            ConcatPart::Task => &mut self.task,
            ConcatPart::Run => &mut self.run,
        }
    }
}

/// A single column of a [`ConcatItem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcatPart {
    Ses,
    Task,
    Run,
}

/// Concatenation descriptions accept `"run": 1` as well as `"run": "1"`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LooseText {
    Text(String),
    Integer(i64),
}

impl From<LooseText> for String {
    fn from(value: LooseText) -> Self {
        match value {
            LooseText::Text(text) => text,
            LooseText::Integer(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DescribedItem {
    ses: LooseText,
    task: LooseText,
    run: LooseText,
}

pub type ConcatList = DynamicList<ConcatItem>;

impl DynamicList<ConcatItem> {
    /// Replace every row from a JSON description such as
    /// `[{"ses": "01", "task": "bar", "run": "1"}]`.
    ///
    /// On a parse failure the list becomes a single placeholder row and the
    /// parse error is returned so the caller can surface it.
    pub fn replace_from_description(&mut self, description: &str) -> Result<usize> {
        match serde_json::from_str::<Vec<DescribedItem>>(description) {
            Ok(items) => {
                self.rows = items
                    .into_iter()
                    .map(|item| ConcatItem::new(item.ses, item.task, item.run))
                    .collect();
                Ok(self.rows.len())
            }
            Err(e) => {
                warn!("Unparsable concatenation description, using placeholder row: {}", e);
                self.rows = vec![ConcatItem::placeholder()];
                Err(e.into())
            }
        }
    }

    /// JSON description of the current rows (inverse of `replace_from_description`)
    pub fn describe(&self) -> String {
        serde_json::to_string(&self.rows).unwrap_or_else(|_| "[]".to_string())
    }

    /// Rows with at least one column filled in
    pub fn non_blank(&self) -> impl Iterator<Item = &ConcatItem> {
        self.rows.iter().filter(|item| !item.is_blank())
    }
}

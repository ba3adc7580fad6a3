//! Domain entities produced by feed normalization.
//!
//! All entities are immutable once built. A [`Worksheet`] does not point
//! back to its [`Spreadsheet`]; it carries a copied [`SpreadsheetRef`] so it
//! can issue further requests on its own.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Key and credential identifying a spreadsheet for follow-up requests.
#[derive(Clone, PartialEq, Eq)]
pub struct SpreadsheetRef {
    /// The spreadsheet key.
    pub key: String,
    /// Auth token, if the spreadsheet was opened with one.
    pub auth: Option<String>,
}

impl SpreadsheetRef {
    /// Creates a reference from a key and optional auth token.
    pub fn new(key: impl Into<String>, auth: Option<String>) -> Self {
        Self {
            key: key.into(),
            auth,
        }
    }
}

impl std::fmt::Debug for SpreadsheetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpreadsheetRef")
            .field("key", &self.key)
            .field("auth", &self.auth.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Author of a spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Author {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// Spreadsheet metadata with its worksheets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spreadsheet {
    /// The spreadsheet key.
    pub key: String,
    /// Auth token used to open the spreadsheet.
    #[serde(skip)]
    pub auth: Option<String>,
    /// Spreadsheet title.
    pub title: String,
    /// Last update timestamp as sent by the feed.
    pub updated: String,
    /// Spreadsheet author.
    pub author: Author,
    /// Worksheets in feed order.
    pub worksheets: Vec<Worksheet>,
}

impl Spreadsheet {
    /// Returns the key/auth pair of this spreadsheet.
    pub fn reference(&self) -> SpreadsheetRef {
        SpreadsheetRef::new(&self.key, self.auth.clone())
    }

    /// Parses [`updated`](Self::updated) as an RFC 3339 timestamp.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.updated)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Finds a worksheet by id.
    pub fn worksheet(&self, id: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|w| w.id == id)
    }

    /// Finds the first worksheet with the given title.
    pub fn worksheet_by_title(&self, title: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|w| w.title == title)
    }
}

/// A worksheet of a spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Worksheet {
    /// Worksheet id (trailing segment of the feed's worksheet URL).
    pub id: String,
    /// Worksheet title.
    pub title: String,
    /// Number of rows.
    pub row_count: u32,
    /// Number of columns.
    pub col_count: u32,
    /// The owning spreadsheet.
    #[serde(skip)]
    pub spreadsheet: SpreadsheetRef,
}

/// One row of a list feed: column name to value.
///
/// Columns come from the worksheet's header row, so the key set is data
/// dependent. A `None` value is an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, Option<String>>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.fields.insert(key.into(), value);
    }

    /// Returns the value of a field. Empty cells yield `None`, as do
    /// unknown fields; use [`contains`](Self::contains) to tell them apart.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_deref())
    }

    /// Returns true if the row has the field, even if its value is empty.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// The row's own feed id.
    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    /// Iterates over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single cell of a cells feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    /// 1-based row index.
    pub row: u32,
    /// 1-based column index.
    pub col: u32,
    /// Displayed value; empty when the feed has none.
    pub value: String,
    /// Raw input (e.g. a formula), when the feed provides it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_value: Option<String>,
    /// Numeric value, when the feed provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
}

/// Sparse grid of cells keyed by row then column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CellGrid {
    /// row -> col -> cell
    pub cells: BTreeMap<u32, BTreeMap<u32, Cell>>,
}

impl CellGrid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a cell at its own coordinates, replacing any previous one.
    pub fn insert(&mut self, cell: Cell) {
        self.cells.entry(cell.row).or_default().insert(cell.col, cell);
    }

    /// Returns the cell at `row`, `col`.
    pub fn get(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&row).and_then(|cols| cols.get(&col))
    }

    /// Iterates over all cells, row by row.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values().flat_map(|cols| cols.values())
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    /// Returns true if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

//! Feed tree to domain entity conversion.
//!
//! Every function here is a pure function of a [`FeedNode`]. Repeatable
//! elements are always read through [`FeedNode::items`], so zero, one or
//! many occurrences are handled alike.
//!
//! Rows are normalized with an explicit rule table, [`ROW_RULES`]: each
//! field of an entry is offered to the rules in order and the first rule
//! whose predicate accepts the key decides what, if anything, ends up in the
//! [`Row`].

use tracing::{debug, warn};

use crate::model::{Author, Cell, CellGrid, Row, Spreadsheet, SpreadsheetRef, Worksheet};
use crate::tree::FeedNode;
use crate::xml::ITEMS_KEY;

/// Prefix of custom-column fields in list feeds.
pub const CUSTOM_COLUMN_PREFIX: &str = "gsx:";

/// Alternate custom-column prefix used by JSON-style feeds.
pub const CUSTOM_COLUMN_ALT_PREFIX: &str = "gsx$";

/// Column name used for a custom-column field with an empty name.
const BARE_CUSTOM_COLUMN: &str = "gsx";

const CELL_KEY: &str = "gs:cell";
const ROW_COUNT_KEY: &str = "gs:rowcount";
const COL_COUNT_KEY: &str = "gs:colcount";

/// Builds a [`Spreadsheet`] from a worksheets feed.
pub fn to_spreadsheet(key: &str, auth: Option<&str>, tree: &FeedNode) -> Spreadsheet {
    let reference = SpreadsheetRef::new(key, auth.map(str::to_string));
    // Atom allows several authors; the first one is reported.
    let author = tree.items("author").first().copied();

    let worksheets: Vec<Worksheet> = tree
        .items(ITEMS_KEY)
        .into_iter()
        .map(|entry| to_worksheet(&reference, entry))
        .collect();

    debug!(key, worksheets = worksheets.len(), "normalized spreadsheet");

    Spreadsheet {
        key: key.to_string(),
        auth: reference.auth.clone(),
        title: text_or_empty(tree, "title"),
        updated: text_or_empty(tree, "updated"),
        author: Author {
            name: author.map(|a| text_or_empty(a, "name")).unwrap_or_default(),
            email: author.map(|a| text_or_empty(a, "email")).unwrap_or_default(),
        },
        worksheets,
    }
}

/// Builds a [`Worksheet`] from one entry of a worksheets feed.
pub fn to_worksheet(spreadsheet: &SpreadsheetRef, entry: &FeedNode) -> Worksheet {
    let id = entry.text_at("id").map(trailing_segment).unwrap_or_default();

    Worksheet {
        id: id.to_string(),
        title: text_or_empty(entry, "title"),
        row_count: count(entry, ROW_COUNT_KEY),
        col_count: count(entry, COL_COUNT_KEY),
        spreadsheet: spreadsheet.clone(),
    }
}

/// Returns everything after the last `/`, or the whole string.
pub fn trailing_segment(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// Builds the rows of a list feed. A feed without entries has no rows.
pub fn to_rows(tree: &FeedNode) -> Vec<Row> {
    let rows: Vec<Row> = tree.items(ITEMS_KEY).into_iter().map(to_row).collect();
    debug!(rows = rows.len(), "normalized rows");
    rows
}

/// A row normalization rule.
pub struct RowRule {
    /// Rule name, for diagnostics.
    pub name: &'static str,
    /// Whether the rule handles a field with this key.
    pub matches: fn(&str) -> bool,
    /// Maps the field to a `(column, value)` pair, or drops it with `None`.
    pub apply: fn(&str, &FeedNode) -> Option<(String, Option<String>)>,
}

/// Row rules in the order they are tried.
pub const ROW_RULES: &[RowRule] = &[
    RowRule {
        name: "custom-column",
        matches: is_custom_column,
        apply: custom_column,
    },
    RowRule {
        name: "custom-column-alt",
        matches: is_alt_custom_column,
        apply: custom_column,
    },
    RowRule {
        name: "id",
        matches: is_id,
        apply: row_id,
    },
    RowRule {
        name: "text-leaf",
        matches: any_key,
        apply: text_leaf_field,
    },
];

/// Builds a [`Row`] from one list-feed entry by applying [`ROW_RULES`] to
/// each field in document order.
pub fn to_row(entry: &FeedNode) -> Row {
    let mut row = Row::new();
    let FeedNode::Map(fields) = entry else {
        return row;
    };

    for (key, value) in fields.iter() {
        let Some(rule) = ROW_RULES.iter().find(|rule| (rule.matches)(key)) else {
            continue;
        };
        if let Some((column, value)) = (rule.apply)(key, value) {
            row.insert(column, value);
        }
    }
    row
}

fn is_custom_column(key: &str) -> bool {
    key.starts_with(CUSTOM_COLUMN_PREFIX)
}

fn is_alt_custom_column(key: &str) -> bool {
    key.starts_with(CUSTOM_COLUMN_ALT_PREFIX)
}

fn is_id(key: &str) -> bool {
    key == "id"
}

fn any_key(_: &str) -> bool {
    true
}

/// `gsx:name` / `gsx$name` fields: prefix stripped, value unwrapped.
fn custom_column(key: &str, value: &FeedNode) -> Option<(String, Option<String>)> {
    let name = key
        .strip_prefix(CUSTOM_COLUMN_PREFIX)
        .or_else(|| key.strip_prefix(CUSTOM_COLUMN_ALT_PREFIX))
        .unwrap_or(key);
    let column = if name.is_empty() { BARE_CUSTOM_COLUMN } else { name };
    Some((column.to_string(), column_value(value)))
}

fn column_value(value: &FeedNode) -> Option<String> {
    match value {
        FeedNode::Text(text) => Some(text.clone()),
        FeedNode::Map(_) => value.text_leaf().map(str::to_string),
        FeedNode::List(_) => None,
    }
}

/// The entry's own id, kept verbatim.
fn row_id(key: &str, value: &FeedNode) -> Option<(String, Option<String>)> {
    value.text().map(|id| (key.to_string(), Some(id.to_string())))
}

/// Any other field survives only as a map carrying a `text` leaf.
fn text_leaf_field(key: &str, value: &FeedNode) -> Option<(String, Option<String>)> {
    value
        .text_leaf()
        .map(|text| (key.to_string(), Some(text.to_string())))
}

/// Builds the cell grid of a cells feed. A feed without entries yields an
/// empty grid.
pub fn to_cells(tree: &FeedNode) -> CellGrid {
    let mut grid = CellGrid::new();

    for entry in tree.items(ITEMS_KEY) {
        let Some(cell) = entry.get(CELL_KEY) else {
            warn!("cells feed entry without {}", CELL_KEY);
            continue;
        };
        let (Some(row), Some(col)) = (index(cell, "row"), index(cell, "col")) else {
            warn!(
                row = cell.text_at("row"),
                col = cell.text_at("col"),
                "skipping cell with invalid coordinates"
            );
            continue;
        };

        grid.insert(Cell {
            row,
            col,
            value: cell.text_leaf().unwrap_or_default().to_string(),
            input_value: cell.text_at("inputvalue").map(str::to_string),
            numeric_value: cell
                .text_at("numericvalue")
                .and_then(|v| v.parse::<f64>().ok()),
        });
    }

    debug!(cells = grid.len(), "normalized cells");
    grid
}

fn text_or_empty(node: &FeedNode, key: &str) -> String {
    node.text_at(key).unwrap_or_default().to_string()
}

fn index(cell: &FeedNode, key: &str) -> Option<u32> {
    cell.text_at(key).and_then(|v| v.trim().parse().ok())
}

fn count(entry: &FeedNode, key: &str) -> u32 {
    match entry.text_at(key) {
        Some(v) => v.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = v, "invalid worksheet dimension");
            0
        }),
        None => 0,
    }
}

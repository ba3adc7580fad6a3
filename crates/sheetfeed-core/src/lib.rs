//! Feed normalization for the spreadsheets feed API.
//!
//! The spreadsheets feed is an Atom document whose shape varies from
//! request to request: elements that may repeat collapse to a bare value
//! when they occur once, leaves come as plain text or as objects carrying
//! a `text` entry, and empty elements stand in for null. This crate turns
//! such documents into a small set of stable entities:
//!
//! ```text
//!  bytes ──▶ FeedTreeBuilder ──▶ FeedNode ──▶ normalize::* ──▶ Spreadsheet
//!                                                           ├▶ Vec<Row>
//!                                                           └▶ CellGrid
//! ```
//!
//! - [`FeedTreeBuilder`] - chunked XML to [`FeedNode`] conversion
//! - [`to_sequence`] - singleton-or-list coercion
//! - [`normalize`] - tree to entity conversion, including the row rule table
//! - [`RowsQuery`] / [`CellsQuery`] - feed query parameters
//!
//! Network access lives in `sheetfeed-client`.

pub mod model;
pub mod normalize;
pub mod query;
pub mod tracing;
pub mod tree;
pub mod xml;

pub use model::{Author, Cell, CellGrid, Row, Spreadsheet, SpreadsheetRef, Worksheet};
pub use normalize::{to_cells, to_row, to_rows, to_spreadsheet, to_worksheet};
pub use query::{CellsQuery, QueryParams, RowsQuery};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use tree::{FeedMap, FeedNode, to_sequence};
pub use xml::{FeedTreeBuilder, TreeError, parse_feed};

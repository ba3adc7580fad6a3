//! Client for the spreadsheets feed API.
//!
//! Requests go through a [`FeedFetcher`], which builds the feed URL, sends
//! it over a [`FeedTransport`] and parses the body into a
//! [`FeedNode`](sheetfeed_core::FeedNode). [`SpreadsheetsClient`] validates
//! arguments and normalizes the trees into entities.
//!
//! ```ignore
//! use sheetfeed_client::{FeedConfig, RowsQuery, SpreadsheetsClient, WorksheetExt};
//!
//! let client = SpreadsheetsClient::new(FeedConfig::default())?;
//! let spreadsheet = client.open_spreadsheet("KEY", None).await?;
//! for worksheet in &spreadsheet.worksheets {
//!     let rows = worksheet.rows(&client, RowsQuery::new().with_num(10)).await?;
//!     println!("{}: {} rows", worksheet.title, rows.len());
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::{CellsRequest, RowsRequest, SpreadsheetsClient, WorksheetExt};
pub use config::{DEFAULT_FEED_ROOT, FeedConfig};
pub use error::{FeedError, FeedResult, INVALID_AUTH_MESSAGE};
pub use fetcher::{AUTH_SCHEME, Access, FeedFetcher};
pub use transport::{BoxFuture, FeedBody, FeedRequest, FeedResponse, FeedTransport, HttpTransport};

pub use sheetfeed_core::{
    Author, Cell, CellGrid, CellsQuery, Row, RowsQuery, Spreadsheet, SpreadsheetRef, Worksheet,
};

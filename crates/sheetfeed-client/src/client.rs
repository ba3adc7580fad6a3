//! Spreadsheets client facade.
//!
//! [`SpreadsheetsClient`] validates arguments, fetches the matching feed
//! and hands the tree to the normalizers in `sheetfeed-core`.

use std::sync::Arc;

use sheetfeed_core::{
    CellGrid, CellsQuery, QueryParams, Row, RowsQuery, Spreadsheet, Worksheet, to_cells, to_rows,
    to_spreadsheet,
};
use tracing::{debug, info};

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::fetcher::FeedFetcher;
use crate::transport::{BoxFuture, FeedTransport, HttpTransport};

const MISSING_KEY: &str = "Spreadsheet key not provided.";
const MISSING_WORKSHEET: &str = "Worksheet not specified.";

/// Parameters of a list feed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowsRequest {
    /// Spreadsheet key.
    pub key: String,
    /// Worksheet id.
    pub worksheet: String,
    /// Auth token.
    pub auth: Option<String>,
    /// Query options.
    pub query: RowsQuery,
}

impl RowsRequest {
    /// Creates a public request for all rows of a worksheet.
    pub fn new(key: impl Into<String>, worksheet: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            worksheet: worksheet.into(),
            ..Self::default()
        }
    }

    /// Builder method to set the auth token.
    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Builder method to set the query options.
    pub fn with_query(mut self, query: RowsQuery) -> Self {
        self.query = query;
        self
    }
}

/// Parameters of a cells feed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellsRequest {
    /// Spreadsheet key.
    pub key: String,
    /// Worksheet id.
    pub worksheet: String,
    /// Auth token.
    pub auth: Option<String>,
    /// Query options.
    pub query: CellsQuery,
}

impl CellsRequest {
    /// Creates a public request for all cells of a worksheet.
    pub fn new(key: impl Into<String>, worksheet: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            worksheet: worksheet.into(),
            ..Self::default()
        }
    }

    /// Builder method to set the auth token.
    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Builder method to set the query options.
    pub fn with_query(mut self, query: CellsQuery) -> Self {
        self.query = query;
        self
    }
}

/// Client for the spreadsheets feed API.
///
/// Cheap to clone; clones share the transport.
#[derive(Debug, Clone)]
pub struct SpreadsheetsClient {
    fetcher: FeedFetcher,
}

impl SpreadsheetsClient {
    /// Creates a client backed by [`HttpTransport`].
    pub fn new(config: FeedConfig) -> FeedResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client that sends requests through `transport`.
    pub fn with_transport(config: FeedConfig, transport: Arc<dyn FeedTransport>) -> FeedResult<Self> {
        Ok(Self {
            fetcher: FeedFetcher::new(&config, transport)?,
        })
    }

    /// Fetches spreadsheet metadata and its worksheets.
    pub async fn open_spreadsheet(&self, key: &str, auth: Option<&str>) -> FeedResult<Spreadsheet> {
        require(key, MISSING_KEY)?;

        let tree = self
            .fetcher
            .fetch(&["worksheets", key], auth, &QueryParams::new())
            .await?;
        let spreadsheet = to_spreadsheet(key, auth, &tree);

        info!(
            key,
            title = %spreadsheet.title,
            worksheets = spreadsheet.worksheets.len(),
            "opened spreadsheet"
        );
        Ok(spreadsheet)
    }

    /// Fetches the rows of a worksheet.
    pub async fn rows(&self, request: &RowsRequest) -> FeedResult<Vec<Row>> {
        require(&request.key, MISSING_KEY)?;
        require(&request.worksheet, MISSING_WORKSHEET)?;

        let tree = self
            .fetcher
            .fetch(
                &["list", request.key.as_str(), request.worksheet.as_str()],
                request.auth.as_deref(),
                &request.query.to_params(),
            )
            .await?;
        let rows = to_rows(&tree);

        debug!(key = %request.key, worksheet = %request.worksheet, rows = rows.len(), "fetched rows");
        Ok(rows)
    }

    /// Fetches the cells of a worksheet.
    pub async fn cells(&self, request: &CellsRequest) -> FeedResult<CellGrid> {
        require(&request.key, MISSING_KEY)?;
        require(&request.worksheet, MISSING_WORKSHEET)?;

        let tree = self
            .fetcher
            .fetch(
                &["cells", request.key.as_str(), request.worksheet.as_str()],
                request.auth.as_deref(),
                &request.query.to_params(),
            )
            .await?;
        let cells = to_cells(&tree);

        debug!(key = %request.key, worksheet = %request.worksheet, cells = cells.len(), "fetched cells");
        Ok(cells)
    }
}

fn require(value: &str, message: &str) -> FeedResult<()> {
    if value.is_empty() {
        return Err(FeedError::invalid_argument(message));
    }
    Ok(())
}

/// Follow-up requests issued from a [`Worksheet`], using the key and auth
/// of the spreadsheet it was opened from.
pub trait WorksheetExt {
    /// Fetches the rows of this worksheet.
    fn rows<'a>(
        &'a self,
        client: &'a SpreadsheetsClient,
        query: RowsQuery,
    ) -> BoxFuture<'a, FeedResult<Vec<Row>>>;

    /// Fetches the cells of this worksheet.
    fn cells<'a>(
        &'a self,
        client: &'a SpreadsheetsClient,
        query: CellsQuery,
    ) -> BoxFuture<'a, FeedResult<CellGrid>>;
}

impl WorksheetExt for Worksheet {
    fn rows<'a>(
        &'a self,
        client: &'a SpreadsheetsClient,
        query: RowsQuery,
    ) -> BoxFuture<'a, FeedResult<Vec<Row>>> {
        let request = RowsRequest {
            key: self.spreadsheet.key.clone(),
            worksheet: self.id.clone(),
            auth: self.spreadsheet.auth.clone(),
            query,
        };
        Box::pin(async move { client.rows(&request).await })
    }

    fn cells<'a>(
        &'a self,
        client: &'a SpreadsheetsClient,
        query: CellsQuery,
    ) -> BoxFuture<'a, FeedResult<CellGrid>> {
        let request = CellsRequest {
            key: self.spreadsheet.key.clone(),
            worksheet: self.id.clone(),
            auth: self.spreadsheet.auth.clone(),
            query,
        };
        Box::pin(async move { client.cells(&request).await })
    }
}

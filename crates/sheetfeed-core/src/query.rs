//! Query parameters for list and cells feeds.
//!
//! Only options that are set become parameters; an unset option is never
//! sent as an empty string. Values such as `sq` and `range` are passed
//! through without interpretation.

/// Ordered list of query parameters.
pub type QueryParams = Vec<(&'static str, String)>;

/// Options for a list (rows) feed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowsQuery {
    /// 1-based index of the first row (`start-index`).
    pub start: Option<u32>,
    /// Maximum number of rows (`max-results`).
    pub num: Option<u32>,
    /// Column to order by (`orderby`), e.g. `column:age`.
    pub orderby: Option<String>,
    /// Reverse the order (`reverse`).
    pub reverse: Option<bool>,
    /// Structured query expression (`sq`), e.g. `age > 25`.
    pub sq: Option<String>,
}

impl RowsQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the first row.
    pub fn with_start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    /// Builder method to set the maximum number of rows.
    pub fn with_num(mut self, num: u32) -> Self {
        self.num = Some(num);
        self
    }

    /// Builder method to set the ordering column.
    pub fn with_orderby(mut self, orderby: impl Into<String>) -> Self {
        self.orderby = Some(orderby.into());
        self
    }

    /// Builder method to reverse the ordering.
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = Some(reverse);
        self
    }

    /// Builder method to set the structured query.
    pub fn with_sq(mut self, sq: impl Into<String>) -> Self {
        self.sq = Some(sq.into());
        self
    }

    /// Translates the options into feed query parameters.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        push(&mut params, "start-index", self.start);
        push(&mut params, "max-results", self.num);
        push(&mut params, "orderby", self.orderby.as_ref());
        push(&mut params, "reverse", self.reverse);
        push(&mut params, "sq", self.sq.as_ref());
        params
    }
}

/// Options for a cells feed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellsQuery {
    /// A1-style range (`range`), e.g. `A1:C10`.
    pub range: Option<String>,
    /// Last row (`max-row`).
    pub max_row: Option<u32>,
    /// First row (`min-row`).
    pub min_row: Option<u32>,
    /// Last column (`max-col`).
    pub max_col: Option<u32>,
    /// First column (`min-col`).
    pub min_col: Option<u32>,
}

impl CellsQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set an A1-style range.
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    /// Builder method to bound the rows.
    pub fn with_rows(mut self, min: u32, max: u32) -> Self {
        self.min_row = Some(min);
        self.max_row = Some(max);
        self
    }

    /// Builder method to bound the columns.
    pub fn with_cols(mut self, min: u32, max: u32) -> Self {
        self.min_col = Some(min);
        self.max_col = Some(max);
        self
    }

    /// Translates the options into feed query parameters.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        push(&mut params, "range", self.range.as_ref());
        push(&mut params, "max-row", self.max_row);
        push(&mut params, "min-row", self.min_row);
        push(&mut params, "max-col", self.max_col);
        push(&mut params, "min-col", self.min_col);
        params
    }
}

fn push<T: ToString>(params: &mut QueryParams, name: &'static str, value: Option<T>) {
    if let Some(value) = value {
        params.push((name, value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queries_have_no_params() {
        assert!(RowsQuery::new().to_params().is_empty());
        assert!(CellsQuery::new().to_params().is_empty());
    }

    #[test]
    fn rows_params() {
        let query = RowsQuery::new()
            .with_start(10)
            .with_num(5)
            .with_orderby("column:age")
            .with_reverse(true)
            .with_sq("age > 25 and name = \"Bob\"");

        assert_eq!(
            query.to_params(),
            vec![
                ("start-index", "10".to_string()),
                ("max-results", "5".to_string()),
                ("orderby", "column:age".to_string()),
                ("reverse", "true".to_string()),
                ("sq", "age > 25 and name = \"Bob\"".to_string()),
            ]
        );
    }

    #[test]
    fn rows_params_skip_unset_options() {
        let query = RowsQuery::new().with_num(3);
        assert_eq!(query.to_params(), vec![("max-results", "3".to_string())]);
    }

    #[test]
    fn cells_params() {
        let query = CellsQuery::new()
            .with_range("A1:C10")
            .with_rows(2, 8)
            .with_cols(1, 3);

        assert_eq!(
            query.to_params(),
            vec![
                ("range", "A1:C10".to_string()),
                ("max-row", "8".to_string()),
                ("min-row", "2".to_string()),
                ("max-col", "3".to_string()),
                ("min-col", "1".to_string()),
            ]
        );
    }

    #[test]
    fn cells_params_partial_bounds() {
        let query = CellsQuery {
            min_col: Some(2),
            ..CellsQuery::default()
        };
        assert_eq!(query.to_params(), vec![("min-col", "2".to_string())]);
    }
}

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{
    ColumnWhitelist, FilterSpec, ListingRequest, PageFilterSort, SortDirection, SortSpec, SqlParam,
    SqlResult,
};

impl PageFilterSort {
    /// Checks sort and filter against the whitelist and fills paging defaults.
    ///
    /// Consumes the raw request so a rejected request leaves nothing behind
    /// half-normalized.
    pub fn validate(self, whitelist: &ColumnWhitelist) -> Result<ListingRequest, FilterError> {
        let PageFilterSort { paging: raw, sort, filter } = self;

        let filter = if filter.is_present() {
            let column = whitelist
                .resolve(&filter.filter_by)
                .ok_or_else(|| FilterError::FieldNotAllowed {
                    action: "filter",
                    field: filter.filter_by.clone(),
                })?;
            Some(FilterSpec {
                column,
                pattern: filter.filter_pattern,
            })
        } else {
            None
        };

        let sort = if sort.is_present() {
            let column = whitelist
                .resolve(&sort.sort_by)
                .ok_or_else(|| FilterError::FieldNotAllowed {
                    action: "sort",
                    field: sort.sort_by.clone(),
                })?;
            let direction = SortDirection::parse(&sort.sort_dir)
                .ok_or(FilterError::UnknownDirection(sort.sort_dir))?;
            Some(SortSpec { column, direction })
        } else {
            None
        };

        Ok(ListingRequest {
            paging: raw.with_defaults(),
            sort,
            filter,
            unpaged: raw.is_unset(),
        })
    }
}

/// Composes the paged listing query for one table.
pub struct Filter {
    table_name: &'static str,
    select_columns: &'static [&'static str],
}

impl Filter {
    pub fn new(table_name: &'static str, select_columns: &'static [&'static str]) -> Self {
        Self { table_name, select_columns }
    }

    /// Page query. Every row carries `total_count`, the size of the filtered
    /// result before the page window is applied.
    pub fn to_sql(&self, request: &ListingRequest, ids: &[String]) -> Result<SqlResult, FilterError> {
        let paging = request.paging;
        if paging.page <= 0 || paging.size <= 0 {
            return Err(FilterError::InvalidPaging);
        }

        let (where_clause, mut params) = FilterWhere::generate(request.filter.as_ref(), ids);
        let order_clause = FilterOrder::generate(request.sort.as_ref());

        params.push(SqlParam::Int(paging.size));
        let limit_index = params.len();
        params.push(SqlParam::Int(paging.offset()));
        let offset_index = params.len();

        let query = [
            format!("SELECT {}, COUNT(*) OVER() AS total_count", self.select_clause()),
            format!("FROM \"{}\"", self.table_name),
            format!("WHERE {}", where_clause),
            order_clause,
            format!("LIMIT ${} OFFSET ${}", limit_index, offset_index),
        ]
        .join(" ");

        Ok(SqlResult { query, params })
    }

    /// Filtered count without paging; used when the page window came back empty.
    pub fn to_count_sql(&self, request: &ListingRequest, ids: &[String]) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(request.filter.as_ref(), ids);
        let query = format!(
            "SELECT COUNT(*) AS count FROM \"{}\" WHERE {}",
            self.table_name, where_clause
        );
        SqlResult { query, params }
    }

    fn select_clause(&self) -> String {
        self.select_columns
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

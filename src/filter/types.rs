use serde::{Deserialize, Serialize};

/// Sentinel page size meaning "everything on one page".
pub const MAX_PAGE_SIZE: i64 = i32::MAX as i64;
pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = MAX_PAGE_SIZE;

/// Columns the product listing may sort or filter on.
pub const PRODUCT_LISTING_COLUMNS: ColumnWhitelist = ColumnWhitelist::new(&["name", "description", "color"]);

/// Canonical ordering when the caller does not ask for one.
pub const DEFAULT_SORT_COLUMN: &str = "name";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub size: i64,
}

impl Paging {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }
    }

    /// The caller sent neither page nor size.
    pub fn is_unset(&self) -> bool {
        self.page == 0 && self.size == 0
    }

    /// Out of range values fall back to the defaults.
    pub fn with_defaults(self) -> Self {
        let page = if self.page <= 0 { DEFAULT_PAGE } else { self.page };
        let size = if self.size <= 0 || self.size > MAX_PAGE_SIZE {
            DEFAULT_PAGE_SIZE
        } else {
            self.size
        };
        Self { page, size }
    }

    /// Saturates instead of overflowing on huge page numbers.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.size).max(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Case-insensitive parse of `ASC` / `DESC`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ASC" => Some(SortDirection::Asc),
            "DESC" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortParams {
    #[serde(default)]
    pub sort_by: String,
    #[serde(default)]
    pub sort_dir: String,
}

impl SortParams {
    pub fn is_present(&self) -> bool {
        !self.sort_by.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    #[serde(default)]
    pub filter_by: String,
    #[serde(default)]
    pub filter_pattern: String,
}

impl FilterParams {
    pub fn is_present(&self) -> bool {
        !self.filter_by.is_empty()
    }
}

/// The listing request as it arrives on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFilterSort {
    #[serde(default)]
    pub paging: Paging,
    #[serde(default)]
    pub sort: SortParams,
    #[serde(default)]
    pub filter: FilterParams,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnWhitelist {
    columns: &'static [&'static str],
}

impl ColumnWhitelist {
    pub const fn new(columns: &'static [&'static str]) -> Self {
        Self { columns }
    }

    /// Returns the canonical column name when `name` is allowed.
    pub fn resolve(&self, name: &str) -> Option<&'static str> {
        self.columns.iter().copied().find(|c| *c == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: &'static str,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub column: &'static str,
    pub pattern: String,
}

/// A listing request that passed validation. Columns are whitelist entries,
/// never caller text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub paging: Paging,
    pub sort: Option<SortSpec>,
    pub filter: Option<FilterSpec>,
    /// The caller sent no paging at all.
    pub unpaged: bool,
}

impl ListingRequest {
    /// Everything, canonical order, one page.
    pub fn all() -> Self {
        Self {
            paging: Paging::default().with_defaults(),
            sort: None,
            filter: None,
            unpaged: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    TextArray(Vec<String>),
    Int(i64),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

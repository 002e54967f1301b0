use super::types::{SortDirection, SortSpec, DEFAULT_SORT_COLUMN};

pub struct FilterOrder;

impl FilterOrder {
    /// Absent sort orders by the canonical column, ascending. `id` breaks ties
    /// so page windows stay stable.
    pub fn generate(sort: Option<&SortSpec>) -> String {
        let (column, direction) = match sort {
            Some(spec) => (spec.column, spec.direction),
            None => (DEFAULT_SORT_COLUMN, SortDirection::Asc),
        };
        format!("ORDER BY \"{}\" {}, \"id\" ASC", column, direction.to_sql())
    }
}

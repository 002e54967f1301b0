use super::types::{FilterSpec, SqlParam};

/// Builds the WHERE clause of a listing query, numbering placeholders from 1.
pub struct FilterWhere {
    params: Vec<SqlParam>,
    conditions: Vec<String>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self {
            params: vec![],
            conditions: vec![],
        }
    }

    pub fn generate(filter: Option<&FilterSpec>, ids: &[String]) -> (String, Vec<SqlParam>) {
        let mut filter_where = Self::new();
        if let Some(filter) = filter {
            filter_where.substring(filter.column, &filter.pattern);
        }
        filter_where.restrict_ids(ids);
        filter_where.finish()
    }

    /// Case-insensitive substring match. The pattern is always wrapped, so an
    /// empty pattern matches every row. `%` and `_` in the pattern are literal.
    fn substring(&mut self, column: &str, pattern: &str) {
        let placeholder = self.push(SqlParam::Text(format!("%{}%", escape_like(pattern))));
        self.conditions
            .push(format!("\"{}\" ILIKE {} ESCAPE '\\'", column, placeholder));
    }

    /// An empty id list is no restriction at all.
    fn restrict_ids(&mut self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        let placeholder = self.push(SqlParam::TextArray(ids.to_vec()));
        self.conditions.push(format!("\"id\" = ANY({})", placeholder));
    }

    fn push(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    fn finish(self) -> (String, Vec<SqlParam>) {
        let clause = if self.conditions.is_empty() {
            "TRUE".to_string()
        } else {
            self.conditions.join(" AND ")
        };
        (clause, self.params)
    }
}

/// Escapes LIKE wildcards so caller text only ever matches itself.
pub fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Default for FilterWhere {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filter_and_no_ids_matches_everything() {
        let (clause, params) = FilterWhere::generate(None, &[]);
        assert_eq!(clause, "TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn filter_pattern_is_wrapped() {
        let filter = FilterSpec { column: "color", pattern: "ab".into() };
        let (clause, params) = FilterWhere::generate(Some(&filter), &[]);
        assert_eq!(clause, "\"color\" ILIKE $1 ESCAPE '\\'");
        assert_eq!(params, vec![SqlParam::Text("%ab%".into())]);
    }

    #[test]
    fn empty_pattern_still_wrapped() {
        let filter = FilterSpec { column: "name", pattern: String::new() };
        let (_, params) = FilterWhere::generate(Some(&filter), &[]);
        assert_eq!(params, vec![SqlParam::Text("%%".into())]);
    }

    #[test]
    fn ids_follow_the_filter_placeholder() {
        let filter = FilterSpec { column: "name", pattern: "w".into() };
        let ids = vec!["a".to_string(), "b".to_string()];
        let (clause, params) = FilterWhere::generate(Some(&filter), &ids);
        assert_eq!(clause, "\"name\" ILIKE $1 ESCAPE '\\' AND \"id\" = ANY($2)");
        assert_eq!(params[1], SqlParam::TextArray(ids));
    }

    #[test]
    fn wildcards_in_the_pattern_are_literal() {
        let filter = FilterSpec { column: "name", pattern: "50%_off\\".into() };
        let (_, params) = FilterWhere::generate(Some(&filter), &[]);
        assert_eq!(params, vec![SqlParam::Text("%50\\%\\_off\\\\%".into())]);
    }
}

use sqlx::{
    postgres::{PgArguments, PgRow},
    query::{Query, QueryAs},
    FromRow, Postgres,
};

use crate::filter::{SqlParam, SqlResult};

/// Binds composed listing parameters in placeholder order.
pub struct QueryBuilder;

impl QueryBuilder {
    pub fn query_as<'q, T>(sql: &'q SqlResult) -> QueryAs<'q, Postgres, T, PgArguments>
    where
        T: for<'r> FromRow<'r, PgRow>,
    {
        sql.params
            .iter()
            .fold(sqlx::query_as::<_, T>(&sql.query), |q, p| match p {
                SqlParam::Text(s) => q.bind(s.as_str()),
                SqlParam::TextArray(values) => q.bind(values.as_slice()),
                SqlParam::Int(i) => q.bind(*i),
            })
    }

    pub fn query<'q>(sql: &'q SqlResult) -> Query<'q, Postgres, PgArguments> {
        sql.params
            .iter()
            .fold(sqlx::query(&sql.query), |q, p| match p {
                SqlParam::Text(s) => q.bind(s.as_str()),
                SqlParam::TextArray(values) => q.bind(values.as_slice()),
                SqlParam::Int(i) => q.bind(*i),
            })
    }
}

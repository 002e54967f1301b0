use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, error};

use crate::context::RequestContext;
use crate::database::manager::DatabaseError;
use crate::database::models::product::{PRODUCTS_TABLE, PRODUCT_COLUMNS};
use crate::database::models::{Product, ProductListRow};
use crate::database::query_builder::QueryBuilder;
use crate::filter::{escape_like, Filter, ListingRequest};

/// Narrow read/write contract over the product store.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, ctx: &RequestContext, id: &str) -> Result<Product, DatabaseError>;

    async fn find_by_name(&self, ctx: &RequestContext, name: &str) -> Result<Product, DatabaseError>;

    /// Page of products plus the size of the filtered, unpaged result.
    /// An empty `ids` slice applies no id restriction.
    async fn find_many(
        &self,
        ctx: &RequestContext,
        listing: &ListingRequest,
        ids: &[String],
    ) -> Result<(Vec<Product>, i64), DatabaseError>;

    /// Case-insensitive prefix match on name, ascending by name.
    async fn find_by_partial_name(
        &self,
        ctx: &RequestContext,
        prefix: &str,
        limit: i64,
    ) -> Result<Vec<Product>, DatabaseError>;

    async fn find_by_ids(&self, ctx: &RequestContext, ids: &[String]) -> Result<Vec<Product>, DatabaseError>;

    async fn insert(&self, ctx: &RequestContext, product: &Product) -> Result<Product, DatabaseError>;

    /// `NotFound` when no row carries `product.id`.
    async fn update(&self, ctx: &RequestContext, product: &Product) -> Result<Product, DatabaseError>;

    /// Deleting an unknown id is not an error.
    async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<(), DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

pub struct PgProductRepository {
    pool: PgPool,
    filter: Filter,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            filter: Filter::new(PRODUCTS_TABLE, PRODUCT_COLUMNS),
        }
    }

    fn log_failure(ctx: &RequestContext, op: &str, err: &DatabaseError) {
        match err {
            DatabaseError::NotFound(_) => {
                debug!(correlation_id = ctx.correlation_id(), op, "no matching product")
            }
            other => error!(correlation_id = ctx.correlation_id(), op, error = %other, "store operation failed"),
        }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, ctx: &RequestContext, id: &str) -> Result<Product, DatabaseError> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, description, color FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)
        .inspect_err(|e| Self::log_failure(ctx, "find_by_id", e))
    }

    async fn find_by_name(&self, ctx: &RequestContext, name: &str) -> Result<Product, DatabaseError> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, description, color FROM products WHERE name = $1",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)
        .inspect_err(|e| Self::log_failure(ctx, "find_by_name", e))
    }

    async fn find_many(
        &self,
        ctx: &RequestContext,
        listing: &ListingRequest,
        ids: &[String],
    ) -> Result<(Vec<Product>, i64), DatabaseError> {
        let sql = self.filter.to_sql(listing, ids)?;
        debug!(correlation_id = ctx.correlation_id(), query = %sql.query, "listing products");

        let rows: Vec<ProductListRow> = QueryBuilder::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from)
            .inspect_err(|e| Self::log_failure(ctx, "find_many", e))?;

        let total = match rows.first() {
            Some(row) => row.total_count,
            // Window past the end: the per-row total is unavailable.
            None if listing.paging.offset() > 0 => {
                let count_sql = self.filter.to_count_sql(listing, ids);
                let row = QueryBuilder::query(&count_sql)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DatabaseError::from)
                    .inspect_err(|e| Self::log_failure(ctx, "count", e))?;
                row.try_get::<i64, _>("count").map_err(DatabaseError::from)?
            }
            None => 0,
        };

        Ok((rows.into_iter().map(|r| r.product).collect(), total))
    }

    async fn find_by_partial_name(
        &self,
        ctx: &RequestContext,
        prefix: &str,
        limit: i64,
    ) -> Result<Vec<Product>, DatabaseError> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, description, color FROM products \
             WHERE name ILIKE $1 ESCAPE '\\' ORDER BY name ASC LIMIT $2",
        )
        .bind(format!("{}%", escape_like(prefix)))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from)
        .inspect_err(|e| Self::log_failure(ctx, "find_by_partial_name", e))
    }

    async fn find_by_ids(&self, ctx: &RequestContext, ids: &[String]) -> Result<Vec<Product>, DatabaseError> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, description, color FROM products WHERE id = ANY($1) ORDER BY name ASC",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from)
        .inspect_err(|e| Self::log_failure(ctx, "find_by_ids", e))
    }

    async fn insert(&self, ctx: &RequestContext, product: &Product) -> Result<Product, DatabaseError> {
        // Dropping the transaction without commit rolls it back.
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        sqlx::query("INSERT INTO products (id, name, description, color) VALUES ($1, $2, $3, $4)")
            .bind(&product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.color)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::from)
            .inspect_err(|e| Self::log_failure(ctx, "insert", e))?;

        tx.commit()
            .await
            .map_err(DatabaseError::from)
            .inspect_err(|e| Self::log_failure(ctx, "insert_commit", e))?;

        Ok(product.clone())
    }

    async fn update(&self, ctx: &RequestContext, product: &Product) -> Result<Product, DatabaseError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let result = sqlx::query(
            "UPDATE products SET name = $1, description = $2, color = $3 WHERE id = $4",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.color)
        .bind(&product.id)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from)
        .inspect_err(|e| Self::log_failure(ctx, "update", e))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("product {}", product.id)));
        }

        tx.commit()
            .await
            .map_err(DatabaseError::from)
            .inspect_err(|e| Self::log_failure(ctx, "update_commit", e))?;

        Ok(product.clone())
    }

    async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from)
            .inspect_err(|e| Self::log_failure(ctx, "delete", e))?;

        debug!(
            correlation_id = ctx.correlation_id(),
            id,
            rows = result.rows_affected(),
            "product delete"
        );
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::database::{DatabaseError, Product, ProductRepository};
use crate::filter::ListingRequest;

/// Upper bound on partial-name matches.
pub const PRODUCT_RECORDS_LIMIT: i64 = 20;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("query failed: {0}")]
    QueryFailed(String),

    #[error("internal failure: {0}")]
    Internal(String),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ServiceError::NotFound(msg),
            DatabaseError::AlreadyExists(msg) => ServiceError::AlreadyExists(msg),
            DatabaseError::QueryFailed(msg) => ServiceError::QueryFailed(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

#[async_trait]
pub trait ProductService: Send + Sync {
    async fn find_all(
        &self,
        ctx: &RequestContext,
        listing: &ListingRequest,
    ) -> Result<(Vec<Product>, i64), ServiceError>;

    async fn find_by_partial_name(&self, ctx: &RequestContext, name: &str) -> Result<Vec<Product>, ServiceError>;

    async fn find_by_id(&self, ctx: &RequestContext, id: &str) -> Result<Product, ServiceError>;

    async fn find_by_ids(&self, ctx: &RequestContext, ids: &[String]) -> Result<Vec<Product>, ServiceError>;

    /// Assigns a fresh id; the incoming id is ignored.
    async fn add_product(&self, ctx: &RequestContext, product: Product) -> Result<Product, ServiceError>;

    async fn update_product(&self, ctx: &RequestContext, product: Product) -> Result<Product, ServiceError>;

    async fn delete_product(&self, ctx: &RequestContext, id: &str, force_delete: bool) -> Result<(), ServiceError>;
}

/// Product business rules over a [`ProductRepository`].
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ProductService for CatalogService {
    async fn find_all(
        &self,
        ctx: &RequestContext,
        listing: &ListingRequest,
    ) -> Result<(Vec<Product>, i64), ServiceError> {
        self.products.find_many(ctx, listing, &[]).await.map_err(|e| {
            error!(correlation_id = ctx.correlation_id(), error = %e, "failed to list products");
            ServiceError::from(e)
        })
    }

    async fn find_by_partial_name(&self, ctx: &RequestContext, name: &str) -> Result<Vec<Product>, ServiceError> {
        Ok(self
            .products
            .find_by_partial_name(ctx, name, PRODUCT_RECORDS_LIMIT)
            .await?)
    }

    async fn find_by_id(&self, ctx: &RequestContext, id: &str) -> Result<Product, ServiceError> {
        self.products.find_by_id(ctx, id).await.map_err(|e| match e {
            DatabaseError::NotFound(_) => ServiceError::NotFound(format!("product {} doesn't exist", id)),
            other => other.into(),
        })
    }

    async fn find_by_ids(&self, ctx: &RequestContext, ids: &[String]) -> Result<Vec<Product>, ServiceError> {
        Ok(self.products.find_by_ids(ctx, ids).await?)
    }

    async fn add_product(&self, ctx: &RequestContext, mut product: Product) -> Result<Product, ServiceError> {
        product.id = Uuid::new_v4().to_string();

        match self.products.find_by_name(ctx, &product.name).await {
            Ok(existing) => {
                warn!(correlation_id = ctx.correlation_id(), name = %existing.name, "product name already exists");
                return Err(ServiceError::AlreadyExists("product name already exist".into()));
            }
            Err(DatabaseError::NotFound(_)) => {}
            Err(other) => return Err(other.into()),
        }

        // A concurrent insert of the same name loses at the unique constraint.
        let created = self.products.insert(ctx, &product).await.map_err(|e| match e {
            DatabaseError::AlreadyExists(_) => ServiceError::AlreadyExists("product name already exist".into()),
            other => other.into(),
        })?;

        info!(correlation_id = ctx.correlation_id(), id = %created.id, "product created");
        Ok(created)
    }

    async fn update_product(&self, ctx: &RequestContext, product: Product) -> Result<Product, ServiceError> {
        match self.products.find_by_id(ctx, &product.id).await {
            Ok(_) => {}
            Err(DatabaseError::NotFound(_)) => {
                return Err(ServiceError::NotFound("product doesn't exist".into()));
            }
            Err(other) => return Err(other.into()),
        }

        let updated = self.products.update(ctx, &product).await.map_err(|e| match e {
            DatabaseError::AlreadyExists(_) => ServiceError::AlreadyExists("product name already exist".into()),
            DatabaseError::NotFound(_) => ServiceError::NotFound("product doesn't exist".into()),
            other => other.into(),
        })?;

        info!(correlation_id = ctx.correlation_id(), id = %updated.id, "product updated");
        Ok(updated)
    }

    async fn delete_product(&self, ctx: &RequestContext, id: &str, force_delete: bool) -> Result<(), ServiceError> {
        // No dependent rows exist, so a forced delete is the same statement.
        self.products.delete(ctx, id).await?;
        info!(correlation_id = ctx.correlation_id(), id, force_delete, "product deleted");
        Ok(())
    }
}

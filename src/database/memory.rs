use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::context::RequestContext;
use crate::database::manager::DatabaseError;
use crate::database::models::Product;
use crate::database::repository::ProductRepository;
use crate::filter::{ListingRequest, SortDirection, DEFAULT_SORT_COLUMN};

/// Product store held in process memory. Enforces the same name uniqueness,
/// filtering, id restriction and paging as the Postgres store. Text compares
/// by code point rather than by database collation, so mixed-case orderings
/// can differ from Postgres.
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<BTreeMap<String, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let map = products.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            products: RwLock::new(map),
        }
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

fn column<'a>(product: &'a Product, name: &str) -> &'a str {
    match name {
        "description" => &product.description,
        "color" => &product.color,
        "id" => &product.id,
        _ => &product.name,
    }
}

fn sort_by_name(products: &mut [Product]) {
    products.sort_by(|a, b| a.name.cmp(&b.name));
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, _ctx: &RequestContext, id: &str) -> Result<Product, DatabaseError> {
        self.products
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("product {}", id)))
    }

    async fn find_by_name(&self, _ctx: &RequestContext, name: &str) -> Result<Product, DatabaseError> {
        self.products
            .read()
            .await
            .values()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("product named {}", name)))
    }

    async fn find_many(
        &self,
        _ctx: &RequestContext,
        listing: &ListingRequest,
        ids: &[String],
    ) -> Result<(Vec<Product>, i64), DatabaseError> {
        let paging = listing.paging;
        if paging.page <= 0 || paging.size <= 0 {
            return Err(DatabaseError::InvalidPaging);
        }

        let pattern = listing.filter.as_ref().map(|f| (f.column, f.pattern.to_lowercase()));
        let mut matched: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| ids.is_empty() || ids.contains(&p.id))
            .filter(|p| match &pattern {
                Some((col, needle)) => column(p, col).to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        let (sort_column, direction) = listing
            .sort
            .as_ref()
            .map(|s| (s.column, s.direction))
            .unwrap_or((DEFAULT_SORT_COLUMN, SortDirection::Asc));
        matched.sort_by(|a, b| {
            let ord = column(a, sort_column).cmp(column(b, sort_column));
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
            .then_with(|| a.id.cmp(&b.id))
        });

        let total = matched.len() as i64;
        let offset = usize::try_from(paging.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(paging.size).unwrap_or(usize::MAX);
        let page = matched.into_iter().skip(offset).take(size).collect();
        Ok((page, total))
    }

    async fn find_by_partial_name(
        &self,
        _ctx: &RequestContext,
        prefix: &str,
        limit: i64,
    ) -> Result<Vec<Product>, DatabaseError> {
        let prefix = prefix.to_lowercase();
        let mut matched: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| p.name.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect();
        sort_by_name(&mut matched);
        matched.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(matched)
    }

    async fn find_by_ids(&self, _ctx: &RequestContext, ids: &[String]) -> Result<Vec<Product>, DatabaseError> {
        let products = self.products.read().await;
        let mut matched: Vec<Product> = ids.iter().filter_map(|id| products.get(id).cloned()).collect();
        sort_by_name(&mut matched);
        matched.dedup_by(|a, b| a.id == b.id);
        Ok(matched)
    }

    async fn insert(&self, _ctx: &RequestContext, product: &Product) -> Result<Product, DatabaseError> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.id) || products.values().any(|p| p.name == product.name) {
            return Err(DatabaseError::AlreadyExists(format!("product {}", product.name)));
        }
        products.insert(product.id.clone(), product.clone());
        Ok(product.clone())
    }

    async fn update(&self, _ctx: &RequestContext, product: &Product) -> Result<Product, DatabaseError> {
        let mut products = self.products.write().await;
        if products
            .values()
            .any(|p| p.name == product.name && p.id != product.id)
        {
            return Err(DatabaseError::AlreadyExists(format!("product {}", product.name)));
        }
        match products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(product.clone())
            }
            None => Err(DatabaseError::NotFound(format!("product {}", product.id))),
        }
    }

    async fn delete(&self, _ctx: &RequestContext, id: &str) -> Result<(), DatabaseError> {
        self.products.write().await.remove(id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{PageFilterSort, PRODUCT_LISTING_COLUMNS};

    fn product(id: &str, name: &str, color: &str) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            description: format!("{} description", name),
            color: color.into(),
        }
    }

    fn seeded() -> InMemoryProductRepository {
        InMemoryProductRepository::with_products(vec![
            product("1", "Widget", "#123"),
            product("2", "Gadget", "#abc"),
            product("3", "Gizmo", "#ABCDEF"),
        ])
    }

    fn listing(json: serde_json::Value) -> ListingRequest {
        serde_json::from_value::<PageFilterSort>(json)
            .unwrap()
            .validate(&PRODUCT_LISTING_COLUMNS)
            .unwrap()
    }

    #[tokio::test]
    async fn total_reflects_filter_not_window() {
        let repo = seeded();
        let ctx = RequestContext::default();
        let (items, total) = repo
            .find_many(&ctx, &listing(serde_json::json!({"paging": {"page": 1, "size": 1}, "filter": {"filterBy": "name", "filterPattern": "G"}})), &[])
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Gadget");
    }

    #[tokio::test]
    async fn empty_ids_are_no_restriction() {
        let repo = seeded();
        let ctx = RequestContext::default();
        let (_, total) = repo.find_many(&ctx, &ListingRequest::all(), &[]).await.unwrap();
        assert_eq!(total, 3);

        let (items, total) = repo
            .find_many(&ctx, &ListingRequest::all(), &["3".to_string()])
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].name, "Gizmo");
    }

    #[tokio::test]
    async fn sorts_descending_on_request() {
        let repo = seeded();
        let (items, _) = repo
            .find_many(
                &RequestContext::default(),
                &listing(serde_json::json!({"sort": {"sortBy": "name", "sortDir": "desc"}})),
                &[],
            )
            .await
            .unwrap();
        let names: Vec<_> = items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Widget", "Gizmo", "Gadget"]);
    }

    #[tokio::test]
    async fn equal_sort_values_break_ties_by_id() {
        let repo = InMemoryProductRepository::with_products(vec![
            product("c", "Cup", "#123"),
            product("a", "Bowl", "#123"),
            product("b", "Plate", "#123"),
        ]);
        let (items, _) = repo
            .find_many(
                &RequestContext::default(),
                &listing(serde_json::json!({"sort": {"sortBy": "color", "sortDir": "DESC"}})),
                &[],
            )
            .await
            .unwrap();
        let ids: Vec<_> = items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn wildcard_characters_match_literally() {
        let repo = InMemoryProductRepository::with_products(vec![
            product("1", "50% off", "#123"),
            product("2", "500 off", "#123"),
        ]);
        let (items, total) = repo
            .find_many(
                &RequestContext::default(),
                &listing(serde_json::json!({"filter": {"filterBy": "name", "filterPattern": "0%"}})),
                &[],
            )
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].id, "1");
    }

    #[tokio::test]
    async fn duplicate_name_is_already_exists() {
        let repo = seeded();
        let err = repo
            .insert(&RequestContext::default(), &product("9", "Widget", "#000"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let repo = seeded();
        let err = repo
            .update(&RequestContext::default(), &product("404", "Nothing", "#000"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[tokio::test]
    async fn partial_name_is_a_bounded_prefix_match() {
        let repo = seeded();
        let items = repo
            .find_by_partial_name(&RequestContext::default(), "g", 1)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Gadget");
    }
}

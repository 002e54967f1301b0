use serde::{Deserialize, Serialize};

use crate::database::Product;
use crate::filter::PageFilterSort;
use crate::services::ServiceError;

fn required(field: &str) -> ServiceError {
    ServiceError::Validation(format!("field {} is required", field))
}

/// Body of `saveProduct`. An empty id creates, anything else updates.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SaveProduct {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
}

impl SaveProduct {
    /// Checks required fields and the color code, returning the product with
    /// its color normalized to carry a `#`.
    pub fn validate(self) -> Result<Product, ServiceError> {
        if self.name.trim().is_empty() {
            return Err(required("name"));
        }
        if self.color.trim().is_empty() {
            return Err(required("color"));
        }
        if !is_hex_color(&self.color) {
            return Err(ServiceError::Validation("invalid color code".into()));
        }

        Ok(Product {
            id: self.id,
            name: self.name,
            description: self.description,
            color: with_hash_prefix(&self.color),
        })
    }

    pub fn is_create(&self) -> bool {
        self.id.is_empty()
    }
}

/// Three or six hex digits, optionally behind a single `#`.
pub fn is_hex_color(code: &str) -> bool {
    let digits = code.strip_prefix('#').unwrap_or(code);
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn with_hash_prefix(code: &str) -> String {
    if code.starts_with('#') {
        code.to_string()
    } else {
        format!("#{}", code)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProduct {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub force_delete: bool,
}

impl DeleteProduct {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.id.trim().is_empty() {
            return Err(required("id"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProducts {
    /// Absent means everything on one page.
    #[serde(default)]
    pub page_filter_sort: PageFilterSort,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetProductsByName {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetProductsByIds {
    #[serde(default)]
    pub ids: Vec<String>,
}

impl GetProductsByIds {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.ids.is_empty() {
            return Err(required("ids"));
        }
        Ok(())
    }
}

/// Single-resource lookup by id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub id: String,
}

impl Resource {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.id.trim().is_empty() {
            return Err(required("id"));
        }
        Ok(())
    }
}

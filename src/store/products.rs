use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::{IdGenerator, RandomIds};
use super::{StoreError, StoreResult};

/// A stored product: a generated id plus whatever properties the client sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Product {
    fn new(id: String, mut fields: Map<String, Value>) -> Self {
        // the store owns ids; a client-supplied one never survives
        fields.remove("id");
        Self { id, fields }
    }
}

/// Products in insertion order.
#[derive(Clone)]
pub struct ProductStore {
    products: Arc<RwLock<Vec<Product>>>,
    ids: Arc<dyn IdGenerator>,
}

impl Default for ProductStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductStore {
    pub fn new() -> Self {
        Self::with_ids(Arc::new(RandomIds))
    }

    pub fn with_ids(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            products: Arc::new(RwLock::new(Vec::new())),
            ids,
        }
    }

    /// Assigns a fresh id and appends to the end of the collection.
    pub fn create(&self, fields: Map<String, Value>) -> StoreResult<Product> {
        let mut products = self
            .products
            .write()
            .map_err(|_| StoreError::Poisoned("products"))?;

        let id = loop {
            let candidate = self.ids.next_id();
            if !products.iter().any(|p| p.id == candidate) {
                break candidate;
            }
        };

        let product = Product::new(id, fields);
        products.push(product.clone());

        tracing::debug!("Created product {}", product.id);
        Ok(product)
    }

    pub fn list(&self) -> StoreResult<Vec<Product>> {
        let products = self
            .products
            .read()
            .map_err(|_| StoreError::Poisoned("products"))?;
        Ok(products.clone())
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        let products = self
            .products
            .read()
            .map_err(|_| StoreError::Poisoned("products"))?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    /// Replaces the whole record in place, keeping its id and position.
    pub fn replace(&self, id: &str, fields: Map<String, Value>) -> StoreResult<Option<Product>> {
        let mut products = self
            .products
            .write()
            .map_err(|_| StoreError::Poisoned("products"))?;

        let Some(index) = products.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        let product = Product::new(id.to_string(), fields);
        products[index] = product.clone();

        tracing::debug!("Replaced product {}", id);
        Ok(Some(product))
    }

    /// Returns whether a product was removed.
    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut products = self
            .products
            .write()
            .map_err(|_| StoreError::Poisoned("products"))?;

        let Some(index) = products.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        products.remove(index);

        tracing::debug!("Deleted product {}", id);
        Ok(true)
    }

    pub fn len(&self) -> StoreResult<usize> {
        let products = self
            .products
            .read()
            .map_err(|_| StoreError::Poisoned("products"))?;
        Ok(products.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

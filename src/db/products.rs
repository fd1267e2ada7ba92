use crate::auth::Principal;
use crate::cache::ResponseCache;
use crate::db::schema::products::dsl::*;
use crate::db::{DbConnection, RepositoryError};
use crate::models::product::{NewProduct, Product, UpdateProduct};
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error;
use log::{debug, error};

#[derive(Clone)]
pub struct ProductOperations {
    pool: Pool<ConnectionManager<PgConnection>>,
    cache: ResponseCache,
}

impl ProductOperations {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>, cache: ResponseCache) -> Self {
        Self { pool, cache }
    }

    pub fn create_product(&self, new_product: NewProduct) -> Result<Product, RepositoryError> {
        validate_price(&new_product.price)?;

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("create_product: failed to acquire DB connection: {}", e);
            e
        })?;

        let created = diesel::insert_into(products)
            .values(&new_product)
            .returning(Product::as_returning())
            .get_result(conn.connection())
            .map_err(|e| {
                error!(
                    "create_product: error inserting product '{}': {}",
                    new_product.name, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        self.cache.invalidate_prefix("products:");
        Ok(created)
    }

    pub fn get_product(&self, search_product_id: i32) -> Result<Product, RepositoryError> {
        let cache_key = format!("products:{search_product_id}");
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok(product) = serde_json::from_value::<Product>(cached) {
                return Ok(product);
            }
        }

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_product: failed to acquire DB connection for product_id {}: {}",
                search_product_id, e
            );
            e
        })?;

        let product = products
            .filter(product_id.eq(search_product_id))
            .select(Product::as_select())
            .first::<Product>(conn.connection())
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFound {
                    kind: "product",
                    id: search_product_id,
                },
                other => {
                    error!(
                        "get_product: error loading product {}: {}",
                        search_product_id, other
                    );
                    RepositoryError::DatabaseError(other)
                }
            })?;

        if let Ok(value) = serde_json::to_value(&product) {
            self.cache.put(&cache_key, value);
        }
        Ok(product)
    }

    pub fn update_product(
        &self,
        search_product_id: i32,
        changes: UpdateProduct,
    ) -> Result<Product, RepositoryError> {
        if let Some(new_price) = &changes.price {
            validate_price(new_price)?;
        }

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "update_product: failed to acquire DB connection for product_id {}: {}",
                search_product_id, e
            );
            e
        })?;

        let updated = diesel::update(products.filter(product_id.eq(search_product_id)))
            .set(&changes)
            .returning(Product::as_returning())
            .get_result(conn.connection())
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFound {
                    kind: "product",
                    id: search_product_id,
                },
                other => {
                    error!(
                        "update_product: error updating product {}: {}",
                        search_product_id, other
                    );
                    RepositoryError::DatabaseError(other)
                }
            })?;

        self.cache.invalidate_prefix("products:");
        Ok(updated)
    }

    pub fn set_availability(
        &self,
        search_product_id: i32,
        available: bool,
    ) -> Result<(), RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "set_availability: failed to acquire DB connection for product_id {}: {}",
                search_product_id, e
            );
            e
        })?;

        let updated = diesel::update(products.filter(product_id.eq(search_product_id)))
            .set(is_available.eq(available))
            .execute(conn.connection())
            .map_err(|e| {
                error!(
                    "set_availability: error updating product {}: {}",
                    search_product_id, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        if updated == 0 {
            return Err(RepositoryError::NotFound {
                kind: "product",
                id: search_product_id,
            });
        }
        self.cache.invalidate_prefix("products:");
        debug!(
            "set_availability: product {} available={}",
            search_product_id, available
        );
        Ok(())
    }

    pub fn delete_product(&self, search_product_id: i32) -> Result<(), RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "delete_product: failed to acquire DB connection for product_id {}: {}",
                search_product_id, e
            );
            e
        })?;

        let deleted = diesel::delete(products.filter(product_id.eq(search_product_id)))
            .execute(conn.connection())
            .map_err(|e| {
                error!(
                    "delete_product: error deleting product {}: {}",
                    search_product_id, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound {
                kind: "product",
                id: search_product_id,
            });
        }
        self.cache.invalidate_prefix("products:");
        Ok(())
    }

    pub fn list_by_restaurant(
        &self,
        search_restaurant_id: i32,
    ) -> Result<Vec<Product>, RepositoryError> {
        let cache_key = format!("products:restaurant:{search_restaurant_id}");
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok(list) = serde_json::from_value::<Vec<Product>>(cached) {
                return Ok(list);
            }
        }

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "list_by_restaurant: failed to acquire DB connection for restaurant_id {}: {}",
                search_restaurant_id, e
            );
            e
        })?;

        let list = products
            .filter(restaurant_id.eq(search_restaurant_id))
            .order_by(name.asc())
            .select(Product::as_select())
            .load::<Product>(conn.connection())
            .map_err(|e| {
                error!(
                    "list_by_restaurant: error fetching products for restaurant {}: {}",
                    search_restaurant_id, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        if let Ok(value) = serde_json::to_value(&list) {
            self.cache.put(&cache_key, value);
        }
        Ok(list)
    }

    pub fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        if let Some(cached) = self.cache.get("products:all") {
            if let Ok(list) = serde_json::from_value::<Vec<Product>>(cached) {
                return Ok(list);
            }
        }

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("list_all: failed to acquire DB connection: {}", e);
            e
        })?;

        let list = products
            .order_by(name.asc())
            .select(Product::as_select())
            .load::<Product>(conn.connection())
            .map_err(|e| {
                error!("list_all: error fetching products: {}", e);
                RepositoryError::DatabaseError(e)
            })?;

        if let Ok(value) = serde_json::to_value(&list) {
            self.cache.put("products:all", value);
        }
        Ok(list)
    }

    /// Catalog browse: only available products show up.
    pub fn list_by_category(&self, search_category: &str) -> Result<Vec<Product>, RepositoryError> {
        let cache_key = format!("products:category:{search_category}");
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok(list) = serde_json::from_value::<Vec<Product>>(cached) {
                return Ok(list);
            }
        }

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "list_by_category: failed to acquire DB connection for category '{}': {}",
                search_category, e
            );
            e
        })?;

        let list = products
            .filter(category.eq(search_category))
            .filter(is_available.eq(true))
            .order_by(name.asc())
            .select(Product::as_select())
            .load::<Product>(conn.connection())
            .map_err(|e| {
                error!(
                    "list_by_category: error fetching products for category '{}': {}",
                    search_category, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        if let Ok(value) = serde_json::to_value(&list) {
            self.cache.put(&cache_key, value);
        }
        Ok(list)
    }

    /// Case-insensitive substring match on the product name, available only.
    pub fn search_by_name(&self, term: &str) -> Result<Vec<Product>, RepositoryError> {
        let cache_key = format!("products:name:{term}");
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok(list) = serde_json::from_value::<Vec<Product>>(cached) {
                return Ok(list);
            }
        }

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "search_by_name: failed to acquire DB connection for term '{}': {}",
                term, e
            );
            e
        })?;

        let pattern = format!("%{term}%");
        let list = products
            .filter(name.ilike(pattern))
            .filter(is_available.eq(true))
            .order_by(name.asc())
            .select(Product::as_select())
            .load::<Product>(conn.connection())
            .map_err(|e| {
                error!(
                    "search_by_name: error searching products for term '{}': {}",
                    term, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        if let Ok(value) = serde_json::to_value(&list) {
            self.cache.put(&cache_key, value);
        }
        Ok(list)
    }

    /// Fail-closed ownership check: true only when the product exists and its
    /// restaurant matches the principal's restaurant claim.
    pub fn is_owner(&self, search_product_id: i32, principal: &Principal) -> bool {
        let Some(restaurant_id_val) = principal.restaurant_id() else {
            return false;
        };
        match self.get_product(search_product_id) {
            Ok(product) => product.restaurant_id == restaurant_id_val,
            Err(e) => {
                debug!(
                    "is_owner: denying access to product {}: {}",
                    search_product_id, e
                );
                false
            }
        }
    }
}

fn validate_price(value: &BigDecimal) -> Result<(), RepositoryError> {
    if value <= &BigDecimal::from(0) {
        return Err(RepositoryError::BusinessRule(
            "product price must be positive".to_string(),
        ));
    }
    Ok(())
}

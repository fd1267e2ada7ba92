use crate::cache::ResponseCache;
use crate::db::schema::customers::dsl::*;
use crate::db::{DbConnection, RepositoryError};
use crate::models::customer::{Customer, NewCustomer, UpdateCustomer};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error};
use log::{debug, error};

#[derive(Clone)]
pub struct CustomerOperations {
    pool: Pool<ConnectionManager<PgConnection>>,
    cache: ResponseCache,
}

impl CustomerOperations {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>, cache: ResponseCache) -> Self {
        Self { pool, cache }
    }

    pub fn create_customer(&self, new_customer: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("create_customer: failed to acquire DB connection: {}", e);
            e
        })?;

        let created = diesel::insert_into(customers)
            .values(&new_customer)
            .returning(Customer::as_returning())
            .get_result(conn.connection())
            .map_err(|e| match e {
                Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    RepositoryError::Conflict {
                        field: "email",
                        value: new_customer.email.clone(),
                    }
                }
                other => {
                    error!(
                        "create_customer: error inserting customer '{}': {}",
                        new_customer.email, other
                    );
                    RepositoryError::DatabaseError(other)
                }
            })?;

        self.cache.invalidate_prefix("customers:");
        Ok(created)
    }

    pub fn get_customer(&self, search_customer_id: i32) -> Result<Customer, RepositoryError> {
        let cache_key = format!("customers:{search_customer_id}");
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok(customer) = serde_json::from_value::<Customer>(cached) {
                return Ok(customer);
            }
        }

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_customer: failed to acquire DB connection for customer_id {}: {}",
                search_customer_id, e
            );
            e
        })?;

        let customer = customers
            .filter(customer_id.eq(search_customer_id))
            .select(Customer::as_select())
            .first::<Customer>(conn.connection())
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFound {
                    kind: "customer",
                    id: search_customer_id,
                },
                other => {
                    error!(
                        "get_customer: error loading customer {}: {}",
                        search_customer_id, other
                    );
                    RepositoryError::DatabaseError(other)
                }
            })?;

        if let Ok(value) = serde_json::to_value(&customer) {
            self.cache.put(&cache_key, value);
        }
        Ok(customer)
    }

    pub fn get_by_email(&self, search_email: &str) -> Result<Customer, RepositoryError> {
        let cache_key = format!("customers:email:{search_email}");
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok(customer) = serde_json::from_value::<Customer>(cached) {
                return Ok(customer);
            }
        }

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_by_email: failed to acquire DB connection for email '{}': {}",
                search_email, e
            );
            e
        })?;

        let customer = customers
            .filter(email.eq(search_email))
            .select(Customer::as_select())
            .first::<Customer>(conn.connection())
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFoundBy {
                    kind: "customer",
                    field: "email",
                    value: search_email.to_string(),
                },
                other => {
                    error!(
                        "get_by_email: error loading customer '{}': {}",
                        search_email, other
                    );
                    RepositoryError::DatabaseError(other)
                }
            })?;

        if let Ok(value) = serde_json::to_value(&customer) {
            self.cache.put(&cache_key, value);
        }
        Ok(customer)
    }

    pub fn update_customer(
        &self,
        search_customer_id: i32,
        changes: UpdateCustomer,
    ) -> Result<Customer, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "update_customer: failed to acquire DB connection for customer_id {}: {}",
                search_customer_id, e
            );
            e
        })?;

        let updated = diesel::update(customers.filter(customer_id.eq(search_customer_id)))
            .set(&changes)
            .returning(Customer::as_returning())
            .get_result(conn.connection())
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFound {
                    kind: "customer",
                    id: search_customer_id,
                },
                other => {
                    error!(
                        "update_customer: error updating customer {}: {}",
                        search_customer_id, other
                    );
                    RepositoryError::DatabaseError(other)
                }
            })?;

        self.cache.invalidate_prefix("customers:");
        Ok(updated)
    }

    /// Soft delete: flips the active flag, never removes the row.
    pub fn set_active(
        &self,
        search_customer_id: i32,
        active: bool,
    ) -> Result<(), RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "set_active: failed to acquire DB connection for customer_id {}: {}",
                search_customer_id, e
            );
            e
        })?;

        let updated = diesel::update(customers.filter(customer_id.eq(search_customer_id)))
            .set(is_active.eq(active))
            .execute(conn.connection())
            .map_err(|e| {
                error!(
                    "set_active: error updating customer {}: {}",
                    search_customer_id, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        if updated == 0 {
            return Err(RepositoryError::NotFound {
                kind: "customer",
                id: search_customer_id,
            });
        }
        self.cache.invalidate_prefix("customers:");
        debug!(
            "set_active: customer {} active={}",
            search_customer_id, active
        );
        Ok(())
    }

    pub fn list_active(&self) -> Result<Vec<Customer>, RepositoryError> {
        if let Some(cached) = self.cache.get("customers:active") {
            if let Ok(list) = serde_json::from_value::<Vec<Customer>>(cached) {
                return Ok(list);
            }
        }

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("list_active: failed to acquire DB connection: {}", e);
            e
        })?;

        let list = customers
            .filter(is_active.eq(true))
            .order_by(name.asc())
            .select(Customer::as_select())
            .load::<Customer>(conn.connection())
            .map_err(|e| {
                error!("list_active: error fetching customers: {}", e);
                RepositoryError::DatabaseError(e)
            })?;

        if let Ok(value) = serde_json::to_value(&list) {
            self.cache.put("customers:active", value);
        }
        Ok(list)
    }
}

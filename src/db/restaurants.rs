use crate::auth::Principal;
use crate::cache::ResponseCache;
use crate::db::orders::MAX_PAGE_SIZE;
use crate::db::schema::restaurants::dsl::*;
use crate::db::{DbConnection, RepositoryError};
use crate::enums::restaurants::PagedRestaurants;
use crate::models::restaurant::{NewRestaurant, Restaurant, UpdateRestaurant};
use crate::validation::is_valid_opening_hours;
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error};
use log::{debug, error};

#[derive(Debug, Default, Clone)]
pub struct RestaurantListFilter {
    pub category: Option<String>,
    pub active: Option<bool>,
}

#[derive(Clone)]
pub struct RestaurantOperations {
    pool: Pool<ConnectionManager<PgConnection>>,
    cache: ResponseCache,
}

impl RestaurantOperations {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>, cache: ResponseCache) -> Self {
        Self { pool, cache }
    }

    pub fn create_restaurant(
        &self,
        new_restaurant: NewRestaurant,
    ) -> Result<Restaurant, RepositoryError> {
        validate_delivery_fee(&new_restaurant.delivery_fee)?;
        validate_delivery_time(new_restaurant.delivery_time_minutes)?;
        validate_opening_hours(&new_restaurant.opening_hours)?;

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("create_restaurant: failed to acquire DB connection: {}", e);
            e
        })?;

        let created = diesel::insert_into(restaurants)
            .values(&new_restaurant)
            .returning(Restaurant::as_returning())
            .get_result(conn.connection())
            .map_err(|e| match e {
                Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    RepositoryError::Conflict {
                        field: "phone",
                        value: new_restaurant.phone.clone(),
                    }
                }
                other => {
                    error!(
                        "create_restaurant: error inserting restaurant '{}': {}",
                        new_restaurant.name, other
                    );
                    RepositoryError::DatabaseError(other)
                }
            })?;

        self.cache.invalidate_prefix("restaurants:");
        Ok(created)
    }

    pub fn get_restaurant(
        &self,
        search_restaurant_id: i32,
    ) -> Result<Restaurant, RepositoryError> {
        let cache_key = format!("restaurants:{search_restaurant_id}");
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok(restaurant) = serde_json::from_value::<Restaurant>(cached) {
                return Ok(restaurant);
            }
        }

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_restaurant: failed to acquire DB connection for restaurant_id {}: {}",
                search_restaurant_id, e
            );
            e
        })?;

        let restaurant = restaurants
            .filter(restaurant_id.eq(search_restaurant_id))
            .select(Restaurant::as_select())
            .first::<Restaurant>(conn.connection())
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFound {
                    kind: "restaurant",
                    id: search_restaurant_id,
                },
                other => {
                    error!(
                        "get_restaurant: error loading restaurant {}: {}",
                        search_restaurant_id, other
                    );
                    RepositoryError::DatabaseError(other)
                }
            })?;

        if let Ok(value) = serde_json::to_value(&restaurant) {
            self.cache.put(&cache_key, value);
        }
        Ok(restaurant)
    }

    pub fn update_restaurant(
        &self,
        search_restaurant_id: i32,
        changes: UpdateRestaurant,
    ) -> Result<Restaurant, RepositoryError> {
        if let Some(fee) = &changes.delivery_fee {
            validate_delivery_fee(fee)?;
        }
        if let Some(minutes) = changes.delivery_time_minutes {
            validate_delivery_time(minutes)?;
        }
        if let Some(hours) = &changes.opening_hours {
            validate_opening_hours(hours)?;
        }

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "update_restaurant: failed to acquire DB connection for restaurant_id {}: {}",
                search_restaurant_id, e
            );
            e
        })?;

        let updated = diesel::update(restaurants.filter(restaurant_id.eq(search_restaurant_id)))
            .set(&changes)
            .returning(Restaurant::as_returning())
            .get_result(conn.connection())
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFound {
                    kind: "restaurant",
                    id: search_restaurant_id,
                },
                Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    RepositoryError::Conflict {
                        field: "phone",
                        value: changes.phone.clone().unwrap_or_default(),
                    }
                }
                other => {
                    error!(
                        "update_restaurant: error updating restaurant {}: {}",
                        search_restaurant_id, other
                    );
                    RepositoryError::DatabaseError(other)
                }
            })?;

        self.cache.invalidate_prefix("restaurants:");
        Ok(updated)
    }

    pub fn set_active(
        &self,
        search_restaurant_id: i32,
        active: bool,
    ) -> Result<(), RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "set_active: failed to acquire DB connection for restaurant_id {}: {}",
                search_restaurant_id, e
            );
            e
        })?;

        let updated = diesel::update(restaurants.filter(restaurant_id.eq(search_restaurant_id)))
            .set(is_active.eq(active))
            .execute(conn.connection())
            .map_err(|e| {
                error!(
                    "set_active: error updating restaurant {}: {}",
                    search_restaurant_id, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        if updated == 0 {
            return Err(RepositoryError::NotFound {
                kind: "restaurant",
                id: search_restaurant_id,
            });
        }
        self.cache.invalidate_prefix("restaurants:");
        debug!(
            "set_active: restaurant {} active={}",
            search_restaurant_id, active
        );
        Ok(())
    }

    /// Admin hard delete. Orders referencing the restaurant keep their copied
    /// fee and totals; only the catalog row goes away.
    pub fn delete_restaurant(&self, search_restaurant_id: i32) -> Result<(), RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "delete_restaurant: failed to acquire DB connection for restaurant_id {}: {}",
                search_restaurant_id, e
            );
            e
        })?;

        let deleted = diesel::delete(restaurants.filter(restaurant_id.eq(search_restaurant_id)))
            .execute(conn.connection())
            .map_err(|e| {
                error!(
                    "delete_restaurant: error deleting restaurant {}: {}",
                    search_restaurant_id, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound {
                kind: "restaurant",
                id: search_restaurant_id,
            });
        }
        self.cache.invalidate_prefix("restaurants:");
        Ok(())
    }

    pub fn list_active(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        if let Some(cached) = self.cache.get("restaurants:active") {
            if let Ok(list) = serde_json::from_value::<Vec<Restaurant>>(cached) {
                return Ok(list);
            }
        }

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("list_active: failed to acquire DB connection: {}", e);
            e
        })?;

        let list = restaurants
            .filter(is_active.eq(true))
            .order_by(name.asc())
            .select(Restaurant::as_select())
            .load::<Restaurant>(conn.connection())
            .map_err(|e| {
                error!("list_active: error fetching restaurants: {}", e);
                RepositoryError::DatabaseError(e)
            })?;

        if let Ok(value) = serde_json::to_value(&list) {
            self.cache.put("restaurants:active", value);
        }
        Ok(list)
    }

    /// Paginated listing with optional category/active filters. `page` is
    /// zero-based; page size is clamped to [1, 100]. Not cached, the filter
    /// and page combinations fragment too much to be worth invalidating.
    pub fn list_restaurants(
        &self,
        filter: RestaurantListFilter,
        page: i64,
        page_size: i64,
    ) -> Result<PagedRestaurants, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("list_restaurants: failed to acquire DB connection: {}", e);
            e
        })?;

        let page = page.max(0);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let total_elements: i64 =
            apply_restaurant_filters(restaurants.into_boxed(), &filter)
                .count()
                .get_result(conn.connection())
                .map_err(|e| {
                    error!("list_restaurants: error counting restaurants: {}", e);
                    RepositoryError::DatabaseError(e)
                })?;

        let items = apply_restaurant_filters(restaurants.into_boxed(), &filter)
            .order_by(name.asc())
            .offset(page * page_size)
            .limit(page_size)
            .select(Restaurant::as_select())
            .load::<Restaurant>(conn.connection())
            .map_err(|e| {
                error!("list_restaurants: error fetching restaurants: {}", e);
                RepositoryError::DatabaseError(e)
            })?;

        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + page_size - 1) / page_size
        };

        Ok(PagedRestaurants {
            items,
            page_number: page,
            page_size,
            total_elements,
            total_pages,
        })
    }

    /// Category browse: only active restaurants show up.
    pub fn list_by_category(
        &self,
        search_category: &str,
    ) -> Result<Vec<Restaurant>, RepositoryError> {
        let cache_key = format!("restaurants:category:{search_category}");
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok(list) = serde_json::from_value::<Vec<Restaurant>>(cached) {
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

        let list = restaurants
            .filter(category.eq(search_category))
            .filter(is_active.eq(true))
            .order_by(name.asc())
            .select(Restaurant::as_select())
            .load::<Restaurant>(conn.connection())
            .map_err(|e| {
                error!(
                    "list_by_category: error fetching restaurants for category '{}': {}",
                    search_category, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        if let Ok(value) = serde_json::to_value(&list) {
            self.cache.put(&cache_key, value);
        }
        Ok(list)
    }

    /// Fail-closed ownership check against the principal's restaurant claim.
    pub fn is_owner(&self, search_restaurant_id: i32, principal: &Principal) -> bool {
        principal.restaurant_id() == Some(search_restaurant_id)
    }
}

type BoxedRestaurantQuery<'a> =
    crate::db::schema::restaurants::BoxedQuery<'a, diesel::pg::Pg>;

fn apply_restaurant_filters<'a>(
    mut query: BoxedRestaurantQuery<'a>,
    filter: &RestaurantListFilter,
) -> BoxedRestaurantQuery<'a> {
    if let Some(category_val) = &filter.category {
        query = query.filter(category.eq(category_val.clone()));
    }
    if let Some(active_val) = filter.active {
        query = query.filter(is_active.eq(active_val));
    }
    query
}

fn validate_delivery_fee(fee: &BigDecimal) -> Result<(), RepositoryError> {
    if fee < &BigDecimal::from(0) {
        return Err(RepositoryError::BusinessRule(
            "delivery fee must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_delivery_time(minutes: i32) -> Result<(), RepositoryError> {
    if !(1..=240).contains(&minutes) {
        return Err(RepositoryError::BusinessRule(
            "estimated delivery time must be between 1 and 240 minutes".to_string(),
        ));
    }
    Ok(())
}

fn validate_opening_hours(hours: &str) -> Result<(), RepositoryError> {
    if !is_valid_opening_hours(hours) {
        return Err(RepositoryError::BusinessRule(
            "opening hours must be HH:MM-HH:MM with start before end".to_string(),
        ));
    }
    Ok(())
}

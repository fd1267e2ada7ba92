#[macro_use]
extern crate log;

pub mod api;
pub mod auth;
pub mod cache;
pub mod db;
pub mod enums;
pub mod models;
pub mod pricing;
pub mod test_utils;
pub mod validation;

use crate::cache::ResponseCache;
use crate::db::{
    establish_connection_pool, run_db_migrations, CustomerOperations, OrderOperations,
    ProductOperations, RestaurantOperations,
};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;

#[derive(Clone)]
pub struct AppState {
    pub customer_ops: CustomerOperations,
    pub restaurant_ops: RestaurantOperations,
    pub product_ops: ProductOperations,
    pub order_ops: OrderOperations,
}

impl AppState {
    pub fn new(url: &str) -> Self {
        let db = establish_connection_pool(url);
        run_db_migrations(db.clone()).expect("Unable to run migrations");

        let cache_ttl_secs: u64 = std::env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Self::from_pool(db, cache_ttl_secs)
    }

    pub fn from_pool(db: Pool<ConnectionManager<PgConnection>>, cache_ttl_secs: u64) -> Self {
        let cache = ResponseCache::new(cache_ttl_secs);

        let customer_ops = CustomerOperations::new(db.clone(), cache.clone());
        let restaurant_ops = RestaurantOperations::new(db.clone(), cache.clone());
        let product_ops = ProductOperations::new(db.clone(), cache.clone());
        let order_ops = OrderOperations::new(db, cache);

        AppState {
            customer_ops,
            restaurant_ops,
            product_ops,
            order_ops,
        }
    }
}

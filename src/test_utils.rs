use crate::db::{establish_connection_pool, run_db_migrations, DbConnection, RepositoryError};
use crate::models::customer::NewCustomer;
use crate::models::product::NewProduct;
use crate::models::restaurant::NewRestaurant;
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use std::str::FromStr;
use std::sync::Once;

// Fixture strategy:
// - Seed one active customer, one active restaurant, two available products.
// - Money values are seeded from string literals so assertions can compare
//   exact decimals.
const TEST_JWT_SECRET: &str = "test-jwt-secret";
static TEST_THREADS_GUARD: Once = Once::new();

fn ensure_single_threaded_tests() {
    TEST_THREADS_GUARD.call_once(|| {
        let threads = test_threads_from_args().or_else(|| std::env::var("RUST_TEST_THREADS").ok());
        if threads.as_deref() != Some("1") {
            panic!(
                "Tests must run with --test-threads=1 or RUST_TEST_THREADS=1 because init_test_env mutates environment variables."
            );
        }
    });
}

fn test_threads_from_args() -> Option<String> {
    let mut args = std::env::args();
    while let Some(arg) = args.next() {
        if arg == "--test-threads" {
            return args.next();
        }
        if let Some(value) = arg.strip_prefix("--test-threads=") {
            return Some(value.to_string());
        }
    }
    None
}

fn set_env_if_unset(key: &str, value: &str) {
    if std::env::var_os(key).is_none() {
        std::env::set_var(key, value);
    }
}

pub fn init_test_env() {
    ensure_single_threaded_tests();
    set_env_if_unset("JWT_SECRET", TEST_JWT_SECRET);
}

pub fn build_test_pool(database_url: &str) -> Pool<ConnectionManager<PgConnection>> {
    let pool = establish_connection_pool(database_url);
    run_db_migrations(pool.clone()).expect("Unable to run migrations");
    pool
}

pub fn reset_db(pool: &Pool<ConnectionManager<PgConnection>>) -> Result<(), RepositoryError> {
    let mut conn = DbConnection::new(pool)?;
    diesel::sql_query(
        "TRUNCATE TABLE order_items, orders, products, restaurants, customers \
         RESTART IDENTITY CASCADE",
    )
    .execute(conn.connection())
    .map_err(RepositoryError::DatabaseError)?;
    Ok(())
}

/// Parse a decimal literal. Test fixtures only, panics on bad input.
pub fn money(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).expect("valid decimal literal")
}

pub struct TestFixtures {
    pub customer_id: i32,
    pub restaurant_id: i32,
    pub product_ids: Vec<i32>,
}

pub fn seed_basic_fixtures(
    pool: &Pool<ConnectionManager<PgConnection>>,
) -> Result<TestFixtures, RepositoryError> {
    let mut conn = DbConnection::new(pool)?;

    let customer_id = insert_customer(
        conn.connection(),
        "Ana Souza",
        "ana@example.com",
        "11999990001",
        "Rua das Flores 100",
        true,
    )?;
    let restaurant_id = insert_restaurant(
        conn.connection(),
        "Bella Pasta",
        "Italian",
        "11999990002",
        "5.00",
        45,
        "08:00-22:00",
        true,
    )?;
    let pizza_id = insert_product(
        conn.connection(),
        restaurant_id,
        "Margherita Pizza",
        "25.00",
        "Pizza",
        true,
    )?;
    let bread_id = insert_product(
        conn.connection(),
        restaurant_id,
        "Garlic Bread",
        "12.50",
        "Starter",
        true,
    )?;

    Ok(TestFixtures {
        customer_id,
        restaurant_id,
        product_ids: vec![pizza_id, bread_id],
    })
}

pub fn insert_customer(
    conn: &mut PgConnection,
    name_val: &str,
    email_val: &str,
    phone_val: &str,
    address_val: &str,
    active_val: bool,
) -> Result<i32, RepositoryError> {
    use crate::db::schema::customers::dsl::*;

    let new_customer = NewCustomer {
        name: name_val.to_string(),
        email: email_val.to_string(),
        phone: phone_val.to_string(),
        address: address_val.to_string(),
    };

    let id = diesel::insert_into(customers)
        .values(&new_customer)
        .returning(customer_id)
        .get_result(conn)
        .map_err(RepositoryError::DatabaseError)?;

    if !active_val {
        diesel::update(customers.filter(customer_id.eq(id)))
            .set(is_active.eq(false))
            .execute(conn)
            .map_err(RepositoryError::DatabaseError)?;
    }
    Ok(id)
}

#[allow(clippy::too_many_arguments)]
pub fn insert_restaurant(
    conn: &mut PgConnection,
    name_val: &str,
    category_val: &str,
    phone_val: &str,
    delivery_fee_val: &str,
    delivery_time_val: i32,
    opening_hours_val: &str,
    active_val: bool,
) -> Result<i32, RepositoryError> {
    use crate::db::schema::restaurants::dsl::*;

    let new_restaurant = NewRestaurant {
        name: name_val.to_string(),
        category: category_val.to_string(),
        address: "Av. Central 200".to_string(),
        phone: phone_val.to_string(),
        delivery_fee: money(delivery_fee_val),
        delivery_time_minutes: delivery_time_val,
        opening_hours: opening_hours_val.to_string(),
    };

    let id = diesel::insert_into(restaurants)
        .values(&new_restaurant)
        .returning(restaurant_id)
        .get_result(conn)
        .map_err(RepositoryError::DatabaseError)?;

    if !active_val {
        diesel::update(restaurants.filter(restaurant_id.eq(id)))
            .set(is_active.eq(false))
            .execute(conn)
            .map_err(RepositoryError::DatabaseError)?;
    }
    Ok(id)
}

pub fn insert_product(
    conn: &mut PgConnection,
    restaurant_id_val: i32,
    name_val: &str,
    price_val: &str,
    category_val: &str,
    available_val: bool,
) -> Result<i32, RepositoryError> {
    use crate::db::schema::products::dsl::*;

    let new_product = NewProduct {
        restaurant_id: restaurant_id_val,
        name: name_val.to_string(),
        description: None,
        price: money(price_val),
        category: category_val.to_string(),
    };

    let id = diesel::insert_into(products)
        .values(&new_product)
        .returning(product_id)
        .get_result(conn)
        .map_err(RepositoryError::DatabaseError)?;

    if !available_val {
        diesel::update(products.filter(product_id.eq(id)))
            .set(is_available.eq(false))
            .execute(conn)
            .map_err(RepositoryError::DatabaseError)?;
    }
    Ok(id)
}

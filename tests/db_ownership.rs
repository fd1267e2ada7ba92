mod common;

use deliverytech::auth::Principal;
use deliverytech::cache::ResponseCache;
use deliverytech::db::{DbConnection, OrderOperations, ProductOperations};
use deliverytech::enums::orders::{OrderItemRequest, OrderRequest};
use deliverytech::models::order::PaymentMethod;
use deliverytech::test_utils::{insert_customer, insert_restaurant, TestFixtures};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;

fn order_ops(pool: &Pool<ConnectionManager<PgConnection>>) -> OrderOperations {
    OrderOperations::new(pool.clone(), ResponseCache::new(30))
}

fn place_order(ops: &OrderOperations, fixtures: &TestFixtures) -> i32 {
    ops.create_order(OrderRequest {
        customer_id: fixtures.customer_id,
        restaurant_id: fixtures.restaurant_id,
        delivery_address: "Rua das Flores 100".to_string(),
        postal_code: "01310-100".to_string(),
        payment_method: PaymentMethod::Cash,
        notes: None,
        items: vec![OrderItemRequest {
            product_id: fixtures.product_ids[0],
            quantity: 1,
            notes: None,
        }],
    })
    .expect("create order")
    .order_id
}

#[actix_rt::test]
async fn client_ownership_matches_order_customer() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let mut conn = DbConnection::new(&pool).expect("db connection");
    let stranger = insert_customer(
        conn.connection(),
        "Davi Rocha",
        "davi@example.com",
        "11999990007",
        "Rua D 40",
        true,
    )
    .expect("insert customer");
    drop(conn);

    let ops = order_ops(&pool);
    let order_id = place_order(&ops, &fixtures);

    let owner = Principal::Client {
        customer_id: fixtures.customer_id,
    };
    let other = Principal::Client {
        customer_id: stranger,
    };

    assert!(ops.is_client_owner(order_id, &owner));
    assert!(!ops.is_client_owner(order_id, &other));
    assert!(ops.can_access(order_id, &owner));
    assert!(!ops.can_access(order_id, &other));
}

#[actix_rt::test]
async fn restaurant_ownership_matches_order_restaurant() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let mut conn = DbConnection::new(&pool).expect("db connection");
    let rival = insert_restaurant(
        conn.connection(),
        "Rival Grill",
        "Steakhouse",
        "11999990008",
        "9.00",
        60,
        "12:00-23:00",
        true,
    )
    .expect("insert restaurant");
    drop(conn);

    let ops = order_ops(&pool);
    let order_id = place_order(&ops, &fixtures);

    let owner = Principal::Restaurant {
        restaurant_id: fixtures.restaurant_id,
    };
    let other = Principal::Restaurant {
        restaurant_id: rival,
    };

    assert!(ops.is_restaurant_owner(order_id, &owner));
    assert!(!ops.is_restaurant_owner(order_id, &other));
    assert!(ops.can_access(order_id, &owner));
    assert!(!ops.can_access(order_id, &other));
}

#[actix_rt::test]
async fn ownership_fails_closed_on_missing_order_and_wrong_role() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let ops = order_ops(&pool);
    let order_id = place_order(&ops, &fixtures);

    let client = Principal::Client {
        customer_id: fixtures.customer_id,
    };
    let restaurant = Principal::Restaurant {
        restaurant_id: fixtures.restaurant_id,
    };

    // Missing order: deny, never error.
    assert!(!ops.is_client_owner(9999, &client));
    assert!(!ops.is_restaurant_owner(9999, &restaurant));
    assert!(!ops.can_access(9999, &client));

    // A principal without the matching claim is denied outright.
    assert!(!ops.is_client_owner(order_id, &restaurant));
    assert!(!ops.is_restaurant_owner(order_id, &client));
    assert!(!ops.is_client_owner(order_id, &Principal::Admin));
    assert!(!ops.is_restaurant_owner(order_id, &Principal::Admin));
}

#[actix_rt::test]
async fn product_ownership_follows_owning_restaurant() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let product_ops = ProductOperations::new(pool.clone(), ResponseCache::new(30));

    let owner = Principal::Restaurant {
        restaurant_id: fixtures.restaurant_id,
    };
    let other = Principal::Restaurant {
        restaurant_id: fixtures.restaurant_id + 100,
    };

    assert!(product_ops.is_owner(fixtures.product_ids[0], &owner));
    assert!(!product_ops.is_owner(fixtures.product_ids[0], &other));
    assert!(!product_ops.is_owner(9999, &owner));
    assert!(!product_ops.is_owner(fixtures.product_ids[0], &Principal::Admin));
}

mod common;

use deliverytech::cache::ResponseCache;
use deliverytech::db::restaurants::RestaurantListFilter;
use deliverytech::db::{
    CustomerOperations, ProductOperations, RepositoryError, RestaurantOperations,
};
use deliverytech::models::customer::{NewCustomer, UpdateCustomer};
use deliverytech::models::product::{NewProduct, UpdateProduct};
use deliverytech::models::restaurant::{NewRestaurant, UpdateRestaurant};
use deliverytech::test_utils::money;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;

fn customer_ops(pool: &Pool<ConnectionManager<PgConnection>>) -> CustomerOperations {
    CustomerOperations::new(pool.clone(), ResponseCache::new(30))
}

fn restaurant_ops(pool: &Pool<ConnectionManager<PgConnection>>) -> RestaurantOperations {
    RestaurantOperations::new(pool.clone(), ResponseCache::new(30))
}

fn product_ops(pool: &Pool<ConnectionManager<PgConnection>>) -> ProductOperations {
    ProductOperations::new(pool.clone(), ResponseCache::new(30))
}

fn new_customer(email: &str) -> NewCustomer {
    NewCustomer {
        name: "Eva Martins".to_string(),
        email: email.to_string(),
        phone: "11999990010".to_string(),
        address: "Rua E 50".to_string(),
    }
}

fn new_restaurant(phone: &str) -> NewRestaurant {
    NewRestaurant {
        name: "Taco Corner".to_string(),
        category: "Mexican".to_string(),
        address: "Av. Norte 10".to_string(),
        phone: phone.to_string(),
        delivery_fee: money("6.00"),
        delivery_time_minutes: 35,
        opening_hours: "09:00-21:00".to_string(),
    }
}

#[actix_rt::test]
async fn duplicate_customer_email_is_a_conflict() {
    let pool = common::setup_pool();
    let ops = customer_ops(&pool);

    ops.create_customer(new_customer("eva@example.com"))
        .expect("first create");
    let err = ops
        .create_customer(new_customer("eva@example.com"))
        .expect_err("duplicate email");
    assert!(matches!(err, RepositoryError::Conflict { field: "email", .. }));
}

#[actix_rt::test]
async fn deactivated_customer_disappears_from_active_listing() {
    let pool = common::setup_pool();
    let ops = customer_ops(&pool);

    let kept = ops
        .create_customer(new_customer("kept@example.com"))
        .expect("create");
    let dropped = ops
        .create_customer(new_customer("dropped@example.com"))
        .expect("create");

    ops.set_active(dropped.customer_id, false).expect("deactivate");

    let active = ops.list_active().expect("list");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].customer_id, kept.customer_id);

    // The row survives the soft delete.
    let reloaded = ops.get_customer(dropped.customer_id).expect("get");
    assert!(!reloaded.is_active);
}

#[actix_rt::test]
async fn customer_update_changes_profile_fields() {
    let pool = common::setup_pool();
    let ops = customer_ops(&pool);

    let created = ops
        .create_customer(new_customer("move@example.com"))
        .expect("create");
    let updated = ops
        .update_customer(
            created.customer_id,
            UpdateCustomer {
                name: None,
                phone: Some("11888880000".to_string()),
                address: Some("Rua Nova 1".to_string()),
            },
        )
        .expect("update");

    assert_eq!(updated.phone, "11888880000");
    assert_eq!(updated.address, "Rua Nova 1");
    assert_eq!(updated.email, "move@example.com");
}

#[actix_rt::test]
async fn duplicate_restaurant_phone_is_a_conflict() {
    let pool = common::setup_pool();
    let ops = restaurant_ops(&pool);

    ops.create_restaurant(new_restaurant("11999990020"))
        .expect("first create");
    let err = ops
        .create_restaurant(new_restaurant("11999990020"))
        .expect_err("duplicate phone");
    assert!(matches!(err, RepositoryError::Conflict { field: "phone", .. }));
}

#[actix_rt::test]
async fn restaurant_validation_rejects_bad_inputs() {
    let pool = common::setup_pool();
    let ops = restaurant_ops(&pool);

    let mut negative_fee = new_restaurant("11999990021");
    negative_fee.delivery_fee = money("-1.00");
    assert!(matches!(
        ops.create_restaurant(negative_fee),
        Err(RepositoryError::BusinessRule(_))
    ));

    let mut slow = new_restaurant("11999990022");
    slow.delivery_time_minutes = 300;
    assert!(matches!(
        ops.create_restaurant(slow),
        Err(RepositoryError::BusinessRule(_))
    ));

    for hours in ["25:00-26:00", "22:00-08:00", "8-22", "nonsense"] {
        let mut bad_hours = new_restaurant("11999990023");
        bad_hours.opening_hours = hours.to_string();
        assert!(
            matches!(
                ops.create_restaurant(bad_hours),
                Err(RepositoryError::BusinessRule(_))
            ),
            "hours {hours:?} should be rejected"
        );
    }
}

#[actix_rt::test]
async fn restaurant_update_revalidates_changed_fields() {
    let pool = common::setup_pool();
    let ops = restaurant_ops(&pool);

    let created = ops
        .create_restaurant(new_restaurant("11999990024"))
        .expect("create");

    let err = ops
        .update_restaurant(
            created.restaurant_id,
            UpdateRestaurant {
                name: None,
                category: None,
                address: None,
                phone: None,
                delivery_fee: Some(money("-2.00")),
                delivery_time_minutes: None,
                opening_hours: None,
            },
        )
        .expect_err("negative fee");
    assert!(matches!(err, RepositoryError::BusinessRule(_)));

    let updated = ops
        .update_restaurant(
            created.restaurant_id,
            UpdateRestaurant {
                name: Some("Taco Palace".to_string()),
                category: None,
                address: None,
                phone: None,
                delivery_fee: Some(money("8.00")),
                delivery_time_minutes: None,
                opening_hours: None,
            },
        )
        .expect("update");
    assert_eq!(updated.name, "Taco Palace");
    assert_eq!(updated.delivery_fee, money("8.00"));
}

#[actix_rt::test]
async fn inactive_restaurants_are_hidden_from_listing() {
    let pool = common::setup_pool();
    let ops = restaurant_ops(&pool);

    let open = ops
        .create_restaurant(new_restaurant("11999990025"))
        .expect("create");
    let closed = ops
        .create_restaurant(new_restaurant("11999990026"))
        .expect("create");
    ops.set_active(closed.restaurant_id, false).expect("deactivate");

    let active = ops.list_active().expect("list");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].restaurant_id, open.restaurant_id);

    // Reactivation brings it back.
    ops.set_active(closed.restaurant_id, true).expect("reactivate");
    assert_eq!(ops.list_active().expect("list").len(), 2);
}

#[actix_rt::test]
async fn product_price_must_be_positive() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let ops = product_ops(&pool);

    for price in ["0.00", "-5.00"] {
        let err = ops
            .create_product(NewProduct {
                restaurant_id: fixtures.restaurant_id,
                name: "Free Lunch".to_string(),
                description: None,
                price: money(price),
                category: "Special".to_string(),
            })
            .expect_err("non-positive price");
        assert!(matches!(err, RepositoryError::BusinessRule(_)));
    }

    let err = ops
        .update_product(
            fixtures.product_ids[0],
            UpdateProduct {
                name: None,
                description: None,
                price: Some(money("0.00")),
                category: None,
            },
        )
        .expect_err("non-positive price on update");
    assert!(matches!(err, RepositoryError::BusinessRule(_)));
}

#[actix_rt::test]
async fn product_availability_toggle_and_menu_listing() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let ops = product_ops(&pool);

    let menu = ops
        .list_by_restaurant(fixtures.restaurant_id)
        .expect("menu");
    assert_eq!(menu.len(), 2);

    ops.set_availability(fixtures.product_ids[0], false)
        .expect("toggle off");
    let reloaded = ops.get_product(fixtures.product_ids[0]).expect("get");
    assert!(!reloaded.is_available);

    // Unavailable products stay on the menu listing.
    let menu = ops
        .list_by_restaurant(fixtures.restaurant_id)
        .expect("menu");
    assert_eq!(menu.len(), 2);

    let err = ops.set_availability(9999, true).expect_err("missing product");
    assert!(matches!(
        err,
        RepositoryError::NotFound { kind: "product", .. }
    ));
}

#[actix_rt::test]
async fn product_delete_removes_the_row() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let ops = product_ops(&pool);

    ops.delete_product(fixtures.product_ids[1]).expect("delete");
    let err = ops
        .get_product(fixtures.product_ids[1])
        .expect_err("deleted product");
    assert!(matches!(
        err,
        RepositoryError::NotFound { kind: "product", .. }
    ));

    let menu = ops
        .list_by_restaurant(fixtures.restaurant_id)
        .expect("menu");
    assert_eq!(menu.len(), 1);
}

#[actix_rt::test]
async fn customer_lookup_by_email() {
    let pool = common::setup_pool();
    let ops = customer_ops(&pool);

    let created = ops
        .create_customer(new_customer("lookup@example.com"))
        .expect("create");
    let found = ops.get_by_email("lookup@example.com").expect("lookup");
    assert_eq!(found.customer_id, created.customer_id);

    let err = ops
        .get_by_email("ghost@example.com")
        .expect_err("unknown email");
    assert!(matches!(
        err,
        RepositoryError::NotFoundBy {
            kind: "customer",
            field: "email",
            ..
        }
    ));
}

#[actix_rt::test]
async fn product_catalog_queries_cover_category_and_name() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let ops = product_ops(&pool);

    let calzone = ops
        .create_product(NewProduct {
            restaurant_id: fixtures.restaurant_id,
            name: "Calzone Pizza".to_string(),
            description: None,
            price: money("28.00"),
            category: "Pizza".to_string(),
        })
        .expect("create");
    ops.set_availability(calzone.product_id, false)
        .expect("toggle off");

    // The full catalog keeps unavailable products.
    assert_eq!(ops.list_all().expect("list all").len(), 3);

    // Category and name browsing only surface available ones.
    let pizzas = ops.list_by_category("Pizza").expect("by category");
    assert_eq!(pizzas.len(), 1);
    assert_eq!(pizzas[0].name, "Margherita Pizza");

    let matched = ops.search_by_name("pIzZa").expect("search");
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "Margherita Pizza");

    let garlic = ops.search_by_name("garlic").expect("search");
    assert_eq!(garlic.len(), 1);
    assert_eq!(garlic[0].name, "Garlic Bread");

    assert!(ops.search_by_name("feijoada").expect("search").is_empty());
}

#[actix_rt::test]
async fn restaurant_listing_paginates_and_filters() {
    let pool = common::setup_pool();
    let ops = restaurant_ops(&pool);

    let seed = |restaurant_name: &str, restaurant_category: &str, phone: &str| {
        let mut restaurant = new_restaurant(phone);
        restaurant.name = restaurant_name.to_string();
        restaurant.category = restaurant_category.to_string();
        ops.create_restaurant(restaurant).expect("create")
    };
    seed("Asa Sushi", "Japanese", "11999990030");
    let bento = seed("Bento Box", "Japanese", "11999990031");
    seed("Casa Mia", "Italian", "11999990032");
    ops.set_active(bento.restaurant_id, false).expect("deactivate");

    let page = ops
        .list_restaurants(Default::default(), 0, 2)
        .expect("first page");
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.page_number, 0);

    let page = ops
        .list_restaurants(Default::default(), 1, 2)
        .expect("second page");
    assert_eq!(page.items.len(), 1);

    let japanese = ops
        .list_restaurants(
            RestaurantListFilter {
                category: Some("Japanese".to_string()),
                active: None,
            },
            0,
            10,
        )
        .expect("category filter");
    assert_eq!(japanese.total_elements, 2);

    let open_japanese = ops
        .list_restaurants(
            RestaurantListFilter {
                category: Some("Japanese".to_string()),
                active: Some(true),
            },
            0,
            10,
        )
        .expect("category and active filter");
    assert_eq!(open_japanese.total_elements, 1);
    assert_eq!(open_japanese.items[0].name, "Asa Sushi");

    // The category browse only shows active restaurants.
    let browsed = ops.list_by_category("Japanese").expect("by category");
    assert_eq!(browsed.len(), 1);
    assert_eq!(browsed[0].name, "Asa Sushi");
    assert!(ops.list_by_category("Thai").expect("by category").is_empty());
}

mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use common::auth_header;
use deliverytech::auth::Principal;
use serde_json::{json, Value};

fn order_body(customer_id: i32, restaurant_id: i32, product_id: i32, quantity: i32) -> Value {
    json!({
        "customer_id": customer_id,
        "restaurant_id": restaurant_id,
        "delivery_address": "Rua das Flores 100",
        "postal_code": "01310-100",
        "payment_method": "PIX",
        "notes": null,
        "items": [
            { "product_id": product_id, "quantity": quantity, "notes": null }
        ]
    })
}

#[actix_rt::test]
async fn client_creates_order_and_reads_it_back() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let client = Principal::Client {
        customer_id: fixtures.customer_id,
    };

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(auth_header(&client))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_json(order_body(
            fixtures.customer_id,
            fixtures.restaurant_id,
            fixtures.product_ids[0],
            2,
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["total_price"], "55.00");
    let order_id = body["data"]["order_id"].as_i64().expect("order id");

    let req = test::TestRequest::get()
        .uri(&format!("/orders/{order_id}"))
        .insert_header(auth_header(&client))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["order_id"].as_i64(), Some(order_id));
}

#[actix_rt::test]
async fn client_cannot_order_for_someone_else() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let impostor = Principal::Client {
        customer_id: fixtures.customer_id + 1,
    };

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(auth_header(&impostor))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_json(order_body(
            fixtures.customer_id,
            fixtures.restaurant_id,
            fixtures.product_ids[0],
            1,
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn restaurant_cannot_create_orders() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let restaurant = Principal::Restaurant {
        restaurant_id: fixtures.restaurant_id,
    };

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(auth_header(&restaurant))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_json(order_body(
            fixtures.customer_id,
            fixtures.restaurant_id,
            fixtures.product_ids[0],
            1,
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn quote_returns_totals_without_creating() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let client = Principal::Client {
        customer_id: fixtures.customer_id,
    };

    let req = test::TestRequest::post()
        .uri("/orders/quote")
        .insert_header(auth_header(&client))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_json(json!({
            "restaurant_id": fixtures.restaurant_id,
            "items": [
                { "product_id": fixtures.product_ids[0], "quantity": 1, "notes": null },
                { "product_id": fixtures.product_ids[1], "quantity": 2, "notes": null }
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["subtotal"], "50.00");
    assert_eq!(body["data"]["total"], "55.00");

    let admin = Principal::Admin;
    let req = test::TestRequest::get()
        .uri("/orders")
        .insert_header(auth_header(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total_elements"], 0);
}

#[actix_rt::test]
async fn restaurant_advances_status_and_client_cancels() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let client = Principal::Client {
        customer_id: fixtures.customer_id,
    };
    let restaurant = Principal::Restaurant {
        restaurant_id: fixtures.restaurant_id,
    };

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(auth_header(&client))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_json(order_body(
            fixtures.customer_id,
            fixtures.restaurant_id,
            fixtures.product_ids[0],
            1,
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    let order_id = body["data"]["order_id"].as_i64().expect("order id");

    let req = test::TestRequest::patch()
        .uri(&format!("/orders/{order_id}/status"))
        .insert_header(auth_header(&restaurant))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_json(json!({ "status": "CONFIRMED" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "CONFIRMED");
    assert!(body["data"]["order_number"]
        .as_str()
        .expect("order number")
        .starts_with("ORD-"));

    // Skipping PREPARING is rejected at the service level.
    let req = test::TestRequest::patch()
        .uri(&format!("/orders/{order_id}/status"))
        .insert_header(auth_header(&restaurant))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_json(json!({ "status": "OUT_FOR_DELIVERY" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Still CONFIRMED, so the owning client may cancel.
    let req = test::TestRequest::delete()
        .uri(&format!("/orders/{order_id}"))
        .insert_header(auth_header(&client))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_rt::test]
async fn client_cannot_advance_status() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let client = Principal::Client {
        customer_id: fixtures.customer_id,
    };

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(auth_header(&client))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_json(order_body(
            fixtures.customer_id,
            fixtures.restaurant_id,
            fixtures.product_ids[0],
            1,
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    let order_id = body["data"]["order_id"].as_i64().expect("order id");

    let req = test::TestRequest::patch()
        .uri(&format!("/orders/{order_id}/status"))
        .insert_header(auth_header(&client))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_json(json!({ "status": "CONFIRMED" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn foreign_restaurant_cannot_touch_the_order() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let client = Principal::Client {
        customer_id: fixtures.customer_id,
    };
    let rival = Principal::Restaurant {
        restaurant_id: fixtures.restaurant_id + 1,
    };

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(auth_header(&client))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_json(order_body(
            fixtures.customer_id,
            fixtures.restaurant_id,
            fixtures.product_ids[0],
            1,
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    let order_id = body["data"]["order_id"].as_i64().expect("order id");

    let req = test::TestRequest::get()
        .uri(&format!("/orders/{order_id}"))
        .insert_header(auth_header(&rival))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::patch()
        .uri(&format!("/orders/{order_id}/status"))
        .insert_header(auth_header(&rival))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_json(json!({ "status": "CONFIRMED" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn admin_lists_orders_with_pagination() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let client = Principal::Client {
        customer_id: fixtures.customer_id,
    };
    let admin = Principal::Admin;

    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/orders")
            .insert_header(auth_header(&client))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_json(order_body(
                fixtures.customer_id,
                fixtures.restaurant_id,
                fixtures.product_ids[0],
                1,
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/orders?page=0&page_size=2")
        .insert_header(auth_header(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total_elements"], 3);
    assert_eq!(body["data"]["total_pages"], 2);
    assert_eq!(body["data"]["items"].as_array().expect("items").len(), 2);

    // Non-admin principals are rejected.
    let req = test::TestRequest::get()
        .uri("/orders")
        .insert_header(auth_header(&client))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn order_history_is_scoped_to_its_owner() {
    let (app, fixtures, _db_url) = common::setup_api_app().await;
    let client = Principal::Client {
        customer_id: fixtures.customer_id,
    };
    let other_client = Principal::Client {
        customer_id: fixtures.customer_id + 1,
    };

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(auth_header(&client))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_json(order_body(
            fixtures.customer_id,
            fixtures.restaurant_id,
            fixtures.product_ids[0],
            1,
        ))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/orders/customer/{}", fixtures.customer_id))
        .insert_header(auth_header(&client))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().expect("orders").len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/orders/customer/{}", fixtures.customer_id))
        .insert_header(auth_header(&other_client))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/orders/restaurant/{}", fixtures.restaurant_id))
        .insert_header(auth_header(&Principal::Restaurant {
            restaurant_id: fixtures.restaurant_id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().expect("orders").len(), 1);
}

#[actix_rt::test]
async fn requests_without_a_token_are_unauthorized() {
    let (app, _fixtures, _db_url) = common::setup_api_app().await;

    let req = test::TestRequest::get().uri("/orders").to_request();
    let result = test::try_call_service(&app, req).await;
    let status = match result {
        Ok(r) => r.status(),
        Err(e) => e.as_response_error().status_code(),
    };
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Health stays open.
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn get_missing_order_as_admin_is_not_found() {
    let (app, _fixtures, _db_url) = common::setup_api_app().await;

    let req = test::TestRequest::get()
        .uri("/orders/99999")
        .insert_header(auth_header(&Principal::Admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

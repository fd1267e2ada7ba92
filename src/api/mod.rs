mod customers;
mod errors;
mod orders;
mod products;
mod restaurants;

use crate::AppState;
use actix_web::middleware::NormalizePath;
use actix_web::{get, web, HttpResponse, Responder};
pub use errors::default_error_handler;

#[get("/")]
async fn root_endpoint() -> impl Responder {
    HttpResponse::Ok().body("Server up!")
}

#[get("/health")]
async fn health_endpoint() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.service(root_endpoint)
        .service(health_endpoint)
        .service(
            web::scope("/customers")
                .wrap(NormalizePath::trim())
                .app_data(web::Data::new(state.customer_ops.clone()))
                .service(customers::create_customer)
                .service(customers::list_customers)
                .service(customers::get_customer_by_email)
                .service(customers::get_customer)
                .service(customers::update_customer)
                .service(customers::deactivate_customer),
        )
        .service(
            web::scope("/restaurants")
                .wrap(NormalizePath::trim())
                .app_data(web::Data::new(state.restaurant_ops.clone()))
                .app_data(web::Data::new(state.product_ops.clone()))
                .service(restaurants::create_restaurant)
                .service(restaurants::list_restaurants)
                .service(restaurants::list_restaurants_by_category)
                .service(restaurants::list_restaurant_products)
                .service(restaurants::set_restaurant_active)
                .service(restaurants::get_restaurant)
                .service(restaurants::update_restaurant)
                .service(restaurants::delete_restaurant),
        )
        .service(
            web::scope("/products")
                .wrap(NormalizePath::trim())
                .app_data(web::Data::new(state.product_ops.clone()))
                .service(products::create_product)
                .service(products::list_products)
                .service(products::list_products_by_category)
                .service(products::search_products)
                .service(products::set_product_availability)
                .service(products::get_product)
                .service(products::update_product)
                .service(products::delete_product),
        )
        .service(
            web::scope("/orders")
                .wrap(NormalizePath::trim())
                .app_data(web::Data::new(state.order_ops.clone()))
                .service(orders::create_order)
                .service(orders::quote_order)
                .service(orders::list_orders)
                .service(orders::list_orders_by_customer)
                .service(orders::list_orders_by_restaurant)
                .service(orders::update_order_status)
                .service(orders::get_order)
                .service(orders::cancel_order),
        );
}

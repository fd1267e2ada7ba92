use crate::api::errors::status_for;
use crate::auth::extractors::{AdminPrincipal, PrincipalExtractor};
use crate::db::orders::DEFAULT_PAGE_SIZE;
use crate::db::restaurants::RestaurantListFilter;
use crate::db::{ProductOperations, RestaurantOperations};
use crate::enums::common::AckResponse;
use crate::enums::products::ProductsResponse;
use crate::enums::restaurants::{
    ActiveRequest, ListRestaurantsQuery, PagedRestaurantsResponse, RestaurantResponse,
    RestaurantsResponse,
};
use crate::models::restaurant::{NewRestaurant, UpdateRestaurant};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};

#[utoipa::path(
    post,
    tag = "Restaurants",
    path = "/restaurants",
    request_body = NewRestaurant,
    responses(
        (status = 201, description = "Restaurant created", body = RestaurantResponse),
        (status = 400, description = "Invalid fee, delivery time or opening hours", body = RestaurantResponse),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Phone already registered", body = RestaurantResponse)
    ),
    summary = "Register a new restaurant"
)]
#[post("")]
pub(super) async fn create_restaurant(
    restaurant_ops: web::Data<RestaurantOperations>,
    _admin: AdminPrincipal,
    req_data: web::Json<NewRestaurant>,
) -> impl Responder {
    match restaurant_ops.create_restaurant(req_data.into_inner()) {
        Ok(restaurant) => HttpResponse::Created().json(RestaurantResponse {
            status: "ok".to_string(),
            data: Some(restaurant),
            error: None,
        }),
        Err(e) => {
            error!("create_restaurant: {}", e);
            HttpResponse::build(status_for(&e)).json(RestaurantResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Restaurants",
    path = "/restaurants",
    params(ListRestaurantsQuery),
    responses(
        (status = 200, description = "Paginated restaurants", body = PagedRestaurantsResponse)
    ),
    summary = "List restaurants with category/active filters"
)]
#[get("")]
pub(super) async fn list_restaurants(
    restaurant_ops: web::Data<RestaurantOperations>,
    _principal: PrincipalExtractor,
    query: web::Query<ListRestaurantsQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let filter = RestaurantListFilter {
        category: query.category,
        active: query.active,
    };
    let page = query.page.unwrap_or(0);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    match restaurant_ops.list_restaurants(filter, page, page_size) {
        Ok(paged) => HttpResponse::Ok().json(PagedRestaurantsResponse {
            status: "ok".to_string(),
            data: Some(paged),
            error: None,
        }),
        Err(e) => {
            error!("list_restaurants: {}", e);
            HttpResponse::build(status_for(&e)).json(PagedRestaurantsResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Restaurants",
    path = "/restaurants/category/{category}",
    responses(
        (status = 200, description = "Active restaurants in the category", body = RestaurantsResponse)
    ),
    summary = "List active restaurants by category"
)]
#[get("/category/{category}")]
pub(super) async fn list_restaurants_by_category(
    restaurant_ops: web::Data<RestaurantOperations>,
    _principal: PrincipalExtractor,
    path: web::Path<String>,
) -> impl Responder {
    let category = path.into_inner();
    match restaurant_ops.list_by_category(&category) {
        Ok(list) => HttpResponse::Ok().json(RestaurantsResponse {
            status: "ok".to_string(),
            data: list,
            error: None,
        }),
        Err(e) => {
            error!(
                "list_restaurants_by_category: category '{}': {}",
                category, e
            );
            HttpResponse::build(status_for(&e)).json(RestaurantsResponse {
                status: "error".to_string(),
                data: Vec::new(),
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Restaurants",
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant found", body = RestaurantResponse),
        (status = 404, description = "Restaurant not found", body = RestaurantResponse)
    ),
    summary = "Get a restaurant by id"
)]
#[get("/{id}")]
pub(super) async fn get_restaurant(
    restaurant_ops: web::Data<RestaurantOperations>,
    _principal: PrincipalExtractor,
    path: web::Path<i32>,
) -> impl Responder {
    let restaurant_id = path.into_inner();
    match restaurant_ops.get_restaurant(restaurant_id) {
        Ok(restaurant) => HttpResponse::Ok().json(RestaurantResponse {
            status: "ok".to_string(),
            data: Some(restaurant),
            error: None,
        }),
        Err(e) => {
            error!("get_restaurant: restaurant_id {}: {}", restaurant_id, e);
            HttpResponse::build(status_for(&e)).json(RestaurantResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Restaurants",
    path = "/restaurants/{id}/products",
    responses(
        (status = 200, description = "Restaurant's menu", body = ProductsResponse)
    ),
    summary = "List a restaurant's products"
)]
#[get("/{id}/products")]
pub(super) async fn list_restaurant_products(
    product_ops: web::Data<ProductOperations>,
    _principal: PrincipalExtractor,
    path: web::Path<i32>,
) -> impl Responder {
    let restaurant_id = path.into_inner();
    match product_ops.list_by_restaurant(restaurant_id) {
        Ok(list) => HttpResponse::Ok().json(ProductsResponse {
            status: "ok".to_string(),
            data: list,
            error: None,
        }),
        Err(e) => {
            error!(
                "list_restaurant_products: restaurant_id {}: {}",
                restaurant_id, e
            );
            HttpResponse::build(status_for(&e)).json(ProductsResponse {
                status: "error".to_string(),
                data: Vec::new(),
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    put,
    tag = "Restaurants",
    path = "/restaurants/{id}",
    request_body = UpdateRestaurant,
    responses(
        (status = 200, description = "Restaurant updated", body = RestaurantResponse),
        (status = 400, description = "Invalid fee, delivery time or opening hours", body = RestaurantResponse),
        (status = 403, description = "Not the restaurant's account"),
        (status = 404, description = "Restaurant not found", body = RestaurantResponse)
    ),
    summary = "Update a restaurant (admin or same restaurant)"
)]
#[put("/{id}")]
pub(super) async fn update_restaurant(
    restaurant_ops: web::Data<RestaurantOperations>,
    principal: PrincipalExtractor,
    path: web::Path<i32>,
    req_data: web::Json<UpdateRestaurant>,
) -> impl Responder {
    let restaurant_id = path.into_inner();
    let principal = principal.0;
    if !principal.is_admin() && !restaurant_ops.is_owner(restaurant_id, &principal) {
        return HttpResponse::Forbidden().json(AckResponse::error("access denied".to_string()));
    }

    match restaurant_ops.update_restaurant(restaurant_id, req_data.into_inner()) {
        Ok(restaurant) => HttpResponse::Ok().json(RestaurantResponse {
            status: "ok".to_string(),
            data: Some(restaurant),
            error: None,
        }),
        Err(e) => {
            error!("update_restaurant: restaurant_id {}: {}", restaurant_id, e);
            HttpResponse::build(status_for(&e)).json(RestaurantResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    patch,
    tag = "Restaurants",
    path = "/restaurants/{id}/active",
    request_body = ActiveRequest,
    responses(
        (status = 200, description = "Active flag updated", body = AckResponse),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Restaurant not found", body = AckResponse)
    ),
    summary = "Activate or deactivate a restaurant"
)]
#[patch("/{id}/active")]
pub(super) async fn set_restaurant_active(
    restaurant_ops: web::Data<RestaurantOperations>,
    _admin: AdminPrincipal,
    path: web::Path<i32>,
    req_data: web::Json<ActiveRequest>,
) -> impl Responder {
    let restaurant_id = path.into_inner();
    match restaurant_ops.set_active(restaurant_id, req_data.is_active) {
        Ok(()) => HttpResponse::Ok().json(AckResponse::ok()),
        Err(e) => {
            error!("set_restaurant_active: restaurant_id {}: {}", restaurant_id, e);
            HttpResponse::build(status_for(&e)).json(AckResponse::error(e.to_string()))
        }
    }
}

#[utoipa::path(
    delete,
    tag = "Restaurants",
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Restaurant not found", body = AckResponse)
    ),
    summary = "Delete a restaurant"
)]
#[delete("/{id}")]
pub(super) async fn delete_restaurant(
    restaurant_ops: web::Data<RestaurantOperations>,
    _admin: AdminPrincipal,
    path: web::Path<i32>,
) -> impl Responder {
    let restaurant_id = path.into_inner();
    match restaurant_ops.delete_restaurant(restaurant_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => {
            error!("delete_restaurant: restaurant_id {}: {}", restaurant_id, e);
            HttpResponse::build(status_for(&e)).json(AckResponse::error(e.to_string()))
        }
    }
}

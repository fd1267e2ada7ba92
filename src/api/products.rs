use crate::api::errors::status_for;
use crate::auth::extractors::PrincipalExtractor;
use crate::db::ProductOperations;
use crate::enums::common::AckResponse;
use crate::enums::products::{
    AvailabilityRequest, ProductResponse, ProductSearchQuery, ProductsResponse,
};
use crate::models::product::{NewProduct, UpdateProduct};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};

#[utoipa::path(
    post,
    tag = "Products",
    path = "/products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid price", body = ProductResponse),
        (status = 403, description = "Not the target restaurant's account")
    ),
    summary = "Add a product to a restaurant's menu (admin or same restaurant)"
)]
#[post("")]
pub(super) async fn create_product(
    product_ops: web::Data<ProductOperations>,
    principal: PrincipalExtractor,
    req_data: web::Json<NewProduct>,
) -> impl Responder {
    let req = req_data.into_inner();
    let principal = principal.0;
    if !principal.is_admin() && principal.restaurant_id() != Some(req.restaurant_id) {
        return HttpResponse::Forbidden().json(AckResponse::error("access denied".to_string()));
    }

    match product_ops.create_product(req) {
        Ok(product) => HttpResponse::Created().json(ProductResponse {
            status: "ok".to_string(),
            data: Some(product),
            error: None,
        }),
        Err(e) => {
            error!("create_product: {}", e);
            HttpResponse::build(status_for(&e)).json(ProductResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Products",
    path = "/products",
    responses(
        (status = 200, description = "Full product catalog", body = ProductsResponse)
    ),
    summary = "List every product"
)]
#[get("")]
pub(super) async fn list_products(
    product_ops: web::Data<ProductOperations>,
    _principal: PrincipalExtractor,
) -> impl Responder {
    match product_ops.list_all() {
        Ok(list) => HttpResponse::Ok().json(ProductsResponse {
            status: "ok".to_string(),
            data: list,
            error: None,
        }),
        Err(e) => {
            error!("list_products: {}", e);
            HttpResponse::build(status_for(&e)).json(ProductsResponse {
                status: "error".to_string(),
                data: Vec::new(),
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Products",
    path = "/products/category/{category}",
    responses(
        (status = 200, description = "Available products in the category", body = ProductsResponse)
    ),
    summary = "List available products by category"
)]
#[get("/category/{category}")]
pub(super) async fn list_products_by_category(
    product_ops: web::Data<ProductOperations>,
    _principal: PrincipalExtractor,
    path: web::Path<String>,
) -> impl Responder {
    let category = path.into_inner();
    match product_ops.list_by_category(&category) {
        Ok(list) => HttpResponse::Ok().json(ProductsResponse {
            status: "ok".to_string(),
            data: list,
            error: None,
        }),
        Err(e) => {
            error!("list_products_by_category: category '{}': {}", category, e);
            HttpResponse::build(status_for(&e)).json(ProductsResponse {
                status: "error".to_string(),
                data: Vec::new(),
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Products",
    path = "/products/search",
    params(ProductSearchQuery),
    responses(
        (status = 200, description = "Available products matching the name", body = ProductsResponse)
    ),
    summary = "Search available products by name"
)]
#[get("/search")]
pub(super) async fn search_products(
    product_ops: web::Data<ProductOperations>,
    _principal: PrincipalExtractor,
    query: web::Query<ProductSearchQuery>,
) -> impl Responder {
    match product_ops.search_by_name(&query.name) {
        Ok(list) => HttpResponse::Ok().json(ProductsResponse {
            status: "ok".to_string(),
            data: list,
            error: None,
        }),
        Err(e) => {
            error!("search_products: term '{}': {}", query.name, e);
            HttpResponse::build(status_for(&e)).json(ProductsResponse {
                status: "error".to_string(),
                data: Vec::new(),
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Products",
    path = "/products/{id}",
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found", body = ProductResponse)
    ),
    summary = "Get a product by id"
)]
#[get("/{id}")]
pub(super) async fn get_product(
    product_ops: web::Data<ProductOperations>,
    _principal: PrincipalExtractor,
    path: web::Path<i32>,
) -> impl Responder {
    let product_id = path.into_inner();
    match product_ops.get_product(product_id) {
        Ok(product) => HttpResponse::Ok().json(ProductResponse {
            status: "ok".to_string(),
            data: Some(product),
            error: None,
        }),
        Err(e) => {
            error!("get_product: product_id {}: {}", product_id, e);
            HttpResponse::build(status_for(&e)).json(ProductResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    put,
    tag = "Products",
    path = "/products/{id}",
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid price", body = ProductResponse),
        (status = 403, description = "Not the product's restaurant"),
        (status = 404, description = "Product not found", body = ProductResponse)
    ),
    summary = "Update a product (admin or owning restaurant)"
)]
#[put("/{id}")]
pub(super) async fn update_product(
    product_ops: web::Data<ProductOperations>,
    principal: PrincipalExtractor,
    path: web::Path<i32>,
    req_data: web::Json<UpdateProduct>,
) -> impl Responder {
    let product_id = path.into_inner();
    let principal = principal.0;
    if !principal.is_admin() && !product_ops.is_owner(product_id, &principal) {
        return HttpResponse::Forbidden().json(AckResponse::error("access denied".to_string()));
    }

    match product_ops.update_product(product_id, req_data.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(ProductResponse {
            status: "ok".to_string(),
            data: Some(product),
            error: None,
        }),
        Err(e) => {
            error!("update_product: product_id {}: {}", product_id, e);
            HttpResponse::build(status_for(&e)).json(ProductResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    patch,
    tag = "Products",
    path = "/products/{id}/availability",
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Availability updated", body = AckResponse),
        (status = 403, description = "Not the product's restaurant"),
        (status = 404, description = "Product not found", body = AckResponse)
    ),
    summary = "Toggle a product's availability (admin or owning restaurant)"
)]
#[patch("/{id}/availability")]
pub(super) async fn set_product_availability(
    product_ops: web::Data<ProductOperations>,
    principal: PrincipalExtractor,
    path: web::Path<i32>,
    req_data: web::Json<AvailabilityRequest>,
) -> impl Responder {
    let product_id = path.into_inner();
    let principal = principal.0;
    if !principal.is_admin() && !product_ops.is_owner(product_id, &principal) {
        return HttpResponse::Forbidden().json(AckResponse::error("access denied".to_string()));
    }

    match product_ops.set_availability(product_id, req_data.is_available) {
        Ok(()) => HttpResponse::Ok().json(AckResponse::ok()),
        Err(e) => {
            error!("set_product_availability: product_id {}: {}", product_id, e);
            HttpResponse::build(status_for(&e)).json(AckResponse::error(e.to_string()))
        }
    }
}

#[utoipa::path(
    delete,
    tag = "Products",
    path = "/products/{id}",
    responses(
        (status = 204, description = "Product deleted"),
        (status = 403, description = "Not the product's restaurant"),
        (status = 404, description = "Product not found", body = AckResponse)
    ),
    summary = "Remove a product from the menu (admin or owning restaurant)"
)]
#[delete("/{id}")]
pub(super) async fn delete_product(
    product_ops: web::Data<ProductOperations>,
    principal: PrincipalExtractor,
    path: web::Path<i32>,
) -> impl Responder {
    let product_id = path.into_inner();
    let principal = principal.0;
    if !principal.is_admin() && !product_ops.is_owner(product_id, &principal) {
        return HttpResponse::Forbidden().json(AckResponse::error("access denied".to_string()));
    }

    match product_ops.delete_product(product_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => {
            error!("delete_product: product_id {}: {}", product_id, e);
            HttpResponse::build(status_for(&e)).json(AckResponse::error(e.to_string()))
        }
    }
}

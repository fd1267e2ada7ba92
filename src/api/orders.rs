use crate::api::errors::status_for;
use crate::auth::extractors::{AdminPrincipal, ClientPrincipal, PrincipalExtractor};
use crate::db::orders::{OrderListFilter, DEFAULT_PAGE_SIZE};
use crate::db::OrderOperations;
use crate::enums::common::AckResponse;
use crate::enums::orders::{
    ListOrdersQuery, OrderRequest, OrderResponse, OrdersResponse, PagedOrdersResponse,
    QuoteRequest, QuoteResponse, RestaurantOrdersQuery, StatusUpdateRequest,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};

#[utoipa::path(
    post,
    tag = "Orders",
    path = "/orders",
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order created in PENDING status", body = OrderResponse),
        (status = 400, description = "Business rule violated", body = OrderResponse),
        (status = 403, description = "Order is not for the authenticated client"),
        (status = 404, description = "Referenced entity not found", body = OrderResponse)
    ),
    summary = "Create a new order"
)]
#[post("")]
pub(super) async fn create_order(
    order_ops: web::Data<OrderOperations>,
    client: ClientPrincipal,
    req_data: web::Json<OrderRequest>,
) -> impl Responder {
    let req = req_data.into_inner();
    if req.customer_id != client.customer_id {
        return HttpResponse::Forbidden().json(AckResponse::error(
            "order customer does not match authenticated client".to_string(),
        ));
    }

    match order_ops.create_order(req) {
        Ok(details) => {
            debug!("create_order: created order {}", details.order_id);
            HttpResponse::Created().json(OrderResponse {
                status: "ok".to_string(),
                data: Some(details),
                error: None,
            })
        }
        Err(e) => {
            error!("create_order: {}", e);
            HttpResponse::build(status_for(&e)).json(OrderResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    post,
    tag = "Orders",
    path = "/orders/quote",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Priced quote, nothing persisted", body = QuoteResponse),
        (status = 400, description = "Business rule violated", body = QuoteResponse),
        (status = 404, description = "Referenced entity not found", body = QuoteResponse)
    ),
    summary = "Price an order without creating it"
)]
#[post("/quote")]
pub(super) async fn quote_order(
    order_ops: web::Data<OrderOperations>,
    _principal: PrincipalExtractor,
    req_data: web::Json<QuoteRequest>,
) -> impl Responder {
    let req = req_data.into_inner();
    match order_ops.quote(req.restaurant_id, &req.items) {
        Ok(quote) => HttpResponse::Ok().json(QuoteResponse {
            status: "ok".to_string(),
            data: Some(quote),
            error: None,
        }),
        Err(e) => {
            error!("quote_order: {}", e);
            HttpResponse::build(status_for(&e)).json(QuoteResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Orders",
    path = "/orders",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Paginated orders with optional filters", body = PagedOrdersResponse),
        (status = 403, description = "Admin role required")
    ),
    summary = "List all orders (admin)"
)]
#[get("")]
pub(super) async fn list_orders(
    order_ops: web::Data<OrderOperations>,
    _admin: AdminPrincipal,
    query: web::Query<ListOrdersQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let filter = OrderListFilter {
        status: query.status,
        date_from: query.date_from,
        date_to: query.date_to,
    };
    let page = query.page.unwrap_or(0);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    match order_ops.list_orders(filter, page, page_size) {
        Ok(paged) => HttpResponse::Ok().json(PagedOrdersResponse {
            status: "ok".to_string(),
            data: Some(paged),
            error: None,
        }),
        Err(e) => {
            error!("list_orders: {}", e);
            HttpResponse::build(status_for(&e)).json(PagedOrdersResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Orders",
    path = "/orders/{id}",
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 403, description = "Not the order's client or restaurant"),
        (status = 404, description = "Order not found", body = OrderResponse)
    ),
    summary = "Get an order by id (admin or owner)"
)]
#[get("/{id}")]
pub(super) async fn get_order(
    order_ops: web::Data<OrderOperations>,
    principal: PrincipalExtractor,
    path: web::Path<i32>,
) -> impl Responder {
    let order_id = path.into_inner();
    let principal = principal.0;
    if !principal.is_admin() && !order_ops.can_access(order_id, &principal) {
        return HttpResponse::Forbidden().json(AckResponse::error("access denied".to_string()));
    }

    match order_ops.get_order(order_id) {
        Ok(details) => HttpResponse::Ok().json(OrderResponse {
            status: "ok".to_string(),
            data: Some(details),
            error: None,
        }),
        Err(e) => {
            error!("get_order: order_id {}: {}", order_id, e);
            HttpResponse::build(status_for(&e)).json(OrderResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    patch,
    tag = "Orders",
    path = "/orders/{id}/status",
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Illegal status transition", body = OrderResponse),
        (status = 403, description = "Not the order's restaurant"),
        (status = 404, description = "Order not found", body = OrderResponse)
    ),
    summary = "Advance an order through its lifecycle (admin or owning restaurant)"
)]
#[patch("/{id}/status")]
pub(super) async fn update_order_status(
    order_ops: web::Data<OrderOperations>,
    principal: PrincipalExtractor,
    path: web::Path<i32>,
    req_data: web::Json<StatusUpdateRequest>,
) -> impl Responder {
    let order_id = path.into_inner();
    let principal = principal.0;
    if !principal.is_admin() && !order_ops.is_restaurant_owner(order_id, &principal) {
        return HttpResponse::Forbidden().json(AckResponse::error("access denied".to_string()));
    }

    match order_ops.update_status(order_id, req_data.status) {
        Ok(details) => HttpResponse::Ok().json(OrderResponse {
            status: "ok".to_string(),
            data: Some(details),
            error: None,
        }),
        Err(e) => {
            error!("update_order_status: order_id {}: {}", order_id, e);
            HttpResponse::build(status_for(&e)).json(OrderResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    delete,
    tag = "Orders",
    path = "/orders/{id}",
    responses(
        (status = 204, description = "Order cancelled"),
        (status = 400, description = "Order is past cancellation", body = AckResponse),
        (status = 403, description = "Not the order's client"),
        (status = 404, description = "Order not found", body = AckResponse)
    ),
    summary = "Cancel an order (admin or owning client)"
)]
#[delete("/{id}")]
pub(super) async fn cancel_order(
    order_ops: web::Data<OrderOperations>,
    principal: PrincipalExtractor,
    path: web::Path<i32>,
) -> impl Responder {
    let order_id = path.into_inner();
    let principal = principal.0;
    if !principal.is_admin() && !order_ops.is_client_owner(order_id, &principal) {
        return HttpResponse::Forbidden().json(AckResponse::error("access denied".to_string()));
    }

    match order_ops.cancel_order(order_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => {
            error!("cancel_order: order_id {}: {}", order_id, e);
            HttpResponse::build(status_for(&e)).json(AckResponse::error(e.to_string()))
        }
    }
}

#[utoipa::path(
    get,
    tag = "Orders",
    path = "/orders/customer/{customer_id}",
    responses(
        (status = 200, description = "Customer's order history", body = OrdersResponse),
        (status = 403, description = "Not the requested customer")
    ),
    summary = "List a customer's orders (admin or same client)"
)]
#[get("/customer/{customer_id}")]
pub(super) async fn list_orders_by_customer(
    order_ops: web::Data<OrderOperations>,
    principal: PrincipalExtractor,
    path: web::Path<i32>,
) -> impl Responder {
    let customer_id = path.into_inner();
    let principal = principal.0;
    if !principal.is_admin() && principal.customer_id() != Some(customer_id) {
        return HttpResponse::Forbidden().json(AckResponse::error("access denied".to_string()));
    }

    match order_ops.list_by_customer(customer_id) {
        Ok(list) => HttpResponse::Ok().json(OrdersResponse {
            status: "ok".to_string(),
            data: list,
            error: None,
        }),
        Err(e) => {
            error!("list_orders_by_customer: customer_id {}: {}", customer_id, e);
            HttpResponse::build(status_for(&e)).json(OrdersResponse {
                status: "error".to_string(),
                data: Vec::new(),
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Orders",
    path = "/orders/restaurant/{restaurant_id}",
    params(RestaurantOrdersQuery),
    responses(
        (status = 200, description = "Restaurant's orders", body = OrdersResponse),
        (status = 403, description = "Not the requested restaurant")
    ),
    summary = "List a restaurant's orders (admin or same restaurant)"
)]
#[get("/restaurant/{restaurant_id}")]
pub(super) async fn list_orders_by_restaurant(
    order_ops: web::Data<OrderOperations>,
    principal: PrincipalExtractor,
    path: web::Path<i32>,
    query: web::Query<RestaurantOrdersQuery>,
) -> impl Responder {
    let restaurant_id = path.into_inner();
    let principal = principal.0;
    if !principal.is_admin() && principal.restaurant_id() != Some(restaurant_id) {
        return HttpResponse::Forbidden().json(AckResponse::error("access denied".to_string()));
    }

    match order_ops.list_by_restaurant(restaurant_id, query.status) {
        Ok(list) => HttpResponse::Ok().json(OrdersResponse {
            status: "ok".to_string(),
            data: list,
            error: None,
        }),
        Err(e) => {
            error!(
                "list_orders_by_restaurant: restaurant_id {}: {}",
                restaurant_id, e
            );
            HttpResponse::build(status_for(&e)).json(OrdersResponse {
                status: "error".to_string(),
                data: Vec::new(),
                error: Some(e.to_string()),
            })
        }
    }
}

use crate::api::errors::status_for;
use crate::auth::extractors::{AdminPrincipal, PrincipalExtractor};
use crate::db::CustomerOperations;
use crate::enums::common::AckResponse;
use crate::enums::customers::{CustomerResponse, CustomersResponse};
use crate::models::customer::{NewCustomer, UpdateCustomer};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

#[utoipa::path(
    post,
    tag = "Customers",
    path = "/customers",
    request_body = NewCustomer,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Email already registered", body = CustomerResponse)
    ),
    summary = "Register a new customer"
)]
#[post("")]
pub(super) async fn create_customer(
    customer_ops: web::Data<CustomerOperations>,
    _admin: AdminPrincipal,
    req_data: web::Json<NewCustomer>,
) -> impl Responder {
    match customer_ops.create_customer(req_data.into_inner()) {
        Ok(customer) => HttpResponse::Created().json(CustomerResponse {
            status: "ok".to_string(),
            data: Some(customer),
            error: None,
        }),
        Err(e) => {
            error!("create_customer: {}", e);
            HttpResponse::build(status_for(&e)).json(CustomerResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Customers",
    path = "/customers",
    responses(
        (status = 200, description = "Active customers", body = CustomersResponse),
        (status = 403, description = "Admin role required")
    ),
    summary = "List active customers"
)]
#[get("")]
pub(super) async fn list_customers(
    customer_ops: web::Data<CustomerOperations>,
    _admin: AdminPrincipal,
) -> impl Responder {
    match customer_ops.list_active() {
        Ok(list) => HttpResponse::Ok().json(CustomersResponse {
            status: "ok".to_string(),
            data: list,
            error: None,
        }),
        Err(e) => {
            error!("list_customers: {}", e);
            HttpResponse::build(status_for(&e)).json(CustomersResponse {
                status: "error".to_string(),
                data: Vec::new(),
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Customers",
    path = "/customers/email/{email}",
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No customer with that email", body = CustomerResponse)
    ),
    summary = "Look up a customer by email"
)]
#[get("/email/{email}")]
pub(super) async fn get_customer_by_email(
    customer_ops: web::Data<CustomerOperations>,
    _admin: AdminPrincipal,
    path: web::Path<String>,
) -> impl Responder {
    let customer_email = path.into_inner();
    match customer_ops.get_by_email(&customer_email) {
        Ok(customer) => HttpResponse::Ok().json(CustomerResponse {
            status: "ok".to_string(),
            data: Some(customer),
            error: None,
        }),
        Err(e) => {
            error!("get_customer_by_email: email '{}': {}", customer_email, e);
            HttpResponse::build(status_for(&e)).json(CustomerResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    get,
    tag = "Customers",
    path = "/customers/{id}",
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 403, description = "Not the requested customer"),
        (status = 404, description = "Customer not found", body = CustomerResponse)
    ),
    summary = "Get a customer by id (admin or same client)"
)]
#[get("/{id}")]
pub(super) async fn get_customer(
    customer_ops: web::Data<CustomerOperations>,
    principal: PrincipalExtractor,
    path: web::Path<i32>,
) -> impl Responder {
    let customer_id = path.into_inner();
    let principal = principal.0;
    if !principal.is_admin() && principal.customer_id() != Some(customer_id) {
        return HttpResponse::Forbidden().json(AckResponse::error("access denied".to_string()));
    }

    match customer_ops.get_customer(customer_id) {
        Ok(customer) => HttpResponse::Ok().json(CustomerResponse {
            status: "ok".to_string(),
            data: Some(customer),
            error: None,
        }),
        Err(e) => {
            error!("get_customer: customer_id {}: {}", customer_id, e);
            HttpResponse::build(status_for(&e)).json(CustomerResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    put,
    tag = "Customers",
    path = "/customers/{id}",
    request_body = UpdateCustomer,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 403, description = "Not the requested customer"),
        (status = 404, description = "Customer not found", body = CustomerResponse)
    ),
    summary = "Update a customer's profile (admin or same client)"
)]
#[put("/{id}")]
pub(super) async fn update_customer(
    customer_ops: web::Data<CustomerOperations>,
    principal: PrincipalExtractor,
    path: web::Path<i32>,
    req_data: web::Json<UpdateCustomer>,
) -> impl Responder {
    let customer_id = path.into_inner();
    let principal = principal.0;
    if !principal.is_admin() && principal.customer_id() != Some(customer_id) {
        return HttpResponse::Forbidden().json(AckResponse::error("access denied".to_string()));
    }

    match customer_ops.update_customer(customer_id, req_data.into_inner()) {
        Ok(customer) => HttpResponse::Ok().json(CustomerResponse {
            status: "ok".to_string(),
            data: Some(customer),
            error: None,
        }),
        Err(e) => {
            error!("update_customer: customer_id {}: {}", customer_id, e);
            HttpResponse::build(status_for(&e)).json(CustomerResponse {
                status: "error".to_string(),
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[utoipa::path(
    delete,
    tag = "Customers",
    path = "/customers/{id}",
    responses(
        (status = 204, description = "Customer deactivated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Customer not found", body = AckResponse)
    ),
    summary = "Deactivate a customer (soft delete)"
)]
#[delete("/{id}")]
pub(super) async fn deactivate_customer(
    customer_ops: web::Data<CustomerOperations>,
    _admin: AdminPrincipal,
    path: web::Path<i32>,
) -> impl Responder {
    let customer_id = path.into_inner();
    match customer_ops.set_active(customer_id, false) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => {
            error!("deactivate_customer: customer_id {}: {}", customer_id, e);
            HttpResponse::build(status_for(&e)).json(AckResponse::error(e.to_string()))
        }
    }
}

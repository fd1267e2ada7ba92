use serde::Serialize;
use utoipa::ToSchema;

use crate::models::customer::Customer;

#[derive(Serialize, ToSchema)]
pub struct CustomerResponse {
    pub status: String,
    pub data: Option<Customer>,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CustomersResponse {
    pub status: String,
    pub data: Vec<Customer>,
    pub error: Option<String>,
}

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::product::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AvailabilityRequest {
    pub is_available: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductSearchQuery {
    pub name: String,
}

#[derive(Serialize, ToSchema)]
pub struct ProductResponse {
    pub status: String,
    pub data: Option<Product>,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ProductsResponse {
    pub status: String,
    pub data: Vec<Product>,
    pub error: Option<String>,
}

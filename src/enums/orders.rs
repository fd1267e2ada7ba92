use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::order::{OrderStatus, PaymentMethod};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: i32,
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderRequest {
    pub customer_id: i32,
    pub restaurant_id: i32,
    pub delivery_address: String,
    pub postal_code: String,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteRequest {
    pub restaurant_id: i32,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuotedItem {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub unit_price: BigDecimal,
    #[schema(value_type = String)]
    pub subtotal: BigDecimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderQuote {
    pub items: Vec<QuotedItem>,
    #[schema(value_type = String)]
    pub subtotal: BigDecimal,
    #[schema(value_type = String)]
    pub delivery_fee: BigDecimal,
    #[schema(value_type = String)]
    pub total: BigDecimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemDetails {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub unit_price: BigDecimal,
    #[schema(value_type = String)]
    pub subtotal: BigDecimal,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderDetails {
    pub order_id: i32,
    pub order_number: Option<String>,
    pub customer_id: i32,
    pub restaurant_id: i32,
    pub ordered_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub delivery_address: String,
    pub postal_code: String,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    #[schema(value_type = String)]
    pub subtotal: BigDecimal,
    #[schema(value_type = String)]
    pub delivery_fee: BigDecimal,
    #[schema(value_type = String)]
    pub total_price: BigDecimal,
    pub status: OrderStatus,
    pub items: Vec<OrderItemDetails>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListOrdersQuery {
    pub status: Option<OrderStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RestaurantOrdersQuery {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PagedOrders {
    pub items: Vec<OrderDetails>,
    pub page_number: i64,
    pub page_size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

#[derive(Serialize, ToSchema)]
pub struct OrderResponse {
    pub status: String,
    pub data: Option<OrderDetails>,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct OrdersResponse {
    pub status: String,
    pub data: Vec<OrderDetails>,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct QuoteResponse {
    pub status: String,
    pub data: Option<OrderQuote>,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PagedOrdersResponse {
    pub status: String,
    pub data: Option<PagedOrders>,
    pub error: Option<String>,
}

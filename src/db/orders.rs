use crate::cache::ResponseCache;
use crate::db::schema::{customers, order_items, orders, products, restaurants};
use crate::db::{DbConnection, RepositoryError};
use crate::enums::orders::{
    OrderDetails, OrderItemDetails, OrderItemRequest, OrderQuote, OrderRequest, PagedOrders,
    QuotedItem,
};
use crate::models::customer::Customer;
use crate::models::order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
use crate::models::product::Product;
use crate::models::restaurant::Restaurant;
use crate::pricing;
use bigdecimal::BigDecimal;
use chrono::{Days, NaiveDate, NaiveTime, TimeZone, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error;
use log::{debug, error};
use uuid::Uuid;

use crate::auth::Principal;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Line item validated against the target restaurant, with the unit price
/// snapshot taken at pricing time.
struct PricedItem {
    product_id: i32,
    product_name: String,
    quantity: i32,
    unit_price: BigDecimal,
    subtotal: BigDecimal,
    notes: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct OrderListFilter {
    pub status: Option<OrderStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct OrderOperations {
    pool: Pool<ConnectionManager<PgConnection>>,
    cache: ResponseCache,
}

impl OrderOperations {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>, cache: ResponseCache) -> Self {
        Self { pool, cache }
    }

    /// Creates an order in PENDING status. Checks run in a fixed order and
    /// short-circuit; nothing is persisted until every check has passed.
    pub fn create_order(&self, req: OrderRequest) -> Result<OrderDetails, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("create_order: failed to acquire DB connection: {}", e);
            e
        })?;

        if req.items.is_empty() {
            return Err(RepositoryError::BusinessRule(format!(
                "order has no items for customer {}",
                req.customer_id
            )));
        }

        let customer = load_customer(conn.connection(), req.customer_id)?;
        if !customer.is_active {
            return Err(RepositoryError::BusinessRule(
                "inactive customer".to_string(),
            ));
        }

        let restaurant = load_restaurant(conn.connection(), req.restaurant_id)?;
        if !restaurant.is_active {
            return Err(RepositoryError::BusinessRule(
                "restaurant unavailable".to_string(),
            ));
        }

        let details = conn.connection().transaction(|conn| {
            let priced = validate_and_price_items(conn, restaurant.restaurant_id, &req.items)?;
            let subtotals: Vec<BigDecimal> = priced.iter().map(|p| p.subtotal.clone()).collect();
            let totals = pricing::order_totals(subtotals.iter(), &restaurant.delivery_fee);

            let new_order = NewOrder {
                customer_id: customer.customer_id,
                restaurant_id: restaurant.restaurant_id,
                delivery_address: req.delivery_address.clone(),
                postal_code: req.postal_code.clone(),
                payment_method: req.payment_method,
                notes: req.notes.clone(),
                subtotal: totals.subtotal,
                delivery_fee: totals.delivery_fee,
                total_price: totals.total,
                status: OrderStatus::Pending,
            };

            let order_id_val = diesel::insert_into(orders::table)
                .values(&new_order)
                .returning(orders::order_id)
                .get_result::<i32>(conn)
                .map_err(RepositoryError::DatabaseError)?;

            let new_items: Vec<NewOrderItem> = priced
                .into_iter()
                .map(|p| NewOrderItem {
                    order_id: order_id_val,
                    product_id: p.product_id,
                    quantity: p.quantity,
                    unit_price: p.unit_price,
                    subtotal: p.subtotal,
                    notes: p.notes,
                })
                .collect();

            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)
                .map_err(RepositoryError::DatabaseError)?;

            load_order_details(conn, order_id_val)
        })?;

        debug!(
            "create_order: created order {} for customer {}",
            details.order_id, details.customer_id
        );
        Ok(details)
    }

    /// Prices an order without persisting anything. Runs the same product
    /// validations as `create_order`.
    pub fn quote(
        &self,
        restaurant_id_val: i32,
        items: &[OrderItemRequest],
    ) -> Result<OrderQuote, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("quote: failed to acquire DB connection: {}", e);
            e
        })?;

        if items.is_empty() {
            return Err(RepositoryError::BusinessRule(
                "order has no items".to_string(),
            ));
        }

        let restaurant = load_restaurant(conn.connection(), restaurant_id_val)?;
        let priced = validate_and_price_items(conn.connection(), restaurant.restaurant_id, items)?;
        let subtotals: Vec<BigDecimal> = priced.iter().map(|p| p.subtotal.clone()).collect();
        let totals = pricing::order_totals(subtotals.iter(), &restaurant.delivery_fee);

        Ok(OrderQuote {
            items: priced
                .into_iter()
                .map(|p| QuotedItem {
                    product_id: p.product_id,
                    product_name: p.product_name,
                    quantity: p.quantity,
                    unit_price: p.unit_price,
                    subtotal: p.subtotal,
                })
                .collect(),
            subtotal: totals.subtotal,
            delivery_fee: totals.delivery_fee,
            total: totals.total,
        })
    }

    pub fn get_order(&self, order_id_val: i32) -> Result<OrderDetails, RepositoryError> {
        let cache_key = format!("orders:{order_id_val}");
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok(details) = serde_json::from_value::<OrderDetails>(cached) {
                return Ok(details);
            }
        }

        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_order: failed to acquire DB connection for order_id {}: {}",
                order_id_val, e
            );
            e
        })?;
        let details = load_order_details(conn.connection(), order_id_val)?;
        if let Ok(value) = serde_json::to_value(&details) {
            self.cache.put(&cache_key, value);
        }
        Ok(details)
    }

    pub fn list_by_customer(
        &self,
        customer_id_val: i32,
    ) -> Result<Vec<OrderDetails>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "list_by_customer: failed to acquire DB connection for customer_id {}: {}",
                customer_id_val, e
            );
            e
        })?;

        let rows = orders::table
            .filter(orders::customer_id.eq(customer_id_val))
            .order_by(orders::ordered_at.desc())
            .select(Order::as_select())
            .load::<Order>(conn.connection())
            .map_err(|e| {
                error!(
                    "list_by_customer: error loading orders for customer_id {}: {}",
                    customer_id_val, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        rows.into_iter()
            .map(|order| order_details(conn.connection(), order))
            .collect()
    }

    pub fn list_by_restaurant(
        &self,
        restaurant_id_val: i32,
        status_filter: Option<OrderStatus>,
    ) -> Result<Vec<OrderDetails>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "list_by_restaurant: failed to acquire DB connection for restaurant_id {}: {}",
                restaurant_id_val, e
            );
            e
        })?;

        let mut query = orders::table
            .filter(orders::restaurant_id.eq(restaurant_id_val))
            .into_boxed();
        if let Some(status_val) = status_filter {
            query = query.filter(orders::status.eq(status_val));
        }

        let rows = query
            .order_by(orders::ordered_at.desc())
            .select(Order::as_select())
            .load::<Order>(conn.connection())
            .map_err(|e| {
                error!(
                    "list_by_restaurant: error loading orders for restaurant_id {}: {}",
                    restaurant_id_val, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        rows.into_iter()
            .map(|order| order_details(conn.connection(), order))
            .collect()
    }

    /// Paginated listing with optional status/date filters. `page` is
    /// zero-based; page size is clamped to [1, 100].
    pub fn list_orders(
        &self,
        filter: OrderListFilter,
        page: i64,
        page_size: i64,
    ) -> Result<PagedOrders, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("list_orders: failed to acquire DB connection: {}", e);
            e
        })?;

        let page = page.max(0);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let total_elements: i64 = apply_order_filters(orders::table.into_boxed(), &filter)
            .count()
            .get_result(conn.connection())
            .map_err(|e| {
                error!("list_orders: error counting orders: {}", e);
                RepositoryError::DatabaseError(e)
            })?;

        let rows = apply_order_filters(orders::table.into_boxed(), &filter)
            .order_by(orders::ordered_at.desc())
            .limit(page_size)
            .offset(page * page_size)
            .select(Order::as_select())
            .load::<Order>(conn.connection())
            .map_err(|e| {
                error!("list_orders: error loading orders page {}: {}", page, e);
                RepositoryError::DatabaseError(e)
            })?;

        let items = rows
            .into_iter()
            .map(|order| order_details(conn.connection(), order))
            .collect::<Result<Vec<_>, _>>()?;

        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + page_size - 1) / page_size
        };

        Ok(PagedOrders {
            items,
            page_number: page,
            page_size,
            total_elements,
            total_pages,
        })
    }

    /// Applies a status transition. The order row is locked for the duration
    /// of the transaction so concurrent transitions serialize; the second one
    /// re-reads the committed status and fails the legality check.
    pub fn update_status(
        &self,
        order_id_val: i32,
        new_status: OrderStatus,
    ) -> Result<OrderDetails, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "update_status: failed to acquire DB connection for order_id {}: {}",
                order_id_val, e
            );
            e
        })?;

        let details = conn.connection().transaction(|conn| {
            let order = lock_order(conn, order_id_val)?;

            if !order.status.can_transition_to(new_status) {
                return Err(RepositoryError::BusinessRule(format!(
                    "invalid status transition: {} -> {}",
                    order.status, new_status
                )));
            }

            if new_status == OrderStatus::Confirmed {
                confirm_order(conn, &order)?;
            } else {
                diesel::update(orders::table.filter(orders::order_id.eq(order_id_val)))
                    .set(orders::status.eq(new_status))
                    .execute(conn)
                    .map_err(RepositoryError::DatabaseError)?;
            }

            load_order_details(conn, order_id_val)
        })?;

        self.cache.invalidate(&format!("orders:{order_id_val}"));
        debug!(
            "update_status: order {} is now {}",
            order_id_val, details.status
        );
        Ok(details)
    }

    /// Cancels an order. Legal only while the order is PENDING or CONFIRMED.
    pub fn cancel_order(&self, order_id_val: i32) -> Result<(), RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "cancel_order: failed to acquire DB connection for order_id {}: {}",
                order_id_val, e
            );
            e
        })?;

        conn.connection().transaction(|conn| {
            let order = lock_order(conn, order_id_val)?;
            if !order.status.is_cancellable() {
                return Err(RepositoryError::BusinessRule(
                    "order cannot be cancelled".to_string(),
                ));
            }

            diesel::update(orders::table.filter(orders::order_id.eq(order_id_val)))
                .set(orders::status.eq(OrderStatus::Cancelled))
                .execute(conn)
                .map_err(RepositoryError::DatabaseError)?;
            Ok(())
        })?;

        self.cache.invalidate(&format!("orders:{order_id_val}"));
        debug!("cancel_order: order {} cancelled", order_id_val);
        Ok(())
    }

    /// True iff the order's customer matches the principal's customer claim.
    /// Fail-closed: missing order, wrong role, or lookup errors yield false.
    pub fn is_client_owner(&self, order_id_val: i32, principal: &Principal) -> bool {
        let Some(customer_id_val) = principal.customer_id() else {
            return false;
        };
        match self.owner_ids(order_id_val) {
            Ok((order_customer, _)) => order_customer == customer_id_val,
            Err(e) => {
                debug!(
                    "is_client_owner: denying access to order {}: {}",
                    order_id_val, e
                );
                false
            }
        }
    }

    /// True iff the order's restaurant matches the principal's restaurant
    /// claim. Fail-closed like `is_client_owner`.
    pub fn is_restaurant_owner(&self, order_id_val: i32, principal: &Principal) -> bool {
        let Some(restaurant_id_val) = principal.restaurant_id() else {
            return false;
        };
        match self.owner_ids(order_id_val) {
            Ok((_, order_restaurant)) => order_restaurant == restaurant_id_val,
            Err(e) => {
                debug!(
                    "is_restaurant_owner: denying access to order {}: {}",
                    order_id_val, e
                );
                false
            }
        }
    }

    pub fn can_access(&self, order_id_val: i32, principal: &Principal) -> bool {
        self.is_client_owner(order_id_val, principal)
            || self.is_restaurant_owner(order_id_val, principal)
    }

    fn owner_ids(&self, order_id_val: i32) -> Result<(i32, i32), RepositoryError> {
        let mut conn = DbConnection::new(&self.pool)?;
        orders::table
            .filter(orders::order_id.eq(order_id_val))
            .select((orders::customer_id, orders::restaurant_id))
            .first::<(i32, i32)>(conn.connection())
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFound {
                    kind: "order",
                    id: order_id_val,
                },
                other => RepositoryError::DatabaseError(other),
            })
    }
}

fn load_customer(conn: &mut PgConnection, customer_id_val: i32) -> Result<Customer, RepositoryError> {
    customers::table
        .filter(customers::customer_id.eq(customer_id_val))
        .select(Customer::as_select())
        .first::<Customer>(conn)
        .map_err(|e| match e {
            Error::NotFound => RepositoryError::NotFound {
                kind: "customer",
                id: customer_id_val,
            },
            other => {
                error!(
                    "load_customer: error loading customer {}: {}",
                    customer_id_val, other
                );
                RepositoryError::DatabaseError(other)
            }
        })
}

fn load_restaurant(
    conn: &mut PgConnection,
    restaurant_id_val: i32,
) -> Result<Restaurant, RepositoryError> {
    restaurants::table
        .filter(restaurants::restaurant_id.eq(restaurant_id_val))
        .select(Restaurant::as_select())
        .first::<Restaurant>(conn)
        .map_err(|e| match e {
            Error::NotFound => RepositoryError::NotFound {
                kind: "restaurant",
                id: restaurant_id_val,
            },
            other => {
                error!(
                    "load_restaurant: error loading restaurant {}: {}",
                    restaurant_id_val, other
                );
                RepositoryError::DatabaseError(other)
            }
        })
}

/// Validates every requested item against the target restaurant and prices it
/// with the current product price as the unit-price snapshot. The first
/// failing item aborts the whole batch.
fn validate_and_price_items(
    conn: &mut PgConnection,
    restaurant_id_val: i32,
    items: &[OrderItemRequest],
) -> Result<Vec<PricedItem>, RepositoryError> {
    let mut priced = Vec::with_capacity(items.len());
    for item in items {
        let product = products::table
            .filter(products::product_id.eq(item.product_id))
            .select(Product::as_select())
            .first::<Product>(conn)
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFound {
                    kind: "product",
                    id: item.product_id,
                },
                other => {
                    error!(
                        "validate_and_price_items: error loading product {}: {}",
                        item.product_id, other
                    );
                    RepositoryError::DatabaseError(other)
                }
            })?;

        if product.restaurant_id != restaurant_id_val {
            return Err(RepositoryError::BusinessRule(
                "product not part of restaurant".to_string(),
            ));
        }
        if !product.is_available {
            return Err(RepositoryError::BusinessRule(format!(
                "product unavailable: {}",
                product.name
            )));
        }

        let subtotal = pricing::item_subtotal(&product.price, item.quantity)
            .map_err(|e| RepositoryError::BusinessRule(e.to_string()))?;

        priced.push(PricedItem {
            product_id: product.product_id,
            product_name: product.name,
            quantity: item.quantity,
            unit_price: product.price,
            subtotal,
            notes: item.notes.clone(),
        });
    }
    Ok(priced)
}

fn lock_order(conn: &mut PgConnection, order_id_val: i32) -> Result<Order, RepositoryError> {
    orders::table
        .filter(orders::order_id.eq(order_id_val))
        .for_update()
        .select(Order::as_select())
        .first::<Order>(conn)
        .map_err(|e| match e {
            Error::NotFound => RepositoryError::NotFound {
                kind: "order",
                id: order_id_val,
            },
            other => {
                error!("lock_order: error loading order {}: {}", order_id_val, other);
                RepositoryError::DatabaseError(other)
            }
        })
}

/// Confirmation assigns the human-readable order number, stamps the
/// confirmation time and snapshots the customer's current address. Price
/// fields are untouched.
fn confirm_order(conn: &mut PgConnection, order: &Order) -> Result<(), RepositoryError> {
    let customer = load_customer(conn, order.customer_id)?;
    let order_number_val = format!("ORD-{}", Uuid::new_v4().to_string().to_uppercase());

    diesel::update(orders::table.filter(orders::order_id.eq(order.order_id)))
        .set((
            orders::status.eq(OrderStatus::Confirmed),
            orders::order_number.eq(order_number_val),
            orders::confirmed_at.eq(Utc::now()),
            orders::delivery_address.eq(customer.address),
        ))
        .execute(conn)
        .map_err(RepositoryError::DatabaseError)?;
    Ok(())
}

fn load_order_details(
    conn: &mut PgConnection,
    order_id_val: i32,
) -> Result<OrderDetails, RepositoryError> {
    let order = orders::table
        .filter(orders::order_id.eq(order_id_val))
        .select(Order::as_select())
        .first::<Order>(conn)
        .map_err(|e| match e {
            Error::NotFound => RepositoryError::NotFound {
                kind: "order",
                id: order_id_val,
            },
            other => {
                error!(
                    "load_order_details: error loading order {}: {}",
                    order_id_val, other
                );
                RepositoryError::DatabaseError(other)
            }
        })?;
    order_details(conn, order)
}

fn order_details(conn: &mut PgConnection, order: Order) -> Result<OrderDetails, RepositoryError> {
    let items = order_items::table
        .inner_join(products::table.on(order_items::product_id.eq(products::product_id)))
        .filter(order_items::order_id.eq(order.order_id))
        .order_by(order_items::order_item_id.asc())
        .select((OrderItem::as_select(), products::name))
        .load::<(OrderItem, String)>(conn)
        .map_err(|e| {
            error!(
                "order_details: error loading items for order {}: {}",
                order.order_id, e
            );
            RepositoryError::DatabaseError(e)
        })?;

    Ok(OrderDetails {
        order_id: order.order_id,
        order_number: order.order_number,
        customer_id: order.customer_id,
        restaurant_id: order.restaurant_id,
        ordered_at: order.ordered_at,
        confirmed_at: order.confirmed_at,
        delivery_address: order.delivery_address,
        postal_code: order.postal_code,
        payment_method: order.payment_method,
        notes: order.notes,
        subtotal: order.subtotal,
        delivery_fee: order.delivery_fee,
        total_price: order.total_price,
        status: order.status,
        items: items
            .into_iter()
            .map(|(item, product_name)| OrderItemDetails {
                product_id: item.product_id,
                product_name,
                quantity: item.quantity,
                unit_price: item.unit_price,
                subtotal: item.subtotal,
                notes: item.notes,
            })
            .collect(),
    })
}

type BoxedOrderQuery<'a> = orders::BoxedQuery<'a, diesel::pg::Pg>;

fn apply_order_filters<'a>(
    mut query: BoxedOrderQuery<'a>,
    filter: &OrderListFilter,
) -> BoxedOrderQuery<'a> {
    if let Some(status_val) = filter.status {
        query = query.filter(orders::status.eq(status_val));
    }
    if let Some(from) = filter.date_from {
        let start = Utc.from_utc_datetime(&from.and_time(NaiveTime::MIN));
        query = query.filter(orders::ordered_at.ge(start));
    }
    if let Some(to) = filter.date_to {
        if let Some(next_day) = to.checked_add_days(Days::new(1)) {
            let end = Utc.from_utc_datetime(&next_day.and_time(NaiveTime::MIN));
            query = query.filter(orders::ordered_at.lt(end));
        }
    }
    query
}

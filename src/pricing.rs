//! Pure order pricing. All monetary arithmetic uses `BigDecimal` so item
//! subtotals and order totals are exact; nothing here touches the database.

use bigdecimal::BigDecimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    pub subtotal: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub total: BigDecimal,
}

/// Subtotal for a single line: unit price x quantity. Quantity must be >= 1.
pub fn item_subtotal(unit_price: &BigDecimal, quantity: i32) -> Result<BigDecimal, PricingError> {
    if quantity < 1 {
        return Err(PricingError::InvalidQuantity(quantity));
    }
    Ok(unit_price * BigDecimal::from(quantity))
}

/// Aggregates item subtotals and adds the restaurant's delivery fee.
pub fn order_totals<'a, I>(item_subtotals: I, delivery_fee: &BigDecimal) -> OrderTotals
where
    I: IntoIterator<Item = &'a BigDecimal>,
{
    let subtotal: BigDecimal = item_subtotals.into_iter().sum();
    let total = &subtotal + delivery_fee;
    OrderTotals {
        subtotal,
        delivery_fee: delivery_fee.clone(),
        total,
    }
}

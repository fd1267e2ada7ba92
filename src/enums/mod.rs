pub mod common;
pub mod customers;
pub mod orders;
pub mod products;
pub mod restaurants;

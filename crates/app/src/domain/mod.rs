//! Trolley Domain Concerns

pub mod carts;
pub mod owners;
pub mod products;
pub mod users;

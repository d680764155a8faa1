//! Carts
//!
//! Every route acts on the authenticated owner's single cart.

mod errors;
mod handlers;
pub(crate) mod items;
mod responses;

pub(crate) use handlers::*;

//! Carts
//!
//! One cart aggregate per owner. Every mutation is a read-modify-write of the
//! whole aggregate, committed through a version-checked write on the
//! [`store::CartStore`].

pub mod data;
pub mod errors;
pub mod records;
pub mod service;
pub mod store;

pub use errors::{CartsServiceError, Dependency};
pub use service::*;

//! Products
//!
//! The product catalog is an external collaborator of the cart: carts only
//! ever read from it through [`ProductsService::get_product`].

pub mod data;
pub mod errors;
mod memory;
pub mod records;
mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub use memory::MemoryProductsService;
pub use service::*;

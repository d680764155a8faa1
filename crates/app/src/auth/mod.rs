//! Authentication
//!
//! Requests carry an HS256-signed JWT whose owner claim identifies the cart
//! owner. Verification yields an [`OwnerId`](crate::domain::owners::OwnerId).

mod errors;
mod service;

pub use errors::*;
pub use service::*;

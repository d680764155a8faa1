//! Users
//!
//! Registered accounts that can log in. A user's UUID is the owner
//! identifier carried in the tokens they are issued, so every user owns
//! exactly one cart.

pub mod data;
pub mod errors;
mod memory;
mod password;
pub mod records;
mod repository;
pub mod service;

pub use errors::UsersServiceError;
pub use memory::MemoryUsersService;
pub use service::*;

/// Cheapest cost bcrypt accepts, keeping tests fast.
#[cfg(test)]
pub(crate) const TEST_HASH_COST: u32 = 4;

//! Carts Config

use std::time::Duration;

use clap::Args;
use trolley_app::domain::carts::CartsSettings;

/// Cart write settings.
#[derive(Debug, Args)]
pub struct CartsConfig {
    /// Timeout for each catalog or cart store call, in milliseconds
    #[arg(long, env = "CART_IO_TIMEOUT_MS", default_value_t = 2_000_u64)]
    pub cart_io_timeout_ms: u64,

    /// Attempts at a contended cart write before reporting a conflict
    #[arg(
        long,
        env = "CART_MAX_ATTEMPTS",
        default_value_t = 3_u32,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub cart_max_attempts: u32,
}

impl CartsConfig {
    #[must_use]
    pub fn settings(&self) -> CartsSettings {
        CartsSettings {
            max_attempts: self.cart_max_attempts,
            io_timeout: Duration::from_millis(self.cart_io_timeout_ms),
        }
    }
}

//
//  ebay-sdk
//  logging.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Opt-in log output.
//!
//! The SDK only emits `tracing` events; nothing is printed unless the
//! application installs a subscriber. [`init_logging`] installs a plain
//! `fmt` subscriber for applications that have none of their own.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter, e.g. `ebay_sdk=debug`.
pub const LOG_ENV: &str = "EBAY_SDK_LOG";

/// Installs a global `fmt` subscriber filtered by [`LOG_ENV`].
///
/// Falls back to `warn` when the variable is unset or invalid. Returns
/// `false` if a global subscriber was already installed, in which case
/// nothing changes.
///
/// # Example
///
/// ```rust
/// ebay_sdk::logging::init_logging();
/// // A second call leaves the first subscriber in place.
/// assert!(!ebay_sdk::logging::init_logging());
/// ```
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init()
        .is_ok()
}

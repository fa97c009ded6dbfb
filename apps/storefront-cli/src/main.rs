//! # Storefront CLI Entry Point
//!
//! ```text
//! storefront status
//! storefront login alice --password secret
//! storefront signup bob --password ... --email ... --phone-number ... --address ...
//! storefront logout
//! storefront config
//! ```
//!
//! The actual setup is in lib.rs for better testability.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    storefront_cli::run().await
}

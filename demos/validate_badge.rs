//! Validate a single badge image with the default settings.
//!
//! Usage:
//! ```sh
//! cargo run --example validate_badge -- badge.png
//! ```

use std::env;
use std::process;

use badge_check::{BadgeValidator, DEFAULT_BADGE_PATH};

fn main() {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_BADGE_PATH.to_string());

    let validator = BadgeValidator::default();
    match validator.validate_file(path.as_ref()) {
        Ok(result) if result.success => println!("Done: {}", result.message),
        Ok(result) => {
            println!("Rejected: {}", result.message);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

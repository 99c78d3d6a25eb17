//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `evman_core` linkage.
//! - Open an in-memory store so migrations are exercised end to end.

use std::process::ExitCode;

fn main() -> ExitCode {
    println!("evman_core ping={}", evman_core::ping());
    println!("evman_core version={}", evman_core::core_version());

    match evman_core::open_db_in_memory() {
        Ok(_) => {
            println!(
                "evman_core schema_version={}",
                evman_core::db::migrations::latest_version()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("evman_core store_open=failed error={err}");
            ExitCode::FAILURE
        }
    }
}

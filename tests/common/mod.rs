//! Common test utilities for the appliance manager.
//!
//! - `fixtures`: temporary database and QR directories
//! - `qr`: decoding generated identifier images
#![allow(dead_code)]

pub mod fixtures;
pub mod qr;

use tracing_subscriber::EnvFilter;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

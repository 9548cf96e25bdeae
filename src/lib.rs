//! Appliance Manager library - household inventory backed by SQLite.
//!
//! This library exposes the core functionality of the `am` CLI for use in
//! tests and other front ends.
//!
//! # Modules
//!
//! - `storage`: Houses, appliances and documents in an SQLite file
//! - `identifier`: QR code images for appliances
//! - `error`: Error taxonomy with user-recoverable hints
//! - `config`: Database and output directory resolution
//! - `app`: Page navigation state for the interactive shell
//! - `shell`: Interactive menu-driven front end
//! - `output`: Output mode abstraction (robot/human)
#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod identifier;
pub mod logging;
pub mod output;
pub mod shell;
pub mod storage;

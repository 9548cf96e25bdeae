//! Output mode abstraction for robot and human output.

use std::path::Path;

use serde::Serialize;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::error::AmError;
use crate::storage::{Appliance, ApplianceSummary, Document, House, HouseSummary};

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// JSON formatting for robot mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotFormat {
    Json,
    JsonCompact,
}

/// Build metadata reported by `am version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_sha: &'static str,
    pub build_timestamp: &'static str,
    pub rustc: &'static str,
    pub target: &'static str,
}

/// Robot-mode error payload, written to stderr.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub error: bool,
    pub kind: &'static str,
    pub message: String,
    pub recoverable: bool,
    pub suggestion: Option<&'static str>,
}

impl From<&AmError> for ErrorPayload {
    fn from(err: &AmError) -> Self {
        Self {
            error: true,
            kind: err.kind(),
            message: err.to_string(),
            recoverable: err.is_user_recoverable(),
            suggestion: err.suggestion(),
        }
    }
}

/// Rendering surface shared by every command.
pub trait Output {
    /// A row was created.
    fn created(&self, entity: &str, id: i64, name: &str);
    fn houses(&self, houses: &[HouseSummary]);
    fn house(&self, house: &House);
    fn appliances(&self, house_id: i64, appliances: &[ApplianceSummary]);
    fn appliance(&self, appliance: &Appliance);
    fn document(&self, document: &Document);
    fn identifier(&self, appliance_id: i64, path: &Path);
    /// A lookup found nothing.
    fn not_found(&self, entity: &str, id: i64);
    fn paths(&self, config: &AppConfig);
    fn version(&self, info: &VersionInfo);
    fn error(&self, err: &AmError);
}

/// Picks the output implementation for the parsed flags.
pub fn for_cli(cli: &Cli) -> Box<dyn Output> {
    if cli.use_json() {
        let format = if cli.use_compact_json() {
            RobotFormat::JsonCompact
        } else {
            RobotFormat::Json
        };
        Box::new(RobotOutput::new(format))
    } else {
        Box::new(HumanOutput::new(cli.quiet))
    }
}

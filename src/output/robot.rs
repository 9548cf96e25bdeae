//! Robot mode JSON output for scripts and agents.

use std::path::Path;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument, trace};

use super::{ErrorPayload, Output, RobotFormat, VersionInfo};
use crate::config::AppConfig;
use crate::error::AmError;
use crate::storage::{Appliance, ApplianceSummary, Document, House, HouseSummary};

/// JSON output implementation.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    fn render<T: Serialize + ?Sized>(&self, data: &T) -> String {
        let rendered = match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        };
        // Every payload here is built from plain structs and maps.
        rendered.unwrap_or_else(|e| json!({ "error": true, "message": e.to_string() }).to_string())
    }

    /// Output any serializable data as JSON to stdout.
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = self.render(data);
        trace!(json_len = json.len(), "JSON serialized");
        println!("{json}");
    }
}

impl Output for RobotOutput {
    fn created(&self, entity: &str, id: i64, name: &str) {
        self.output_json(&json!({ "ok": true, "entity": entity, "id": id, "name": name }));
    }

    fn houses(&self, houses: &[HouseSummary]) {
        self.output_json(houses);
    }

    fn house(&self, house: &House) {
        self.output_json(house);
    }

    fn appliances(&self, _house_id: i64, appliances: &[ApplianceSummary]) {
        self.output_json(appliances);
    }

    fn appliance(&self, appliance: &Appliance) {
        self.output_json(appliance);
    }

    fn document(&self, document: &Document) {
        self.output_json(document);
    }

    fn identifier(&self, appliance_id: i64, path: &Path) {
        self.output_json(&json!({
            "ok": true,
            "appliance_id": appliance_id,
            "payload": crate::identifier::payload_for(appliance_id),
            "path": path.display().to_string(),
        }));
    }

    fn not_found(&self, entity: &str, id: i64) {
        self.output_json(&json!({ "found": false, "entity": entity, "id": id }));
    }

    fn paths(&self, config: &AppConfig) {
        self.output_json(config);
    }

    fn version(&self, info: &VersionInfo) {
        self.output_json(info);
    }

    fn error(&self, err: &AmError) {
        let payload = ErrorPayload::from(err);
        eprintln!("{}", self.render(&payload));
    }
}

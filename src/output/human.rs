//! Human-friendly terminal output.

use std::path::Path;

use console::style;
use tracing::{debug, instrument};

use super::{Output, VersionInfo};
use crate::config::AppConfig;
use crate::error::AmError;
use crate::storage::{Appliance, ApplianceAttrs, ApplianceSummary, Document, House, HouseSummary};

/// Styled terminal output for interactive users.
pub struct HumanOutput {
    quiet: bool,
}

impl HumanOutput {
    #[instrument]
    pub fn new(quiet: bool) -> Self {
        debug!("Creating HumanOutput");
        Self { quiet }
    }

    fn field(label: &str, value: Option<&str>) {
        if let Some(value) = value {
            println!("{}: {value}", style(label).bold());
        }
    }
}

impl Output for HumanOutput {
    fn created(&self, entity: &str, id: i64, name: &str) {
        if self.quiet {
            println!("{id}");
            return;
        }
        println!(
            "{} {entity} '{name}' added with ID: {id}",
            style("[OK]").green().bold()
        );
    }

    fn houses(&self, houses: &[HouseSummary]) {
        if houses.is_empty() {
            println!("{}", style("No houses registered").yellow());
            println!("Add one with: am house add <NAME>");
            return;
        }
        for h in houses {
            println!("{:>4}  {}", style(h.id).cyan(), h.name);
        }
    }

    fn house(&self, house: &House) {
        println!("{}: {}", style("ID").bold(), house.id);
        println!("{}: {}", style("Name").bold(), house.name);
        Self::field("Address", house.address.as_deref());
    }

    fn appliances(&self, house_id: i64, appliances: &[ApplianceSummary]) {
        if appliances.is_empty() {
            println!("{}", style(format!("No appliances for house {house_id}")).yellow());
            return;
        }
        for a in appliances {
            match &a.description {
                Some(d) => println!("{:>4}  {}  {}", style(a.id).cyan(), a.name, style(d).dim()),
                None => println!("{:>4}  {}", style(a.id).cyan(), a.name),
            }
        }
    }

    fn appliance(&self, appliance: &Appliance) {
        println!("{}: {}", style("ID").bold(), appliance.id);
        println!("{}: {}", style("House").bold(), appliance.house_id);
        println!("{}: {}", style("Name").bold(), appliance.name);
        match &appliance.attrs {
            ApplianceAttrs::Basic { description } => {
                Self::field("Description", description.as_deref());
            }
            ApplianceAttrs::Detailed {
                brand,
                model,
                purchase_date,
            } => {
                Self::field("Brand", brand.as_deref());
                Self::field("Model", model.as_deref());
                let date = purchase_date.map(|d| d.format("%Y-%m-%d").to_string());
                Self::field("Purchased", date.as_deref());
            }
        }
    }

    fn document(&self, document: &Document) {
        let f = &document.fields;
        println!("{}: {}", style("Document").bold(), document.id);
        println!("{}: {}", style("Appliance").bold(), document.appliance_id);
        Self::field("Manual", f.manual_path.as_deref());
        Self::field("Video", f.video_path.as_deref());
        Self::field("Warranty images", f.warranty_images.as_deref());
        Self::field("Notes", f.notes.as_deref());
        Self::field("Serial number", f.serial_number.as_deref());
        Self::field("QR code", f.qr_code_path.as_deref());
    }

    fn identifier(&self, appliance_id: i64, path: &Path) {
        if self.quiet {
            println!("{}", path.display());
            return;
        }
        println!(
            "{} QR code for appliance {appliance_id} saved to {}",
            style("[OK]").green().bold(),
            path.display()
        );
    }

    fn not_found(&self, entity: &str, id: i64) {
        println!("{}", style(format!("No {entity} with ID {id}")).yellow());
    }

    fn paths(&self, config: &AppConfig) {
        println!(
            "{}: {} ({:?})",
            style("Database").bold(),
            config.db_path.display(),
            config.db_source
        );
        println!(
            "{}: {} ({:?})",
            style("QR codes").bold(),
            config.qr_dir.display(),
            config.qr_source
        );
        if let Some(file) = &config.config_file {
            println!("{}: {}", style("Config").bold(), file.display());
        }
    }

    fn version(&self, info: &VersionInfo) {
        println!("am {}", info.version);
        println!("  git:    {}", info.git_sha);
        println!("  built:  {}", info.build_timestamp);
        println!("  rustc:  {}", info.rustc);
        println!("  target: {}", info.target);
    }

    fn error(&self, err: &AmError) {
        eprintln!("{} {err}", style("Error:").red().bold());
        if let Some(hint) = err.suggestion() {
            eprintln!("{} {hint}", style("Hint:").yellow());
        }
    }
}

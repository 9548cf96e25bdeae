//! CLI argument definitions.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell as CompletionShell;
use std::path::PathBuf;

use crate::storage::{ApplianceAttrs, NewDocument};

/// Appliance Manager - track houses, their appliances, documents and QR labels.
///
/// Robot Mode: use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "am", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "AM_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose logging (repeat for more detail)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (print only ids and paths)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Database file
    #[arg(long, global = true, env = "AM_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Directory QR code images are written to
    #[arg(long, global = true, env = "AM_QR_DIR", value_name = "DIR")]
    pub qr_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(long, global = true, env = "AM_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register and inspect houses
    #[command(subcommand)]
    House(HouseCommand),

    /// Add and inspect appliances
    #[command(subcommand)]
    Appliance(ApplianceCommand),

    /// Attach and inspect appliance documents
    #[command(subcommand)]
    Document(DocumentCommand),

    /// Generate the QR code image for an appliance
    Qr(QrArgs),

    /// Interactive menu-driven mode
    Shell,

    /// Show resolved database and QR code locations
    Paths,

    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Subcommand, Debug)]
pub enum HouseCommand {
    /// Register a new house
    Add(AddHouseArgs),
    /// List all houses
    List,
    /// Show one house
    Show(IdArg),
}

#[derive(Subcommand, Debug)]
pub enum ApplianceCommand {
    /// Add an appliance to a house
    Add(AddApplianceArgs),
    /// List the appliances of a house
    List(HouseIdArg),
    /// Show one appliance
    Show(IdArg),
}

#[derive(Subcommand, Debug)]
pub enum DocumentCommand {
    /// Attach the document record of an appliance
    Add(AddDocumentArgs),
    /// Show the document of an appliance
    Show(ApplianceIdArg),
}

// === Argument Structs ===

#[derive(Args, Debug)]
pub struct IdArg {
    /// Record id
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct HouseIdArg {
    /// House id
    pub house_id: i64,
}

#[derive(Args, Debug)]
pub struct ApplianceIdArg {
    /// Appliance id
    pub appliance_id: i64,
}

#[derive(Args, Debug)]
pub struct AddHouseArgs {
    /// Unique house name
    pub name: String,

    /// Street address
    #[arg(long, short = 'a')]
    pub address: Option<String>,
}

#[derive(Args, Debug)]
pub struct AddApplianceArgs {
    /// House the appliance belongs to
    pub house_id: i64,

    /// Appliance name (unique per house unless brand/model details are given)
    pub name: String,

    /// Free-form description
    #[arg(long, short = 'd', conflicts_with_all = ["brand", "model", "purchase_date"])]
    pub description: Option<String>,

    /// Manufacturer
    #[arg(long)]
    pub brand: Option<String>,

    /// Model number
    #[arg(long)]
    pub model: Option<String>,

    /// Purchase date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub purchase_date: Option<NaiveDate>,
}

impl AddApplianceArgs {
    /// Attribute set selected by the populated flags.
    pub fn attrs(&self) -> crate::error::Result<ApplianceAttrs> {
        ApplianceAttrs::from_fields(
            self.description.clone(),
            self.brand.clone(),
            self.model.clone(),
            self.purchase_date,
        )
    }
}

#[derive(Args, Debug)]
pub struct AddDocumentArgs {
    /// Appliance the document describes
    pub appliance_id: i64,

    /// Path to the user manual
    #[arg(long)]
    pub manual: Option<String>,

    /// Path to an instructional video
    #[arg(long)]
    pub video: Option<String>,

    /// Warranty image paths
    #[arg(long)]
    pub warranty_images: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Serial number
    #[arg(long)]
    pub serial_number: Option<String>,

    /// Generate the QR code and record its path on the document
    #[arg(long)]
    pub with_qr: bool,
}

impl AddDocumentArgs {
    pub fn document(&self) -> NewDocument {
        NewDocument {
            manual_path: self.manual.clone(),
            video_path: self.video.clone(),
            warranty_images: self.warranty_images.clone(),
            notes: self.notes.clone(),
            serial_number: self.serial_number.clone(),
            qr_code_path: None,
        }
    }
}

#[derive(Args, Debug)]
pub struct QrArgs {
    /// Appliance id to encode
    pub appliance_id: i64,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: CompletionShell,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

//! Persistent storage for houses, appliances and documents.
//!
//! # Layout
//!
//! ```text
//! ~/.local/share/appliance-manager/
//! ├── appliance_manager.db     # SQLite database
//! └── qr_codes/                # Identifier images
//!     └── appliance_1.png
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use am::storage::{ApplianceAttrs, Storage};
//!
//! let db = Storage::open("appliance_manager.db", "qr_codes")?;
//! let house = db.add_house("Lakeview", Some("123 Elm"))?;
//! let oven = db.add_appliance(house, "Oven", &ApplianceAttrs::basic("gas"))?;
//! let qr = db.generate_identifier(oven)?;
//! ```

mod db;
mod schema;

pub use db::Storage;
pub use schema::{
    Appliance, ApplianceAttrs, ApplianceSummary, Document, House, HouseSummary, NewDocument,
};

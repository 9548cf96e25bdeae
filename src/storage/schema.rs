//! Record types for houses, appliances and their documents.
//!
//! These mirror the rows stored in the inventory database. Appliances come in
//! two shapes that share one table; see [`ApplianceAttrs`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AmError, Result};

/// A registered house.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Row returned by house listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseSummary {
    pub id: i64,
    pub name: String,
}

/// Attribute set carried by an appliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApplianceAttrs {
    /// Free-form description. Names are unique per house for this shape.
    Basic {
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Manufacturer details. No uniqueness constraint applies.
    Detailed {
        #[serde(skip_serializing_if = "Option::is_none")]
        brand: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        purchase_date: Option<NaiveDate>,
    },
}

impl ApplianceAttrs {
    /// Basic attributes with a description.
    #[must_use]
    pub fn basic(description: impl Into<String>) -> Self {
        Self::Basic {
            description: Some(description.into()),
        }
    }

    /// Selects the shape from whichever fields are populated.
    ///
    /// Blank strings count as absent. Any of brand, model or purchase date
    /// yields `Detailed`; otherwise the result is `Basic`. Mixing a
    /// description with detailed fields is rejected.
    pub fn from_fields(
        description: Option<String>,
        brand: Option<String>,
        model: Option<String>,
        purchase_date: Option<NaiveDate>,
    ) -> Result<Self> {
        let description = non_blank(description);
        let brand = non_blank(brand);
        let model = non_blank(model);

        let detailed = brand.is_some() || model.is_some() || purchase_date.is_some();
        if !detailed {
            return Ok(Self::Basic { description });
        }
        if description.is_some() {
            return Err(AmError::invalid(
                "appliance attributes",
                "a description cannot be combined with brand, model or purchase date",
            ));
        }
        Ok(Self::Detailed {
            brand,
            model,
            purchase_date,
        })
    }

    /// Discriminator stored in the `kind` column.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::Detailed { .. } => "detailed",
        }
    }

    /// The description, when this is a basic appliance.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Basic { description } => description.as_deref(),
            Self::Detailed { .. } => None,
        }
    }
}

impl Default for ApplianceAttrs {
    fn default() -> Self {
        Self::Basic { description: None }
    }
}

/// A stored appliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appliance {
    pub id: i64,
    pub house_id: i64,
    pub name: String,
    pub attrs: ApplianceAttrs,
}

/// Row returned by per-house appliance listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Fields supplied when attaching a document to an appliance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    pub manual_path: Option<String>,
    pub video_path: Option<String>,
    pub warranty_images: Option<String>,
    pub notes: Option<String>,
    pub serial_number: Option<String>,
    pub qr_code_path: Option<String>,
}

impl NewDocument {
    /// Set the generated identifier image path.
    pub fn with_qr_code_path(mut self, path: impl Into<String>) -> Self {
        self.qr_code_path = Some(path.into());
        self
    }

    /// Set the free-form notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the serial number.
    pub fn with_serial_number(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }
}

/// A stored document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub appliance_id: i64,
    #[serde(flatten)]
    pub fields: NewDocument,
}

/// Trims a value and maps blank input to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

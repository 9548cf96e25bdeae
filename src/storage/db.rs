//! SQLite database operations for the inventory store.
//!
//! Every write is a single autocommit `INSERT`; constraint checks are left to
//! SQLite and translated into [`AmError`] variants.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, ffi, params};
use tracing::{debug, info, instrument, warn};

use super::schema::{
    Appliance, ApplianceAttrs, ApplianceSummary, Document, House, HouseSummary, NewDocument,
    non_blank,
};
use crate::error::{AmError, Result};
use crate::identifier::IdentifierGenerator;

/// SQLite schema for the inventory.
const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS houses (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    address TEXT
);

-- Both appliance shapes share this table, discriminated by `kind`.
CREATE TABLE IF NOT EXISTS appliances (
    id INTEGER PRIMARY KEY,
    house_id INTEGER NOT NULL REFERENCES houses(id),
    name TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('basic', 'detailed')),
    description TEXT,
    brand TEXT,
    model TEXT,
    purchase_date TEXT
);

CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY,
    appliance_id INTEGER NOT NULL UNIQUE REFERENCES appliances(id),
    manual_path TEXT,
    video_path TEXT,
    warranty_images TEXT,
    notes TEXT,
    serial_number TEXT,
    qr_code_path TEXT
);

-- Basic appliance names are unique within a house.
CREATE UNIQUE INDEX IF NOT EXISTS idx_appliances_basic_name
    ON appliances(house_id, name) WHERE kind = 'basic';
CREATE INDEX IF NOT EXISTS idx_appliances_house ON appliances(house_id);
";

/// How long a writer waits on another connection's lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle on the inventory database plus the identifier output directory.
///
/// A `Storage` owns one connection. Extra workers get their own handle via
/// [`try_clone`](Self::try_clone); SQLite serializes their writes.
pub struct Storage {
    conn: Connection,
    path: Option<PathBuf>,
    identifiers: IdentifierGenerator,
}

impl Storage {
    /// Opens or creates the database at `db_path`.
    #[instrument(skip_all, fields(path = %db_path.as_ref().display()))]
    pub fn open<P: AsRef<Path>, Q: Into<PathBuf>>(db_path: P, output_dir: Q) -> Result<Self> {
        let path = db_path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AmError::storage(
                    "open",
                    format!("failed to create directory {}: {e}", parent.display()),
                )
            })?;
        }

        debug!(path = %path.display(), "Opening inventory database");
        let conn = Connection::open(path)
            .map_err(|e| AmError::storage("open", format!("failed to open database: {e}")))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| AmError::storage("open", e))?;
        let mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(|e| AmError::storage("open", format!("failed to set journal mode: {e}")))?;
        debug!(journal_mode = %mode, "Journal mode set");

        let db = Self {
            conn,
            path: Some(path.to_path_buf()),
            identifiers: IdentifierGenerator::new(output_dir),
        };
        db.init_schema()?;
        info!(path = %path.display(), "Inventory database ready");
        Ok(db)
    }

    /// Creates a private in-memory database.
    pub fn in_memory<Q: Into<PathBuf>>(output_dir: Q) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            AmError::storage("open", format!("failed to create in-memory database: {e}"))
        })?;

        let db = Self {
            conn,
            path: None,
            identifiers: IdentifierGenerator::new(output_dir),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Opens a second, independent connection to the same database file.
    pub fn try_clone(&self) -> Result<Self> {
        let Some(path) = &self.path else {
            return Err(AmError::storage(
                "try_clone",
                "an in-memory database cannot be shared",
            ));
        };
        Self::open(path, self.identifiers.output_dir().to_path_buf())
    }

    /// Location of the database file, if it is file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory identifier images are written to.
    pub fn output_dir(&self) -> &Path {
        self.identifiers.output_dir()
    }

    /// Initializes the database schema.
    fn init_schema(&self) -> Result<()> {
        // Enable foreign keys
        self.conn
            .execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| AmError::storage("init_schema", format!("failed to enable foreign keys: {e}")))?;

        self.conn
            .execute_batch(SCHEMA_SQL)
            .map_err(|e| AmError::storage("init_schema", format!("failed to initialize schema: {e}")))?;
        Ok(())
    }

    // === Houses ===

    /// Registers a house and returns its id.
    #[instrument(skip(self, address))]
    pub fn add_house(&self, name: &str, address: Option<&str>) -> Result<i64> {
        let name = required_name("house name", name)?;
        let address = non_blank(address.map(str::to_string));

        self.conn
            .execute(
                "INSERT INTO houses (name, address) VALUES (?1, ?2)",
                params![name, address],
            )
            .map_err(|e| classify_insert_error(e, "add_house", "house", name, "house"))?;

        let id = self.conn.last_insert_rowid();
        info!(id, name, "House added");
        Ok(id)
    }

    /// Lists every house as `(id, name)`, ordered by id.
    #[instrument(skip(self))]
    pub fn get_houses(&self) -> Result<Vec<HouseSummary>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM houses ORDER BY id")
            .map_err(|e| AmError::storage("get_houses", e))?;

        let houses = stmt
            .query_map([], |row| {
                Ok(HouseSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .map_err(|e| AmError::storage("get_houses", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AmError::storage("get_houses", e))?;

        debug!(count = houses.len(), "Listed houses");
        Ok(houses)
    }

    /// Loads one house by id.
    #[instrument(skip(self))]
    pub fn get_house(&self, id: i64) -> Result<Option<House>> {
        self.conn
            .query_row(
                "SELECT id, name, address FROM houses WHERE id = ?1",
                params![id],
                |row| {
                    Ok(House {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        address: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|e| AmError::storage("get_house", e))
    }

    // === Appliances ===

    /// Adds an appliance to a house and returns its id.
    ///
    /// Fails with `DuplicateKey` when a basic appliance with the same name
    /// already exists in the house, and with `StorageUnavailable` when the
    /// house does not exist.
    #[instrument(skip(self, attrs), fields(kind = attrs.kind()))]
    pub fn add_appliance(&self, house_id: i64, name: &str, attrs: &ApplianceAttrs) -> Result<i64> {
        let name = required_name("appliance name", name)?;

        let (description, brand, model, purchase_date) = match attrs {
            ApplianceAttrs::Basic { description } => {
                (non_blank(description.clone()), None, None, None)
            }
            ApplianceAttrs::Detailed {
                brand,
                model,
                purchase_date,
            } => (
                None,
                non_blank(brand.clone()),
                non_blank(model.clone()),
                purchase_date.map(|d| d.format("%Y-%m-%d").to_string()),
            ),
        };

        self.conn
            .execute(
                "INSERT INTO appliances (house_id, name, kind, description, brand, model, purchase_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![house_id, name, attrs.kind(), description, brand, model, purchase_date],
            )
            .map_err(|e| {
                classify_insert_error(e, "add_appliance", "appliance", name, &format!("house {house_id}"))
            })?;

        let id = self.conn.last_insert_rowid();
        info!(id, house_id, name, "Appliance added");
        Ok(id)
    }

    /// Lists the appliances of a house as `(id, name, description)`.
    ///
    /// Returns an empty list when the house has no appliances or does not
    /// exist.
    #[instrument(skip(self))]
    pub fn get_appliances_by_house(&self, house_id: i64) -> Result<Vec<ApplianceSummary>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, description FROM appliances WHERE house_id = ?1 ORDER BY id",
            )
            .map_err(|e| AmError::storage("get_appliances_by_house", e))?;

        let appliances = stmt
            .query_map(params![house_id], |row| {
                Ok(ApplianceSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                })
            })
            .map_err(|e| AmError::storage("get_appliances_by_house", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AmError::storage("get_appliances_by_house", e))?;

        debug!(house_id, count = appliances.len(), "Listed appliances");
        Ok(appliances)
    }

    /// Loads one appliance with its full attribute set.
    #[instrument(skip(self))]
    pub fn get_appliance(&self, id: i64) -> Result<Option<Appliance>> {
        self.conn
            .query_row(
                "SELECT id, house_id, name, kind, description, brand, model, purchase_date
                 FROM appliances WHERE id = ?1",
                params![id],
                appliance_from_row,
            )
            .optional()
            .map_err(|e| AmError::storage("get_appliance", e))
    }

    // === Documents ===

    /// Attaches the document record of an appliance and returns its id.
    ///
    /// An appliance holds at most one document; a second insert fails with
    /// `DuplicateKey`.
    #[instrument(skip(self, doc))]
    pub fn add_document(&self, appliance_id: i64, doc: &NewDocument) -> Result<i64> {
        let doc = NewDocument {
            manual_path: non_blank(doc.manual_path.clone()),
            video_path: non_blank(doc.video_path.clone()),
            warranty_images: non_blank(doc.warranty_images.clone()),
            notes: non_blank(doc.notes.clone()),
            serial_number: non_blank(doc.serial_number.clone()),
            qr_code_path: non_blank(doc.qr_code_path.clone()),
        };

        self.conn
            .execute(
                "INSERT INTO documents (appliance_id, manual_path, video_path, warranty_images, notes, serial_number, qr_code_path)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    appliance_id,
                    doc.manual_path,
                    doc.video_path,
                    doc.warranty_images,
                    doc.notes,
                    doc.serial_number,
                    doc.qr_code_path,
                ],
            )
            .map_err(|e| {
                classify_insert_error(
                    e,
                    "add_document",
                    "document",
                    &format!("appliance {appliance_id}"),
                    &format!("appliance {appliance_id}"),
                )
            })?;

        let id = self.conn.last_insert_rowid();
        info!(id, appliance_id, "Document added");
        Ok(id)
    }

    /// Generates the appliance's identifier and attaches `doc` with the image
    /// path recorded on it. Returns the document id and the image path.
    ///
    /// A rejected insert removes the image again, unless it was already on
    /// disk before the call.
    #[instrument(skip(self, doc))]
    pub fn add_document_with_identifier(
        &self,
        appliance_id: i64,
        doc: &NewDocument,
    ) -> Result<(i64, PathBuf)> {
        let existed = self.identifiers.path_for(appliance_id).exists();
        let path = self.identifiers.generate(appliance_id)?;
        let doc = doc.clone().with_qr_code_path(path.display().to_string());

        match self.add_document(appliance_id, &doc) {
            Ok(id) => Ok((id, path)),
            Err(err) => {
                if !existed {
                    match std::fs::remove_file(&path) {
                        Ok(()) => debug!(path = %path.display(), "Removed identifier of rejected document"),
                        Err(e) => warn!(path = %path.display(), error = %e, "Could not remove identifier"),
                    }
                }
                Err(err)
            }
        }
    }

    /// Loads the document attached to an appliance, if any.
    #[instrument(skip(self))]
    pub fn get_document(&self, appliance_id: i64) -> Result<Option<Document>> {
        self.conn
            .query_row(
                "SELECT id, appliance_id, manual_path, video_path, warranty_images, notes, serial_number, qr_code_path
                 FROM documents WHERE appliance_id = ?1",
                params![appliance_id],
                |row| {
                    Ok(Document {
                        id: row.get(0)?,
                        appliance_id: row.get(1)?,
                        fields: NewDocument {
                            manual_path: row.get(2)?,
                            video_path: row.get(3)?,
                            warranty_images: row.get(4)?,
                            notes: row.get(5)?,
                            serial_number: row.get(6)?,
                            qr_code_path: row.get(7)?,
                        },
                    })
                },
            )
            .optional()
            .map_err(|e| AmError::storage("get_document", e))
    }

    // === Identifiers ===

    /// Writes the QR identifier for an appliance and returns its path.
    ///
    /// Does not check that the appliance exists.
    pub fn generate_identifier(&self, appliance_id: i64) -> Result<PathBuf> {
        self.identifiers.generate(appliance_id)
    }

    /// Names of the tables present in the database.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .map_err(|e| AmError::storage("table_names", e))?;
        stmt.query_map([], |row| row.get(0))
            .map_err(|e| AmError::storage("table_names", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AmError::storage("table_names", e))
    }
}

fn required_name<'a>(field: &'static str, name: &'a str) -> Result<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AmError::invalid(field, "must not be empty"));
    }
    Ok(name)
}

fn appliance_from_row(row: &Row<'_>) -> rusqlite::Result<Appliance> {
    let kind: String = row.get(3)?;
    let attrs = if kind == "detailed" {
        let purchase_date: Option<String> = row.get(7)?;
        ApplianceAttrs::Detailed {
            brand: row.get(5)?,
            model: row.get(6)?,
            purchase_date: purchase_date
                .map(|raw| {
                    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e))
                    })
                })
                .transpose()?,
        }
    } else {
        ApplianceAttrs::Basic {
            description: row.get(4)?,
        }
    };

    Ok(Appliance {
        id: row.get(0)?,
        house_id: row.get(1)?,
        name: row.get(2)?,
        attrs,
    })
}

/// Maps a failed `INSERT` onto the error taxonomy.
///
/// UNIQUE violations become `DuplicateKey` naming `key`; foreign-key
/// violations and everything else become `StorageUnavailable`.
fn classify_insert_error(
    err: rusqlite::Error,
    operation: &str,
    entity: &'static str,
    key: &str,
    parent: &str,
) -> AmError {
    if let rusqlite::Error::SqliteFailure(code, _) = &err {
        match code.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE => {
                debug!(entity, key, "Uniqueness constraint rejected insert");
                return AmError::DuplicateKey {
                    entity,
                    key: key.to_string(),
                };
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                warn!(entity, parent, "Insert references a missing row");
                return AmError::storage(operation, format!("{parent} does not exist ({err})"));
            }
            _ => {}
        }
    }
    AmError::storage(operation, err)
}

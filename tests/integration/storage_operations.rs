//! Integration tests for storage operations against a database file.

use am::error::AmError;
use am::storage::{ApplianceAttrs, ApplianceSummary, HouseSummary, NewDocument, Storage};
use chrono::NaiveDate;

use crate::common::fixtures::TestWorkspace;
use crate::common::init_test_logging;

// ===== Schema Initialization =====

#[test]
fn test_reopen_keeps_schema_and_rows() {
    init_test_logging();
    let ws = TestWorkspace::new();

    {
        let db = ws.open();
        db.add_house("Lakeview", Some("123 Elm")).unwrap();
    }

    let first = ws.open();
    let second = ws.open();
    assert_eq!(
        second.table_names().unwrap(),
        vec!["appliances", "documents", "houses"]
    );
    assert_eq!(first.get_houses().unwrap().len(), 1);
    assert_eq!(second.get_houses().unwrap().len(), 1);
}

#[test]
fn test_open_creates_parent_directories() {
    let ws = TestWorkspace::new();
    assert!(!ws.db_path().exists());
    let db = ws.open();
    assert!(ws.db_path().exists());
    assert_eq!(db.path(), Some(ws.db_path().as_path()));
    assert_eq!(db.output_dir(), ws.qr_dir().as_path());
}

#[test]
fn test_open_fails_on_unusable_path() {
    let ws = TestWorkspace::new();
    // A regular file where a directory is expected.
    let blocker = ws.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let result = Storage::open(blocker.join("inventory.db"), ws.qr_dir());
    assert!(matches!(result, Err(AmError::StorageUnavailable { .. })));
}

// ===== Houses =====

#[test]
fn test_duplicate_house_does_not_grow_count() {
    let ws = TestWorkspace::new();
    let db = ws.open();

    db.add_house("Lakeview", Some("123 Elm")).unwrap();
    let err = db.add_house("Lakeview", Some("other")).unwrap_err();

    match err {
        AmError::DuplicateKey { entity, key } => {
            assert_eq!(entity, "house");
            assert_eq!(key, "Lakeview");
        }
        other => panic!("Expected DuplicateKey, got {other:?}"),
    }
    assert_eq!(db.get_houses().unwrap().len(), 1);
}

#[test]
fn test_houses_listed_in_insertion_order() {
    let ws = TestWorkspace::new();
    let db = ws.open();
    for name in ["Zeta", "Alpha", "Mid"] {
        db.add_house(name, None).unwrap();
    }
    let names: Vec<_> = db.get_houses().unwrap().into_iter().map(|h| h.name).collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
}

// ===== Appliances =====

#[test]
fn test_dangling_house_id_rejected() {
    let ws = TestWorkspace::new();
    let db = ws.open();

    let err = db
        .add_appliance(999, "Fridge", &ApplianceAttrs::basic("cold"))
        .unwrap_err();
    assert!(matches!(err, AmError::StorageUnavailable { .. }));
    assert!(!err.is_user_recoverable());
    assert!(db.get_appliances_by_house(999).unwrap().is_empty());
}

#[test]
fn test_pair_uniqueness_is_per_house() {
    let ws = TestWorkspace::new();
    let db = ws.open();
    let h = db.add_house("Main", None).unwrap();
    let other = db.add_house("Cottage", None).unwrap();

    db.add_appliance(h, "Fridge", &ApplianceAttrs::basic("desc1")).unwrap();
    let err = db
        .add_appliance(h, "Fridge", &ApplianceAttrs::basic("desc2"))
        .unwrap_err();
    assert!(matches!(err, AmError::DuplicateKey { entity: "appliance", ref key } if key == "Fridge"));

    assert!(db.add_appliance(other, "Fridge", &ApplianceAttrs::basic("desc1")).is_ok());
}

#[test]
fn test_detailed_appliances_never_collide() {
    let ws = TestWorkspace::new();
    let db = ws.open();
    let h = db.add_house("Main", None).unwrap();
    let attrs = ApplianceAttrs::Detailed {
        brand: Some("LG".into()),
        model: None,
        purchase_date: NaiveDate::from_ymd_opt(2020, 1, 31),
    };

    db.add_appliance(h, "TV", &attrs).unwrap();
    db.add_appliance(h, "TV", &attrs).unwrap();
    // A basic appliance may share the name with detailed ones.
    db.add_appliance(h, "TV", &ApplianceAttrs::basic("bedroom")).unwrap();
    assert_eq!(db.get_appliances_by_house(h).unwrap().len(), 3);
}

#[test]
fn test_empty_house_lists_nothing() {
    let ws = TestWorkspace::new();
    let db = ws.open();
    let h = db.add_house("Empty", None).unwrap();
    assert_eq!(db.get_appliances_by_house(h).unwrap(), Vec::new());
}

#[test]
fn test_end_to_end_scenario() {
    let ws = TestWorkspace::new();
    let db = ws.open();

    assert_eq!(db.add_house("A", Some("addr")).unwrap(), 1);
    assert_eq!(
        db.add_appliance(1, "Oven", &ApplianceAttrs::basic("desc")).unwrap(),
        1
    );
    assert_eq!(
        db.get_houses().unwrap(),
        vec![HouseSummary { id: 1, name: "A".into() }]
    );
    assert_eq!(
        db.get_appliances_by_house(1).unwrap(),
        vec![ApplianceSummary {
            id: 1,
            name: "Oven".into(),
            description: Some("desc".into()),
        }]
    );
}

// ===== Documents =====

#[test]
fn test_document_with_generated_identifier() {
    let ws = TestWorkspace::new();
    let db = ws.open();
    let h = db.add_house("Home", None).unwrap();
    let a = db.add_appliance(h, "Dryer", &ApplianceAttrs::default()).unwrap();

    let qr = db.generate_identifier(a).unwrap();
    let doc = NewDocument {
        manual_path: Some("manuals/dryer.pdf".into()),
        ..NewDocument::default()
    }
    .with_qr_code_path(qr.display().to_string());
    db.add_document(a, &doc).unwrap();

    let stored = db.get_document(a).unwrap().unwrap();
    assert_eq!(stored.appliance_id, a);
    assert_eq!(stored.fields.manual_path.as_deref(), Some("manuals/dryer.pdf"));
    assert_eq!(stored.fields.qr_code_path, Some(qr.display().to_string()));

    let err = db.add_document(a, &doc).unwrap_err();
    assert!(matches!(err, AmError::DuplicateKey { entity: "document", .. }));
}

#[test]
fn test_rows_survive_reopen() {
    let ws = TestWorkspace::new();
    let (house, appliance) = {
        let db = ws.open();
        let h = db.add_house("Persisted", Some("1 Road")).unwrap();
        let a = db
            .add_appliance(
                h,
                "Boiler",
                &ApplianceAttrs::Detailed {
                    brand: Some("Vaillant".into()),
                    model: Some("ecoTEC".into()),
                    purchase_date: NaiveDate::from_ymd_opt(2019, 11, 2),
                },
            )
            .unwrap();
        (h, a)
    };

    let db = ws.open();
    let loaded = db.get_appliance(appliance).unwrap().unwrap();
    assert_eq!(loaded.house_id, house);
    assert_eq!(loaded.attrs.kind(), "detailed");
    assert_eq!(
        db.get_house(house).unwrap().unwrap().address.as_deref(),
        Some("1 Road")
    );
}

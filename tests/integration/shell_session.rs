//! Scripted interactive sessions against a database file.

use am::app::{Notice, Page};
use am::shell::Shell;

use crate::common::fixtures::TestWorkspace;
use crate::common::qr::decode;

fn run(ws: &TestWorkspace, script: &str) -> (am::app::AppState, String) {
    let storage = ws.open();
    let mut out = Vec::new();
    let state = Shell::new(&storage, script.as_bytes(), &mut out).run().unwrap();
    (state, String::from_utf8(out).unwrap())
}

#[test]
fn test_full_session() {
    let ws = TestWorkspace::new();
    let script = [
        "1", "Lakeview", "123 Elm", // add house
        "2", "", "Fridge", "", "Bosch", "KGN", "2021-06-01", // detailed appliance
        "5", "1", // QR code
        "4", "1", "", "", "", "garage", "SN-9", "n", // document
        "3", "1", // view
        "q",
    ]
    .join("\n");

    let (state, out) = run(&ws, &script);
    assert!(state.is_finished());
    assert!(out.contains("House added with ID: 1"));
    assert!(out.contains("Appliance added with ID: 1"));
    assert!(out.contains("QR code saved to"));
    assert!(out.contains("Document added with ID: 1"));
    assert!(out.contains("Fridge"));

    let db = ws.open();
    let doc = db.get_document(1).unwrap().unwrap();
    assert_eq!(doc.fields.notes.as_deref(), Some("garage"));
    assert_eq!(doc.fields.qr_code_path, None);
    assert_eq!(decode(&ws.qr_dir().join("appliance_1.png")), "appliance/1");
}

#[test]
fn test_document_with_qr_records_path() {
    let ws = TestWorkspace::new();
    {
        let db = ws.open();
        let h = db.add_house("H", None).unwrap();
        db.add_appliance(h, "Oven", &am::storage::ApplianceAttrs::default())
            .unwrap();
    }

    let script = "4\n1\n\n\n\n\n\ny\nq\n";
    let (_, out) = run(&ws, script);
    assert!(out.contains("Document added with ID: 1"));

    let doc = ws.open().get_document(1).unwrap().unwrap();
    let expected = ws.qr_dir().join("appliance_1.png");
    assert_eq!(doc.fields.qr_code_path, Some(expected.display().to_string()));
}

#[test]
fn test_invalid_house_id_keeps_form_open() {
    let ws = TestWorkspace::new();
    ws.open().add_house("H", None).unwrap();

    let (state, out) = run(&ws, "3\nabc\n");
    assert!(out.contains("'abc' is not a number"));
    assert_eq!(state.page, Page::ViewAppliances);
    assert!(matches!(state.notice, Some(Notice::Error(_))));
}

#[test]
fn test_missing_house_is_fatal_for_request() {
    let ws = TestWorkspace::new();
    ws.open().add_house("H", None).unwrap();

    let (state, out) = run(&ws, "2\n99\nKettle\n\n\n\n\n");
    assert!(out.contains("house 99 does not exist"));
    assert_eq!(state.page, Page::Menu);
}

#[test]
fn test_storage_failure_on_house_list_returns_to_menu() {
    let ws = TestWorkspace::new();
    let storage = ws.open();
    rusqlite::Connection::open(ws.db_path())
        .unwrap()
        .execute_batch("DROP TABLE documents; DROP TABLE appliances; DROP TABLE houses;")
        .unwrap();

    let mut out = Vec::new();
    let state = Shell::new(&storage, "2\n".as_bytes(), &mut out).run().unwrap();
    let out = String::from_utf8(out).unwrap();

    assert_eq!(state.page, Page::Menu);
    assert!(matches!(state.notice, Some(Notice::Error(ref m)) if m.contains("get_houses")));
    assert!(out.contains("[ERROR]"));
}

//! Integration tests for several handles sharing one database file.

use std::thread;

use am::error::AmError;
use am::storage::ApplianceAttrs;

use crate::common::fixtures::TestWorkspace;

#[test]
fn test_cloned_handles_see_each_others_writes() {
    let ws = TestWorkspace::new();
    let a = ws.open();
    let b = a.try_clone().unwrap();

    let id = a.add_house("Shared", None).unwrap();
    assert_eq!(b.get_house(id).unwrap().unwrap().name, "Shared");
    assert_eq!(b.output_dir(), a.output_dir());
}

#[test]
fn test_concurrent_writers_all_commit() {
    let ws = TestWorkspace::new();
    let root = ws.open();
    let house = root.add_house("Busy", None).unwrap();

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let handle = root.try_clone().unwrap();
            thread::spawn(move || {
                for i in 0..25 {
                    handle
                        .add_appliance(
                            house,
                            &format!("item-{worker}-{i}"),
                            &ApplianceAttrs::default(),
                        )
                        .unwrap();
                }
            })
        })
        .collect();

    for w in workers {
        w.join().unwrap();
    }

    assert_eq!(root.get_appliances_by_house(house).unwrap().len(), 100);
}

#[test]
fn test_concurrent_duplicate_names_yield_one_row() {
    let ws = TestWorkspace::new();
    let root = ws.open();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let handle = root.try_clone().unwrap();
            thread::spawn(move || handle.add_house("Contested", None))
        })
        .collect();

    let results: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();
    let ok = results.iter().filter(|r| r.is_ok()).count();
    let dup = results
        .iter()
        .filter(|r| matches!(r, Err(AmError::DuplicateKey { .. })))
        .count();

    assert_eq!(ok, 1);
    assert_eq!(dup, 3);
    assert_eq!(root.get_houses().unwrap().len(), 1);
}

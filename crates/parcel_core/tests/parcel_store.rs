use parcel_core::db::open_db_in_memory;
use parcel_core::{
    NewParcel, Parcel, ParcelRepository, RepoError, SqliteParcelStore, PARCEL_STATUS_DELIVERED,
    PARCEL_STATUS_REGISTERED, PARCEL_STATUS_SENT,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

fn test_parcel() -> NewParcel {
    NewParcel {
        client: 1000,
        status: PARCEL_STATUS_REGISTERED.to_string(),
        address: "test".to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

#[test]
fn add_get_delete_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let parcel = test_parcel();

    let number = store.add(&parcel).unwrap();
    assert!(number > 0);

    let loaded = store.get(number).unwrap();
    assert_eq!(loaded, parcel.into_parcel(number));

    store.delete(number).unwrap();
    let err = store.get(number).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == number));
}

#[test]
fn get_missing_number_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let err = store.get(404).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn numbers_are_assigned_sequentially_and_never_reused() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let first = store.add(&test_parcel()).unwrap();
    let second = store.add(&test_parcel()).unwrap();
    assert_eq!(first, 1);
    assert_eq!(second, 2);

    store.delete(second).unwrap();
    let third = store.add(&test_parcel()).unwrap();
    assert_eq!(third, 3);
}

#[test]
fn set_address_applies_only_while_registered() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let number = store.add(&test_parcel()).unwrap();

    store.set_address(number, "new test address").unwrap();
    assert_eq!(store.get(number).unwrap().address, "new test address");

    store.set_status(number, PARCEL_STATUS_SENT).unwrap();
    store.set_address(number, "too late").unwrap();
    assert_eq!(store.get(number).unwrap().address, "new test address");
}

#[test]
fn set_address_targets_only_the_given_number() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let first = store.add(&test_parcel()).unwrap();
    let second = store.add(&test_parcel()).unwrap();

    store.set_address(first, "moved").unwrap();

    assert_eq!(store.get(first).unwrap().address, "moved");
    assert_eq!(store.get(second).unwrap().address, "test");
}

#[test]
fn set_status_is_unconditional_and_accepts_unknown_codes() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let number = store.add(&test_parcel()).unwrap();

    store.set_status(number, PARCEL_STATUS_DELIVERED).unwrap();
    assert_eq!(store.get(number).unwrap().status, PARCEL_STATUS_DELIVERED);

    store.set_status(number, "lost_in_transit").unwrap();
    let loaded = store.get(number).unwrap();
    assert_eq!(loaded.status, "lost_in_transit");
    assert_eq!(loaded.created_at, "2024-01-01T00:00:00Z");
}

#[test]
fn set_status_on_missing_number_is_not_an_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    store.set_status(99, PARCEL_STATUS_SENT).unwrap();
}

#[test]
fn delete_keeps_non_registered_rows_and_other_registered_rows() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let sent = store.add(&test_parcel()).unwrap();
    let bystander = store.add(&test_parcel()).unwrap();
    store.set_status(sent, PARCEL_STATUS_SENT).unwrap();

    store.delete(sent).unwrap();
    assert_eq!(store.get(sent).unwrap().status, PARCEL_STATUS_SENT);
    assert!(store.get(bystander).is_ok());

    store.delete(bystander).unwrap();
    assert!(store.get(bystander).unwrap_err().is_not_found());
    assert!(store.get(sent).is_ok());
}

#[test]
fn get_by_client_returns_every_parcel_of_that_client() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let mut rng = StdRng::from_entropy();
    let client = rng.gen_range(1..10_000_000);

    let mut expected: HashMap<i64, Parcel> = HashMap::new();
    for address in ["first", "second", "third"] {
        let parcel = NewParcel {
            client,
            address: address.to_string(),
            ..test_parcel()
        };
        let number = store.add(&parcel).unwrap();
        expected.insert(number, parcel.into_parcel(number));
    }
    let other = NewParcel {
        client: client + 1,
        ..test_parcel()
    };
    store.add(&other).unwrap();

    let stored = store.get_by_client(client).unwrap();
    assert_eq!(stored.len(), expected.len());
    for parcel in &stored {
        assert_eq!(Some(parcel), expected.get(&parcel.number));
    }

    let numbers: Vec<i64> = stored.iter().map(|parcel| parcel.number).collect();
    let mut sorted = numbers.clone();
    sorted.sort_unstable();
    assert_eq!(numbers, sorted);
}

#[test]
fn get_by_client_without_rows_returns_empty() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    store.add(&test_parcel()).unwrap();

    assert!(store.get_by_client(-1).unwrap().is_empty());
}

#[test]
fn get_by_client_propagates_row_decode_failure() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    store.add(&test_parcel()).unwrap();
    conn.execute(
        "INSERT INTO parcel (client, status, address, created_at)
         VALUES (1000, 'registered', X'00', '2024-01-01T00:00:00Z');",
        [],
    )
    .unwrap();

    let err = store.get_by_client(1000).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn add_accepts_empty_address() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let parcel = NewParcel {
        address: String::new(),
        ..test_parcel()
    };

    let number = store.add(&parcel).unwrap();
    assert_eq!(store.get(number).unwrap().address, "");
}

#[test]
fn get_propagates_row_decode_failure() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    conn.execute(
        "INSERT INTO parcel (client, status, address, created_at)
         VALUES (1000, X'00', 'test', '2024-01-01T00:00:00Z');",
        [],
    )
    .unwrap();
    let number = conn.last_insert_rowid();

    let err = store.get(number).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn guarded_writes_on_missing_number_are_silent_no_ops() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let existing = store.add(&test_parcel()).unwrap();

    store.set_address(existing + 100, "nowhere").unwrap();
    store.delete(existing + 100).unwrap();

    assert_eq!(store.get(existing).unwrap(), test_parcel().into_parcel(existing));
}

#[test]
fn add_rejects_invalid_input_before_touching_storage() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let bad = NewParcel {
        created_at: "yesterday".to_string(),
        ..test_parcel()
    };
    assert!(matches!(store.add(&bad).unwrap_err(), RepoError::Validation(_)));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM parcel;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn full_lifecycle_scenario() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let number = store.add(&test_parcel()).unwrap();
    assert_eq!(number, 1);
    assert_eq!(store.get(1).unwrap(), test_parcel().into_parcel(1));

    store.set_status(1, PARCEL_STATUS_SENT).unwrap();
    store.set_address(1, "new").unwrap();
    assert_eq!(store.get(1).unwrap().address, "test");

    store.delete(1).unwrap();
    assert!(store.get(1).is_ok());

    store.set_status(1, PARCEL_STATUS_REGISTERED).unwrap();
    store.delete(1).unwrap();
    assert!(matches!(store.get(1).unwrap_err(), RepoError::NotFound(1)));
}

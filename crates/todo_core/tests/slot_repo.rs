use todo_core::db::{open_db, open_db_in_memory};
use todo_core::{RepoError, SlotRepository, SqliteSlotRepository};

#[test]
fn missing_slot_reads_as_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    assert!(repo.read_slot("todos").unwrap().is_none());
}

#[test]
fn write_replaces_previous_blob() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    repo.write_slot("todos", b"[1,2,3]").unwrap();
    repo.write_slot("todos", b"[]").unwrap();

    assert_eq!(repo.read_slot("todos").unwrap(), Some(b"[]".to_vec()));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn slots_are_independent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    repo.write_slot("todos", b"a").unwrap();
    repo.write_slot("archive", b"b").unwrap();
    repo.clear_slot("archive").unwrap();

    assert_eq!(repo.read_slot("todos").unwrap(), Some(b"a".to_vec()));
    assert!(repo.read_slot("archive").unwrap().is_none());
}

#[test]
fn blank_slot_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    let err = repo.read_slot(" ").unwrap_err();
    assert!(matches!(err, RepoError::InvalidSlotName(_)));
}

#[test]
fn slot_survives_reopening_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slots.db");

    {
        let conn = open_db(&path).unwrap();
        SqliteSlotRepository::new(&conn)
            .write_slot("todos", b"persisted")
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    assert_eq!(repo.read_slot("todos").unwrap(), Some(b"persisted".to_vec()));
}

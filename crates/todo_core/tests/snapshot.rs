use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use todo_core::db::open_db_in_memory;
use todo_core::{
    decode_items, MemorySlotRepository, SlotRepository, SqliteSlotRepository, TodoItem,
    TodoSnapshot,
};
use uuid::Uuid;

fn timestamped(content: &str, is_done: bool) -> TodoItem {
    let mut item = TodoItem::from_input(
        content,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()),
    )
    .unwrap();
    item.is_done = is_done;
    item
}

#[test]
fn save_then_load_roundtrips_every_field() {
    let conn = open_db_in_memory().unwrap();
    let snapshot = TodoSnapshot::new(SqliteSlotRepository::new(&conn), "todos");
    let items = vec![
        timestamped("밥 먹기", true),
        timestamped("산책하기", false),
        TodoItem::new("커피 사기"),
    ];

    snapshot.save(&items);

    assert_eq!(snapshot.load(), items);
}

#[test]
fn absent_slot_loads_empty() {
    let repo = MemorySlotRepository::new();
    let snapshot = TodoSnapshot::new(&repo, "todos");

    assert!(snapshot.load().is_empty());
}

#[test]
fn corrupt_blob_loads_empty() {
    let repo = MemorySlotRepository::new();
    repo.write_slot("todos", b"{\"truncated\": [").unwrap();
    let snapshot = TodoSnapshot::new(&repo, "todos");

    assert!(snapshot.load().is_empty());
}

#[test]
fn blob_with_wrong_shape_loads_empty() {
    let repo = MemorySlotRepository::new();
    repo.write_slot("todos", br#"{"content":"not a list"}"#).unwrap();
    let snapshot = TodoSnapshot::new(&repo, "todos");

    assert!(snapshot.load().is_empty());
}

#[test]
fn duplicate_ids_reject_the_whole_blob() {
    let id = Uuid::new_v4();
    let blob = format!(
        r#"[{{"id":"{id}","content":"a","isDone":false}},{{"id":"{id}","content":"b","isDone":true}}]"#
    );
    let repo = MemorySlotRepository::new();
    repo.write_slot("todos", blob.as_bytes()).unwrap();

    assert!(TodoSnapshot::new(&repo, "todos").load().is_empty());
}

#[test]
fn tracked_records_without_created_at_load_with_none() {
    let id = Uuid::new_v4();
    let blob = format!(r#"[{{"id":"{id}","content":"stretch","isDone":true}}]"#);

    let items = decode_items(blob.as_bytes()).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, id);
    assert_eq!(items[0].content, "stretch");
    assert!(items[0].is_done);
    assert!(items[0].created_at.is_none());
}

#[test]
fn minimal_records_get_fresh_ids_and_open_state() {
    let items = decode_items(br#"[{"content":"a"},{"content":"b"}]"#).unwrap();

    assert_eq!(items.len(), 2);
    assert_ne!(items[0].id, items[1].id);
    assert!(items.iter().all(|item| !item.is_done));
}

#[test]
fn slots_do_not_leak_between_names() {
    let repo = MemorySlotRepository::new();
    TodoSnapshot::new(&repo, "work").save(&[TodoItem::new("report")]);

    assert!(TodoSnapshot::new(&repo, "home").load().is_empty());
    assert_eq!(TodoSnapshot::new(&repo, "work").load().len(), 1);
}

fn arbitrary_item() -> impl Strategy<Value = TodoItem> {
    (
        "[a-zA-Z0-9가-힣]([a-zA-Z0-9가-힣 .,!?]{0,24}[a-zA-Z0-9가-힣])?",
        any::<bool>(),
        proptest::option::of((0i64..4_102_444_800, 0u32..1_000_000_000)),
    )
        .prop_map(|(content, is_done, stamp)| {
            let created_at =
                stamp.map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap());
            let mut item = TodoItem::from_input(&content, created_at).unwrap();
            item.is_done = is_done;
            item
        })
}

proptest! {
    #[test]
    fn any_valid_sequence_survives_save_and_load(
        items in prop::collection::vec(arbitrary_item(), 0..12),
    ) {
        let repo = MemorySlotRepository::new();
        let snapshot = TodoSnapshot::new(&repo, "todos");

        snapshot.save(&items);

        prop_assert_eq!(snapshot.load(), items);
    }
}

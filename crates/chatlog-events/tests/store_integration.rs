#![allow(missing_docs, unused_results)]

use std::collections::BTreeMap;

use chatlog_core::{RecordId, ServiceAddress, ThreadId};
use chatlog_events::legacy::KeyedArchive;
use chatlog_events::sqlite::ListOptions;
use chatlog_events::{
    CURRENT_PROTOCOL_VERSION, GenericInfoKind, InfoMessage, InfoMessageType, InfoMessageUserInfoKey,
    InfoRecord, InteractionStore, MessageOrigin, RecordError, StoredRecord,
    UnknownProtocolVersionMessage, UserNotRegisteredMessage, decode_record,
};
use chatlog_settings::StorageSettings;
use serde_json::{Value, json};

fn thread() -> ThreadId {
    ThreadId::from("thread-integration")
}

fn archive(class: &str, fields: Value) -> Vec<u8> {
    let Value::Object(map) = fields else {
        panic!("archive fields must be an object");
    };
    KeyedArchive::new(class, map).to_vec().unwrap()
}

#[test]
fn constructed_records_persist_and_hydrate_to_their_variant() {
    let store = InteractionStore::in_memory().unwrap();
    let phone = ServiceAddress::from_phone_number("+15555550100").unwrap();

    let mut user_info = BTreeMap::new();
    user_info.insert(InfoMessageUserInfoKey::ProfileChanges, json!({"newName": "Ada"}));
    let records: Vec<InfoRecord> = vec![
        InfoMessage::new(&thread(), 10, GenericInfoKind::ProfileUpdate, user_info).into(),
        UserNotRegisteredMessage::new(&thread(), 20, phone.clone()).into(),
        UnknownProtocolVersionMessage::new(&thread(), 30, Some(phone.clone()), 99).into(),
        UnknownProtocolVersionMessage::new(&thread(), 40, None, 2).into(),
    ];
    for record in &records {
        store.insert(record).unwrap();
    }

    let listed = store.list_for_thread(&thread(), &ListOptions::default()).unwrap();
    assert_eq!(listed.len(), 4);

    match &listed[0] {
        InfoRecord::Info(m) => {
            assert_eq!(m.message_type(), InfoMessageType::ProfileUpdate);
            assert_eq!(
                m.user_info_value(InfoMessageUserInfoKey::ProfileChanges),
                Some(&json!({"newName": "Ada"}))
            );
        }
        other => panic!("expected generic info message, got {other:?}"),
    }
    match &listed[1] {
        InfoRecord::UserNotRegistered(m) => assert_eq!(m.unregistered_address(), &phone),
        other => panic!("expected unregistered notice, got {other:?}"),
    }
    match &listed[2] {
        InfoRecord::UnknownProtocolVersion(m) => {
            assert_eq!(m.protocol_version(), 99);
            assert_eq!(m.origin(), MessageOrigin::Remote(&phone));
            assert!(m.is_protocol_version_unknown());
        }
        other => panic!("expected unknown protocol notice, got {other:?}"),
    }
    let local = listed[3].as_unknown_protocol_version().unwrap();
    assert_eq!(local.origin(), MessageOrigin::LinkedDevice);
    assert!(!local.is_protocol_version_unknown());
}

#[test]
fn predicates_follow_the_supported_version() {
    let store = InteractionStore::in_memory().unwrap();
    let at = |version| -> InfoRecord {
        UnknownProtocolVersionMessage::new(&thread(), 1, None, version).into()
    };

    let current = store.insert(&at(CURRENT_PROTOCOL_VERSION)).unwrap();
    let newer = store.insert(&at(CURRENT_PROTOCOL_VERSION + 1)).unwrap();

    assert!(current.is_unknown_protocol_version_notice());
    assert!(!current.is_protocol_version_unknown());
    assert!(newer.is_protocol_version_unknown());

    let upv = newer.as_unknown_protocol_version().unwrap();
    assert!(upv.is_protocol_version_unknown_for(5));
    assert!(!upv.is_protocol_version_unknown_for(u64::MAX));

    let generic: InfoRecord =
        InfoMessage::new(&thread(), 1, GenericInfoKind::GroupQuit, BTreeMap::new()).into();
    assert!(!generic.is_unknown_protocol_version_notice());
    assert!(!generic.is_protocol_version_unknown());
}

#[test]
fn legacy_archives_import_into_their_variants() {
    let store = InteractionStore::in_memory().unwrap();

    store
        .stage_legacy_archive(
            &RecordId::from("old-upv"),
            &archive(
                "UnknownProtocolVersionMessage",
                json!({
                    "uniqueId": "ignored-in-favour-of-staging-key",
                    "uniqueThreadId": "thread-integration",
                    "timestamp": 1_500,
                    "protocolVersion": 42,
                    "senderId": "+15555550123",
                    "read": 1,
                }),
            ),
        )
        .unwrap();
    store
        .stage_legacy_archive(
            &RecordId::from("old-unregistered"),
            &archive(
                "InfoMessage",
                json!({
                    "uniqueThreadId": "thread-integration",
                    "timestamp": 1_600,
                    "messageType": InfoMessageType::UserNotRegistered.as_code(),
                    "unregisteredAddress": "+15555550124",
                }),
            ),
        )
        .unwrap();
    store
        .stage_legacy_archive(
            &RecordId::from("old-join"),
            &archive(
                "InfoMessage",
                json!({
                    "uniqueThreadId": "thread-integration",
                    "timestamp": 1_700,
                    "messageType": InfoMessageType::UserJoined.as_code(),
                }),
            ),
        )
        .unwrap();
    assert_eq!(store.pending_legacy_archives().unwrap(), 3);

    let report = store.import_legacy_archives(2).unwrap();
    assert_eq!(report.imported, 3);
    assert!(report.failed.is_empty());
    assert_eq!(store.pending_legacy_archives().unwrap(), 0);

    let upv = store.get(&RecordId::from("old-upv")).unwrap().unwrap();
    assert_eq!(upv.unique_id().as_str(), "old-upv");
    assert!(upv.base().is_read());
    let upv = upv.as_unknown_protocol_version().unwrap();
    assert_eq!(upv.protocol_version(), 42);
    assert_eq!(
        upv.sender().and_then(ServiceAddress::phone_number),
        Some("+15555550123")
    );

    let unregistered = store.get(&RecordId::from("old-unregistered")).unwrap().unwrap();
    match unregistered {
        InfoRecord::UserNotRegistered(m) => {
            assert_eq!(m.unregistered_address().phone_number(), Some("+15555550124"));
        }
        other => panic!("expected unregistered notice, got {other:?}"),
    }

    let joined = store.get(&RecordId::from("old-join")).unwrap().unwrap();
    assert_eq!(joined.message_type(), InfoMessageType::UserJoined);
}

#[test]
fn wide_protocol_versions_import_and_round_trip() {
    let store = InteractionStore::in_memory().unwrap();
    let wide = u64::from(u32::MAX) + 1;

    store
        .stage_legacy_archive(
            &RecordId::from("wide-archive"),
            &archive(
                "UnknownProtocolVersionMessage",
                json!({"uniqueThreadId": "thread-integration", "timestamp": 1, "protocolVersion": wide}),
            ),
        )
        .unwrap();
    let report = store.import_legacy_archives(10).unwrap();
    assert_eq!(report.imported, 1);
    assert!(report.failed.is_empty());

    let imported = store.get(&RecordId::from("wide-archive")).unwrap().unwrap();
    assert_eq!(imported.as_unknown_protocol_version().unwrap().protocol_version(), wide);
    let row = store.get_row(imported.unique_id()).unwrap().unwrap();
    assert_eq!(row.protocol_version, Some(4_294_967_296));

    let constructed = store
        .insert(&UnknownProtocolVersionMessage::new(&thread(), 2, None, wide).into())
        .unwrap();
    let fetched = store.get(constructed.unique_id()).unwrap().unwrap();
    assert_eq!(fetched, constructed);
    assert!(fetched.is_protocol_version_unknown());
}

#[test]
fn rejected_archives_are_reported_once() {
    let store = InteractionStore::in_memory().unwrap();
    store
        .stage_legacy_archive(&RecordId::from("garbage"), b"not an archive")
        .unwrap();
    store
        .stage_legacy_archive(
            &RecordId::from("no-class"),
            &serde_json::to_vec(&json!({"uniqueThreadId": "t"})).unwrap(),
        )
        .unwrap();

    let first = store.import_legacy_archives(10).unwrap();
    assert_eq!(first.imported, 0);
    let mut failed: Vec<_> = first.failed.iter().map(|f| f.unique_id.as_str()).collect();
    failed.sort_unstable();
    assert_eq!(failed, ["garbage", "no-class"]);
    assert_eq!(store.pending_legacy_archives().unwrap(), 0);

    let second = store.import_legacy_archives(10).unwrap();
    assert!(second.failed.is_empty());
    assert_eq!(second.imported, 0);

    // A fresh stage clears the failure and makes the archive eligible again.
    store
        .stage_legacy_archive(
            &RecordId::from("garbage"),
            &archive(
                "UnknownProtocolVersionMessage",
                json!({"uniqueThreadId": "t", "timestamp": 1, "protocolVersion": 9}),
            ),
        )
        .unwrap();
    let third = store.import_legacy_archives(10).unwrap();
    assert_eq!(third.imported, 1);
}

#[test]
fn decode_record_prefers_row_over_archive() {
    let record: InfoRecord = UnknownProtocolVersionMessage::new(&thread(), 5, None, 11).into();
    let row = record.to_row().unwrap();
    let stale = archive(
        "UnknownProtocolVersionMessage",
        json!({"uniqueThreadId": "thread-integration", "timestamp": 5, "protocolVersion": 3}),
    );

    let decoded = decode_record(&StoredRecord {
        row: Some(row),
        archive: Some(stale.clone()),
    })
    .unwrap();
    assert_eq!(decoded, record);

    let from_archive = decode_record(&StoredRecord {
        row: None,
        archive: Some(stale),
    })
    .unwrap();
    assert_eq!(
        from_archive.as_unknown_protocol_version().unwrap().protocol_version(),
        3
    );

    assert!(matches!(
        decode_record(&StoredRecord::default()),
        Err(RecordError::RecordNotFound(_))
    ));
}

#[test]
fn file_store_accepts_concurrent_writers() {
    let dir = tempfile::tempdir().unwrap();
    let settings = StorageSettings {
        db_path: dir.path().join("chatlog.db").to_string_lossy().into_owned(),
        pool_size: 4,
        ..StorageSettings::default()
    };
    let store = InteractionStore::open(&settings).unwrap();

    std::thread::scope(|scope| {
        for worker in 0..4_u64 {
            let store = &store;
            scope.spawn(move || {
                let thread_id = ThreadId::from(format!("worker-{worker}"));
                for n in 0..25 {
                    let record: InfoRecord =
                        UnknownProtocolVersionMessage::new(&thread_id, n, None, 9).into();
                    store.insert(&record).unwrap();
                }
            });
        }
    });

    for worker in 0..4 {
        let thread_id = ThreadId::from(format!("worker-{worker}"));
        assert_eq!(store.count_for_thread(&thread_id).unwrap(), 25);
        let listed = store.list_for_thread(&thread_id, &ListOptions::default()).unwrap();
        let timestamps: Vec<u64> = listed.iter().map(|r| r.base().timestamp()).collect();
        assert_eq!(timestamps, (0..25).collect::<Vec<_>>());
    }
}

#[test]
fn records_with_rows_are_not_overwritten_by_import() {
    let store = InteractionStore::in_memory().unwrap();
    let inserted = store
        .insert(&UnknownProtocolVersionMessage::new(&thread(), 1, None, 8).into())
        .unwrap();
    store
        .stage_legacy_archive(
            inserted.unique_id(),
            &archive(
                "UnknownProtocolVersionMessage",
                json!({"uniqueThreadId": "thread-integration", "timestamp": 1, "protocolVersion": 1}),
            ),
        )
        .unwrap();

    let report = store.import_legacy_archives(10).unwrap();
    assert_eq!(report.already_present, 1);
    assert_eq!(store.get(inserted.unique_id()).unwrap().unwrap(), inserted);
    assert!(matches!(
        store.mark_read(&RecordId::from("missing")),
        Err(RecordError::RecordNotFound(_))
    ));
}


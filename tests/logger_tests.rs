//! Integration tests for the message logger engine and plugin

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use message_logger::directory::{ChannelInfo, Directory, NoDirectory, StaticDirectory, UserInfo};
use message_logger::notify::{NoopObserver, Observer};
use message_logger::types::{MessageAuthor, MessageSnapshot};
use message_logger::{
    BusEvent, CollectedReplies, EventBus, EventKind, JsonFileSettings, LocalBus, LogRecord,
    LoggerConfig, MemorySettings, MessageLogger, MessageLoggerPlugin, RecentRecords, RecordKind,
    SettingsStore, StartOutcome,
};
use serde_json::json;

fn message(id: &str, content: &str) -> MessageSnapshot {
    MessageSnapshot::new(id, "7", content).with_author(MessageAuthor::new("42", "alice", "1234"))
}

fn setup_plugin(directory: Arc<dyn Directory>) -> (Arc<MessageLoggerPlugin>, Arc<LocalBus>) {
    let bus = Arc::new(LocalBus::new());
    let plugin = Arc::new(MessageLoggerPlugin::new(
        Arc::new(MemorySettings::new()),
        Some(bus.clone() as Arc<dyn EventBus>),
        directory,
        Arc::new(NoopObserver),
    ));
    (plugin, bus)
}

#[derive(Default)]
struct CountingObserver {
    seen: AtomicUsize,
}

impl Observer for CountingObserver {
    fn notify(&self, _record: &LogRecord) {
        self.seen.fetch_add(1, Ordering::SeqCst);
    }
}

/// Directory that fails on a poisoned channel id
struct FlakyDirectory;

impl Directory for FlakyDirectory {
    fn channel(&self, channel_id: &str) -> Option<ChannelInfo> {
        if channel_id == "bad" {
            panic!("directory lookup failed");
        }
        Some(ChannelInfo::new("general", Some("9")))
    }

    fn user(&self, _user_id: &str) -> Option<UserInfo> {
        None
    }
}

#[test]
fn test_create_then_delete_records_content() {
    let logger = MessageLogger::default();
    logger.on_create(message("1", "hello"));

    let record = logger.on_delete("7", "1").unwrap();

    assert_eq!(record.content, "hello");
    assert_eq!(record.author.tag(), "alice#1234");
    assert_eq!(record.channel_name, "Unknown Channel");
    let view = logger.list_deleted(10);
    assert_eq!(view.total, 1);
    assert_eq!(view.records[0].message_id, "1");
}

#[test]
fn test_delete_of_unseen_message_is_dropped() {
    let logger = MessageLogger::default();

    assert!(logger.on_delete("7", "404").is_none());
    assert!(logger.stats().is_empty());
}

#[test]
fn test_edit_without_content_change_is_suppressed() {
    let logger = MessageLogger::default();
    logger.on_create(message("1", "same"));

    let edited = logger.on_update(message("1", "same").edited_at("2024-01-01T00:00:00Z"));

    assert!(edited.is_none());
    assert_eq!(logger.stats().edited_count, 0);
}

#[test]
fn test_edit_chain_tracks_latest_content() {
    let logger = MessageLogger::default();
    logger.on_create(message("1", "first"));

    logger.on_update(message("1", "second"));
    let record = logger.on_update(message("1", "third")).unwrap();

    assert_eq!(record.old_content, "second");
    assert_eq!(record.new_content, "third");
    assert_eq!(logger.cached("1").unwrap().content, "third");

    let view = logger.list_edited(10);
    assert_eq!(view.total, 2);
    assert_eq!(view.records[0].new_content, "third");
}

#[test]
fn test_repeating_the_latest_edit_adds_nothing() {
    let logger = MessageLogger::default();
    logger.on_create(message("1", "a"));
    logger.on_update(message("1", "b")).unwrap();

    assert!(logger.on_update(message("1", "b")).is_none());
    assert_eq!(logger.stats().edited_count, 1);
    assert_eq!(logger.cached("1").unwrap().content, "b");
}

#[test]
fn test_update_payload_without_content_keeps_snapshot() {
    let (plugin, bus) = setup_plugin(Arc::new(NoDirectory));
    plugin.start().unwrap();

    bus.dispatch_value(&json!({
        "type": "MESSAGE_CREATE",
        "message": {"id": "1", "channel_id": "7", "content": "a"}
    }));
    bus.dispatch_value(&json!({
        "type": "MESSAGE_UPDATE",
        "message": {"id": "1", "channel_id": "7", "edited_timestamp": "2024-01-01T00:00:01Z"}
    }));
    bus.dispatch_value(&json!({"type": "MESSAGE_DELETE", "channelId": "7", "id": "1"}));

    let logger = plugin.logger();
    assert_eq!(logger.stats().edited_count, 0);
    assert_eq!(logger.list_deleted(1).records[0].content, "a");
}

#[test]
fn test_bulk_payload_counts_malformed_ids() {
    let (plugin, bus) = setup_plugin(Arc::new(NoDirectory));
    plugin.start().unwrap();

    bus.dispatch_value(&json!({
        "type": "MESSAGE_CREATE",
        "message": {"id": "1", "channel_id": "7", "content": "a"}
    }));
    bus.dispatch_value(&json!({
        "type": "MESSAGE_DELETE_BULK",
        "channelId": "7",
        "ids": ["1", null, ""]
    }));

    let view = plugin.logger().list_bulk(1);
    assert_eq!(view.records[0].message_count, 3);
    assert_eq!(view.records[0].messages.len(), 1);
    assert_eq!(view.records[0].unresolved_count(), 2);
}

#[test]
fn test_create_with_numeric_timestamp_is_correlated() {
    let (plugin, bus) = setup_plugin(Arc::new(NoDirectory));
    plugin.start().unwrap();

    bus.dispatch_value(&json!({
        "type": "MESSAGE_CREATE",
        "message": {"id": "1", "channel_id": "7", "content": "a", "timestamp": 1700000000000u64}
    }));
    bus.dispatch_value(&json!({"type": "MESSAGE_DELETE", "channelId": "7", "id": "1"}));

    let view = plugin.logger().list_deleted(1);
    assert_eq!(view.total, 1);
    assert_eq!(view.records[0].timestamp.as_deref(), Some("1700000000000"));
}

#[test]
fn test_logs_stay_within_capacity() {
    let logger = MessageLogger::new(LoggerConfig {
        max_log_size: 3,
        ..Default::default()
    });
    for i in 0..10 {
        let id = i.to_string();
        logger.on_create(message(&id, &format!("msg{}", i)));
        logger.on_delete("7", &id);
    }

    let view = logger.list_deleted(100);
    assert_eq!(view.total, 3);
    let ids: Vec<&str> = view.records.iter().map(|r| r.message_id.as_str()).collect();
    assert_eq!(ids, vec!["9", "8", "7"]);
}

#[test]
fn test_bulk_delete_with_partial_resolution() {
    let logger = MessageLogger::default();
    logger.on_create(message("1", "a"));
    logger.on_create(message("3", "c"));

    let ids: Vec<String> = ["1", "2", "3"].iter().map(|s| s.to_string()).collect();
    let record = logger.on_bulk_delete("7", &ids);

    assert_eq!(record.message_count, 3);
    assert_eq!(record.messages.len(), 2);
    assert_eq!(record.unresolved_count(), 1);
    match logger.list_recent(RecordKind::BulkDeleted, 5) {
        RecentRecords::BulkDeleted(view) => assert_eq!(view.total, 1),
        other => panic!("unexpected records: {:?}", other.kind()),
    }
}

#[test]
fn test_reset_clears_everything() {
    let logger = MessageLogger::default();
    logger.on_create(message("1", "a"));
    logger.on_update(message("1", "b"));
    logger.on_delete("7", "1");

    logger.reset_all();

    assert!(logger.stats().is_empty());
    assert!(logger.on_delete("7", "1").is_none());
}

#[test]
fn test_capacity_change_keeps_newest() {
    let logger = MessageLogger::default();
    for i in 0..5 {
        let id = i.to_string();
        logger.on_create(message(&id, "x"));
        logger.on_delete("7", &id);
    }

    logger
        .apply_config(LoggerConfig {
            max_log_size: 2,
            ..Default::default()
        })
        .unwrap();

    let view = logger.list_deleted(10);
    assert_eq!(view.total, 2);
    assert_eq!(view.records[0].message_id, "4");
    assert!(logger
        .apply_config(LoggerConfig {
            max_cache_size: 0,
            ..Default::default()
        })
        .is_err());
}

#[test]
fn test_notifications_follow_toggle() {
    let observer = Arc::new(CountingObserver::default());
    let logger = MessageLogger::default().with_observer(observer.clone());
    logger.on_create(message("1", "a"));
    logger.on_delete("7", "1");
    assert_eq!(observer.seen.load(Ordering::SeqCst), 1);

    logger
        .apply_config(LoggerConfig {
            show_notifications: false,
            ..Default::default()
        })
        .unwrap();
    logger.on_delete("7", "1");

    assert_eq!(observer.seen.load(Ordering::SeqCst), 1);
    assert_eq!(logger.stats().deleted_count, 2);
}

#[test]
fn test_directory_names_take_precedence() {
    let directory = Arc::new(StaticDirectory::new());
    directory.insert_channel("7", ChannelInfo::new("general", Some("9")));
    directory.insert_user("42", UserInfo::new("alice_renamed", "0001"));
    let logger = MessageLogger::default().with_directory(directory);
    logger.on_create(message("1", "hi"));

    let record = logger.on_delete("7", "1").unwrap();

    assert_eq!(record.channel_name, "general");
    assert_eq!(record.guild_id.as_deref(), Some("9"));
    assert_eq!(record.author.tag(), "alice_renamed#0001");
}

#[test]
fn test_bus_round_trip_through_plugin() {
    let (plugin, bus) = setup_plugin(Arc::new(NoDirectory));
    assert_eq!(
        plugin.start().unwrap(),
        StartOutcome::Bound { subscriptions: 4 }
    );

    bus.dispatch(&BusEvent::MessageCreate {
        message: message("1", "hello"),
    });
    bus.dispatch_value(&json!({"type": "MESSAGE_DELETE", "channelId": "7", "id": "1"}));

    let replies = CollectedReplies::new();
    plugin.execute_command("/msglog stats", &replies).unwrap();
    let text = replies.last().unwrap();
    assert!(text.contains("Deleted Messages: 1"));
    assert!(text.contains("Cached Messages: 1"));
}

#[test]
fn test_stop_twice_releases_once() {
    let (plugin, bus) = setup_plugin(Arc::new(NoDirectory));
    plugin.start().unwrap();
    assert_eq!(plugin.start().unwrap(), StartOutcome::AlreadyBound);
    assert_eq!(bus.total_handlers(), 4);

    plugin.stop();
    plugin.stop();

    assert_eq!(bus.total_handlers(), 0);
    bus.dispatch(&BusEvent::MessageCreate {
        message: message("1", "late"),
    });
    assert_eq!(plugin.logger().stats().cached_message_count, 0);
}

#[test]
fn test_handler_failure_is_contained() {
    let (plugin, bus) = setup_plugin(Arc::new(FlakyDirectory));
    plugin.start().unwrap();

    bus.dispatch(&BusEvent::MessageCreate {
        message: message("1", "a"),
    });
    bus.dispatch(&BusEvent::MessageDelete {
        channel_id: "bad".to_string(),
        message_id: "1".to_string(),
    });
    bus.dispatch(&BusEvent::MessageDelete {
        channel_id: "7".to_string(),
        message_id: "1".to_string(),
    });

    let view = plugin.logger().list_deleted(10);
    assert_eq!(view.total, 1);
    assert_eq!(view.records[0].channel_name, "general");
    assert!(plugin.is_bound());
}

#[test]
fn test_disabled_kinds_are_not_subscribed() {
    let bus = Arc::new(LocalBus::new());
    let settings = Arc::new(MemorySettings::new());
    settings.set("MessageLogger", "logDeleted", json!(false)).unwrap();
    let plugin = MessageLoggerPlugin::new(
        settings,
        Some(bus.clone() as Arc<dyn EventBus>),
        Arc::new(NoDirectory),
        Arc::new(NoopObserver),
    );
    plugin.start().unwrap();

    assert_eq!(bus.handler_count(EventKind::MessageCreate), 1);
    assert_eq!(bus.handler_count(EventKind::MessageDelete), 0);

    bus.dispatch(&BusEvent::MessageCreate {
        message: message("1", "a"),
    });
    bus.dispatch(&BusEvent::MessageDelete {
        channel_id: "7".to_string(),
        message_id: "1".to_string(),
    });
    assert_eq!(plugin.logger().stats().deleted_count, 0);
}

#[test]
fn test_settings_file_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    {
        let settings = Arc::new(JsonFileSettings::open(&path).unwrap());
        let plugin = MessageLoggerPlugin::new(
            settings,
            None,
            Arc::new(NoDirectory),
            Arc::new(NoopObserver),
        );
        plugin
            .update_settings(LoggerConfig {
                max_log_size: 25,
                ..Default::default()
            })
            .unwrap();
    }

    let settings = Arc::new(JsonFileSettings::open(&path).unwrap());
    let plugin = MessageLoggerPlugin::new(
        settings,
        None,
        Arc::new(NoDirectory),
        Arc::new(NoopObserver),
    );
    assert_eq!(plugin.logger().config().max_log_size, 25);
}

#[test]
fn test_concurrent_events_and_queries() {
    let logger = Arc::new(MessageLogger::new(LoggerConfig {
        max_log_size: 50,
        ..Default::default()
    }));

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..100 {
                    let id = format!("{}-{}", t, i);
                    logger.on_create(message(&id, "x"));
                    logger.on_delete("7", &id);
                }
            })
        })
        .collect();
    let reader = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for _ in 0..100 {
                let view = logger.list_deleted(10);
                assert!(view.total <= 50);
                assert!(view.records.len() <= 10);
            }
        })
    };

    for handle in writers {
        handle.join().unwrap();
    }
    reader.join().unwrap();

    let stats = logger.stats();
    assert_eq!(stats.deleted_count, 50);
    assert_eq!(stats.cached_message_count, 400);
}

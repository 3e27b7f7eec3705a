mod support;

use calendar_gate::components::permission::MemoryRequestHistory;
use calendar_gate::components::store::DEFAULT_EVENTS_URI;
use calendar_gate::utils::time::LocalZone;
use calendar_gate::{
    AccessLevel, CalendarDescriptor, CalendarHandle, Config, EventDescriptor, EventTarget,
    FieldMapper, PermissionGate, Scope,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use support::{MockAuthority, MockCalendarStore};

fn handle_with(store: Arc<MockCalendarStore>, authority: Arc<MockAuthority>) -> CalendarHandle {
    let config = Config::default();
    let gate = Arc::new(PermissionGate::new(authority, Arc::new(MemoryRequestHistory::new())));
    let mapper = FieldMapper::new(LocalZone::Fixed(chrono_tz::Tz::UTC), config.default_calendar_id);
    CalendarHandle::with_mapper(&config, store, gate, mapper)
}

fn granted_handle() -> (CalendarHandle, Arc<MockCalendarStore>) {
    let store = Arc::new(MockCalendarStore::new());
    let handle = handle_with(Arc::clone(&store), Arc::new(MockAuthority::granted()));
    (handle, store)
}

fn calendar(owner_account: Option<&str>) -> CalendarDescriptor {
    serde_json::from_value(json!({
        "source": { "name": "work@example.com", "type": "com.example", "isLocalAccount": false },
        "name": "work",
        "title": "Work",
        "color": 0xff3366,
        "accessLevel": "owner",
        "ownerAccount": owner_account,
    }))
    .unwrap()
}

fn event(title: &str, location: &str) -> EventDescriptor {
    EventDescriptor::from_value(json!({
        "title": title,
        "location": location,
        "startDate": "2024-01-01T10:00:00.000Z",
        "endDate": "2024-01-01T11:00:00.000Z",
        "calendarId": 3,
    }))
    .unwrap()
}

#[tokio::test]
async fn test_save_calendar_inserts_validated_attributes() {
    let (handle, store) = granted_handle();

    let id = handle.save_calendar(calendar(Some("me@example.com"))).await.unwrap();

    let saved = store.calendar(id).unwrap();
    assert_eq!(saved.account_name, "work@example.com");
    assert_eq!(saved.account_type.as_str(), "com.example");
    assert_eq!(saved.display_name, "Work");
    assert_eq!(saved.access_level, AccessLevel::Owner);
    assert_eq!(saved.access_level.code(), 700);
}

#[tokio::test]
async fn test_missing_owner_account_never_reaches_store() {
    let (handle, store) = granted_handle();

    let err = handle.save_calendar(calendar(None)).await.unwrap_err();

    assert_eq!(err.code(), "missing_required_field");
    assert!(err.to_string().contains("ownerAccount"));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_permission_denied_before_any_store_call() {
    let store = Arc::new(MockCalendarStore::new());
    let handle = handle_with(Arc::clone(&store), Arc::new(MockAuthority::new()));

    let err = handle.save_event(event("Standup", "Room 1")).await.unwrap_err();
    assert_eq!(err.code(), "denied");

    let err = handle.find_calendar_id("work@example.com").await.unwrap_err();
    assert_eq!(err.code(), "denied");

    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_read_only_grant_is_not_enough() {
    let store = Arc::new(MockCalendarStore::new());
    let authority = Arc::new(MockAuthority::new());
    authority.grant(Scope::ReadOnly);
    let handle = handle_with(Arc::clone(&store), authority);

    assert_eq!(handle.find_calendar_id("nobody").await.unwrap_err().code(), "denied");
    assert_eq!(handle.remove_calendar(1).await.unwrap_err().code(), "denied");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_find_and_remove_calendar() {
    let (handle, store) = granted_handle();
    let id = handle.save_calendar(calendar(Some("me@example.com"))).await.unwrap();

    assert_eq!(handle.find_calendar_id("work@example.com").await.unwrap(), Some(id));
    assert!(handle.remove_calendar(id).await.unwrap());
    assert!(!handle.remove_calendar(id).await.unwrap());
    assert!(store.calendar(id).is_none());
}

#[tokio::test]
async fn test_find_calendar_with_empty_name_skips_store() {
    let (handle, store) = granted_handle();

    assert_eq!(handle.find_calendar_id("").await.unwrap(), None);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_remove_calendar_by_name_counts_rows() {
    let (handle, _store) = granted_handle();
    handle.save_calendar(calendar(Some("a@example.com"))).await.unwrap();
    handle.save_calendar(calendar(Some("b@example.com"))).await.unwrap();

    assert_eq!(handle.remove_calendar_by_name("work@example.com").await.unwrap(), 2);
    assert_eq!(handle.remove_calendar_by_name("work@example.com").await.unwrap(), 0);
}

#[tokio::test]
async fn test_save_event_maps_fields() {
    let (handle, store) = granted_handle();

    let id = handle.save_event(event("Standup", "Room 1")).await.unwrap();

    let saved = store.event(id).unwrap();
    assert_eq!(saved.title.as_deref(), Some("Standup"));
    assert_eq!(saved.event_location.as_deref(), Some("Room 1"));
    assert_eq!(saved.dtstart, Some(1_704_103_200_000));
    assert_eq!(saved.calendar_id, 3);
    assert_eq!(saved.event_timezone, "UTC");
}

#[tokio::test]
async fn test_invalid_date_rejects_without_store_call() {
    let (handle, store) = granted_handle();
    let descriptor = EventDescriptor::from_value(json!({
        "title": "Broken",
        "startDate": "2024-01-01 10:00",
    }))
    .unwrap();

    let err = handle.save_event(descriptor).await.unwrap_err();

    assert_eq!(err.code(), "invalid_date_format");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_bulk_save_is_one_store_call() {
    let (handle, store) = granted_handle();
    let events = vec![event("A", "X"), event("B", "Y"), event("C", "Z")];

    assert_eq!(handle.save_events(events).await.unwrap(), 3);
    assert_eq!(store.bulk_batches(), vec![3]);
    assert_eq!(store.event_count(), 3);
}

#[tokio::test]
async fn test_bulk_save_of_nothing_skips_store() {
    let (handle, store) = granted_handle();

    assert_eq!(handle.save_events(Vec::new()).await.unwrap(), 0);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_remove_events_without_target_is_noop() {
    let (handle, store) = granted_handle();
    handle.save_event(event("Standup", "Room 1")).await.unwrap();
    let calls = store.calls();

    let removed = handle.remove_events(EventTarget::default()).await.unwrap();

    assert_eq!(removed, 0);
    assert_eq!(store.calls(), calls);
    assert_eq!(store.event_count(), 1);
}

#[tokio::test]
async fn test_remove_events_by_filter_and_id() {
    let (handle, store) = granted_handle();
    let keep = handle.save_event(event("Standup", "Room 1")).await.unwrap();
    handle.save_event(event("Standup", "Room 2")).await.unwrap();
    let other = handle.save_event(event("Review", "Room 2")).await.unwrap();

    let target = EventTarget::matching(Some("Standup"), Some("Room 2"), Some(3));
    assert_eq!(handle.remove_events(target).await.unwrap(), 1);
    assert!(store.event(keep).is_some());

    assert_eq!(handle.remove_events(EventTarget::by_id(other)).await.unwrap(), 1);
    assert_eq!(store.event_count(), 1);
}

#[tokio::test]
async fn test_remove_events_rejects_non_numeric_calendar() {
    let (handle, store) = granted_handle();
    let target = EventTarget {
        calendar_id: Some(json!("work")),
        ..Default::default()
    };

    let err = handle.remove_events(target).await.unwrap_err();

    assert_eq!(err.code(), "invalid_calendar_id");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_update_event_by_id() {
    let (handle, store) = granted_handle();
    let id = handle.save_event(event("Standup", "Room 1")).await.unwrap();

    let updated = handle
        .update_event(EventTarget::by_id(id), event("Standup", "Room 9"))
        .await
        .unwrap();

    assert_eq!(updated, 1);
    assert_eq!(store.event(id).unwrap().event_location.as_deref(), Some("Room 9"));
}

#[tokio::test]
async fn test_update_event_by_filter() {
    let (handle, store) = granted_handle();
    let first = handle.save_event(event("Standup", "Room 1")).await.unwrap();
    let second = handle.save_event(event("Standup", "Room 2")).await.unwrap();
    let other = handle.save_event(event("Review", "Room 1")).await.unwrap();
    let calls = store.calls();

    let target = EventTarget::matching(Some("Standup"), Some("Room 1"), Some(3));
    let updated = handle
        .update_event(target, event("Standup", "Room 9"))
        .await
        .unwrap();

    assert_eq!(updated, 1);
    assert_eq!(store.calls(), calls + 1);
    assert_eq!(store.event(first).unwrap().event_location.as_deref(), Some("Room 9"));
    assert_eq!(store.event(second).unwrap().event_location.as_deref(), Some("Room 2"));
    assert_eq!(store.event(other).unwrap().event_location.as_deref(), Some("Room 1"));

    // Title alone matches both remaining standups
    let target = EventTarget::matching(Some("Standup"), None, None);
    let updated = handle
        .update_event(target, event("Standup", "Room 5"))
        .await
        .unwrap();
    assert_eq!(updated, 2);
    assert_eq!(store.calls(), calls + 2);
}

#[tokio::test]
async fn test_update_event_without_target_is_noop() {
    let (handle, store) = granted_handle();
    let id = handle.save_event(event("Standup", "Room 1")).await.unwrap();
    let calls = store.calls();

    let target = EventTarget {
        event_id: None,
        title: Some(String::new()),
        location: Some(String::new()),
        calendar_id: Some(json!("")),
    };
    let updated = handle
        .update_event(target, event("Standup", "Room 9"))
        .await
        .unwrap();

    assert_eq!(updated, 0);
    assert_eq!(store.calls(), calls);
    assert_eq!(store.event(id).unwrap().event_location.as_deref(), Some("Room 1"));
}

#[tokio::test]
async fn test_store_error_passes_through() {
    let (handle, store) = granted_handle();
    store.fail_with("database is locked");

    let err = handle.save_event(event("Standup", "Room 1")).await.unwrap_err();

    assert_eq!(err.code(), "store_error");
    assert!(err.to_string().contains("database is locked"));
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_operations_run_concurrently() {
    let (handle, store) = granted_handle();
    store.delay_by(Duration::from_millis(100));

    let started = tokio::time::Instant::now();
    let (a, b, c) = tokio::join!(
        handle.save_event(event("A", "X")),
        handle.save_event(event("B", "Y")),
        handle.save_event(event("C", "Z")),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert!(started.elapsed() < Duration::from_millis(290));
}

#[tokio::test]
async fn test_shutdown_rejects_in_flight_calls() {
    let (handle, store) = granted_handle();
    store.delay_by(Duration::from_secs(30));

    let worker = handle.clone();
    let pending = tokio::spawn(async move { worker.save_event(event("A", "X")).await });
    while store.calls() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    handle.shutdown().await.unwrap();

    let err = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .unwrap()
        .unwrap()
        .unwrap_err();
    assert_eq!(err.code(), "dispatcher_error");

    let err = handle.save_event(event("B", "Y")).await.unwrap_err();
    assert_eq!(err.code(), "dispatcher_error");
}

#[tokio::test]
async fn test_events_uri_needs_no_permission() {
    let store = Arc::new(MockCalendarStore::new());
    let handle = handle_with(store, Arc::new(MockAuthority::new()));

    assert_eq!(handle.events_uri(), DEFAULT_EVENTS_URI);
}

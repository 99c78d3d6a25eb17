use evman_core::db::{open_db, open_db_in_memory, open_db_with_config};
use evman_core::{
    AdmissionError, AttendeeDraft, AttendeeService, Event, EventDraft, EventService, ListQuery,
    RejectionKind, StoreConfig,
};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use uuid::Uuid;

// 2025-06-01T00:00:00Z
const JUN_1: i64 = 1_748_736_000_000;
const DAY: i64 = 24 * 60 * 60 * 1000;

fn kind_of(err: AdmissionError) -> RejectionKind {
    err.rejection_kind()
        .unwrap_or_else(|| panic!("expected rejection, got {err}"))
}

fn create_event(conn: &Connection, day: i64, capacity: i64) -> Event {
    EventService::new(conn)
        .create_event(&EventDraft {
            name: "Meetup".to_string(),
            description: String::new(),
            start_at: JUN_1 + day * DAY,
            end_at: JUN_1 + (day + 1) * DAY,
            venue: "Library".to_string(),
            capacity,
        })
        .unwrap()
}

fn registration(event: &Event, name: &str, email: &str) -> AttendeeDraft {
    AttendeeDraft {
        name: name.to_string(),
        email: email.to_string(),
        event_uuid: Some(event.uuid),
    }
}

#[test]
fn capacity_two_admits_two_and_rejects_the_third() {
    let conn = open_db_in_memory().unwrap();
    let event = create_event(&conn, 0, 2);
    let service = AttendeeService::new(&conn);

    service
        .create_attendee(&registration(&event, "Ada", "ada@example.com"))
        .unwrap();
    service
        .create_attendee(&registration(&event, "Grace", "grace@example.com"))
        .unwrap();
    let err = service
        .create_attendee(&registration(&event, "Linus", "linus@example.com"))
        .unwrap_err();
    assert!(!err.is_retryable());
    assert_eq!(kind_of(err), RejectionKind::CapacityExceeded);

    let listed = service.list_attendees_by_event(event.uuid).unwrap();
    let emails: Vec<&str> = listed.iter().map(|item| item.email.as_str()).collect();
    assert_eq!(emails, vec!["ada@example.com", "grace@example.com"]);
}

#[test]
fn email_is_unique_per_event_but_reusable_across_events() {
    let conn = open_db_in_memory().unwrap();
    let first = create_event(&conn, 0, 10);
    let second = create_event(&conn, 1, 10);
    let service = AttendeeService::new(&conn);

    service
        .create_attendee(&registration(&first, "Ada", "ada@example.com"))
        .unwrap();
    let err = service
        .create_attendee(&registration(&first, "Ada L.", "ada@example.com"))
        .unwrap_err();
    assert_eq!(kind_of(err), RejectionKind::DuplicateUnique);

    service
        .create_attendee(&registration(&second, "Ada", "ada@example.com"))
        .unwrap();
    assert_eq!(service.list_attendees(&ListQuery::default()).unwrap().len(), 2);
}

#[test]
fn name_is_sanitized_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let event = create_event(&conn, 0, 10);
    let service = AttendeeService::new(&conn);

    let stored = service
        .create_attendee(&registration(
            &event,
            "  <b>Ada</b> %3Cscript%3Ealert(1)%3C/script%3E ",
            "ada@example.com",
        ))
        .unwrap();
    assert_eq!(stored.name, "Ada alert(1)");
    assert_eq!(service.get_attendee(stored.uuid).unwrap().name, "Ada alert(1)");
}

#[test]
fn markup_only_name_and_bad_email_are_invalid_input() {
    let conn = open_db_in_memory().unwrap();
    let event = create_event(&conn, 0, 10);
    let service = AttendeeService::new(&conn);

    let err = service
        .create_attendee(&registration(&event, r#"<img src=x onerror=alert(1)>"#, "a@example.com"))
        .unwrap_err();
    assert_eq!(kind_of(err), RejectionKind::InvalidInput);

    let err = service
        .create_attendee(&registration(&event, "Ada", "ada.example.com"))
        .unwrap_err();
    assert_eq!(kind_of(err), RejectionKind::InvalidInput);

    assert!(service.list_attendees_by_event(event.uuid).unwrap().is_empty());
}

#[test]
fn missing_or_unknown_event_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = AttendeeService::new(&conn);

    let err = service
        .create_attendee(&AttendeeDraft {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            event_uuid: None,
        })
        .unwrap_err();
    assert_eq!(kind_of(err), RejectionKind::InvalidInput);

    let err = service
        .create_attendee(&AttendeeDraft {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            event_uuid: Some(Uuid::new_v4()),
        })
        .unwrap_err();
    assert_eq!(kind_of(err), RejectionKind::NotFound);
}

#[test]
fn list_by_event_of_empty_event_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let event = create_event(&conn, 0, 10);
    assert!(AttendeeService::new(&conn)
        .list_attendees_by_event(event.uuid)
        .unwrap()
        .is_empty());
}

#[test]
fn concurrent_registrations_for_last_seat_admit_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evman.db");
    let event = {
        let conn = open_db(&path).unwrap();
        create_event(&conn, 0, 1)
    };

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = ["first@example.com", "second@example.com"]
        .into_iter()
        .map(|email| {
            let barrier = Arc::clone(&barrier);
            let path = path.clone();
            let event = event.clone();
            thread::spawn(move || register_after_barrier(&path, &event, email, &barrier))
        })
        .collect();
    let results: Vec<Result<(), RejectionKind>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let admitted = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(admitted, 1, "results: {results:?}");
    assert!(results.contains(&Err(RejectionKind::CapacityExceeded)));

    let conn = open_db(&path).unwrap();
    let stored = AttendeeService::new(&conn)
        .list_attendees_by_event(event.uuid)
        .unwrap();
    assert_eq!(stored.len(), 1);
}

fn register_after_barrier(
    path: &Path,
    event: &Event,
    email: &str,
    barrier: &Barrier,
) -> Result<(), RejectionKind> {
    let conn = open_db(path).unwrap();
    let service = AttendeeService::new(&conn);
    barrier.wait();
    service
        .create_attendee(&registration(event, "Racer", email))
        .map(|_| ())
        .map_err(kind_of)
}

#[test]
fn expired_lock_wait_is_transient_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evman.db");
    let holder = open_db(&path).unwrap();
    let event = create_event(&holder, 0, 10);

    let contender = open_db_with_config(
        &path,
        &StoreConfig {
            busy_timeout_ms: 100,
        },
    )
    .unwrap();
    let service = AttendeeService::new(&contender);

    let lock = Transaction::new_unchecked(&holder, TransactionBehavior::Immediate).unwrap();
    let err = service
        .create_attendee(&registration(&event, "Ada", "ada@example.com"))
        .unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.rejection_kind(), Some(RejectionKind::TransientStoreError));
    drop(lock);

    assert!(service.list_attendees_by_event(event.uuid).unwrap().is_empty());
}

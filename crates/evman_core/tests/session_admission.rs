use evman_core::db::open_db_in_memory;
use evman_core::repo::session_repo::{SessionRepository, SqliteSessionRepository};
use evman_core::{
    AdmissionError, Event, EventDraft, EventService, ListQuery, RejectionKind, Session,
    SessionDraft, SessionPatch, SessionService, Track, TrackDraft, TrackService,
};
use rusqlite::Connection;
use uuid::Uuid;

// 2025-03-10T09:00:00Z
const DAY_START: i64 = 1_741_597_200_000;
const HOUR: i64 = 60 * 60 * 1000;

fn kind_of(err: AdmissionError) -> RejectionKind {
    err.rejection_kind()
        .unwrap_or_else(|| panic!("expected rejection, got {err}"))
}

fn create_event(conn: &Connection, start_at: i64, end_at: i64) -> Event {
    EventService::new(conn)
        .create_event(&EventDraft {
            name: "RustConf".to_string(),
            description: String::new(),
            start_at,
            end_at,
            venue: "Hall A".to_string(),
            capacity: 50,
        })
        .unwrap()
}

fn create_track(conn: &Connection, event: &Event, name: &str) -> Track {
    TrackService::new(conn)
        .create_track(&TrackDraft {
            event_uuid: Some(event.uuid),
            name: name.to_string(),
        })
        .unwrap()
}

fn session(event: &Event, track: &Track, start_at: i64, end_at: i64) -> SessionDraft {
    SessionDraft {
        title: "Lifetimes".to_string(),
        description: None,
        event_uuid: event.uuid,
        track_uuid: Some(track.uuid),
        start_at,
        end_at,
        speaker: "Ferris".to_string(),
    }
}

fn assert_no_overlap_per_track(sessions: &[Session]) {
    for (index, a) in sessions.iter().enumerate() {
        for b in &sessions[index + 1..] {
            if a.track_uuid == b.track_uuid {
                assert!(
                    !(a.start_at < b.end_at && a.end_at > b.start_at),
                    "sessions {} and {} overlap",
                    a.uuid,
                    b.uuid
                );
            }
        }
    }
}

#[test]
fn sessions_on_one_track_never_overlap() {
    let conn = open_db_in_memory().unwrap();
    let event = create_event(&conn, DAY_START, DAY_START + 8 * HOUR);
    let main = create_track(&conn, &event, "Main");
    let side = create_track(&conn, &event, "Side");
    let service = SessionService::new(&conn);

    service
        .create_session(&session(&event, &main, DAY_START, DAY_START + HOUR))
        .unwrap();
    service
        .create_session(&session(&event, &main, DAY_START + HOUR, DAY_START + 2 * HOUR))
        .unwrap();
    service
        .create_session(&session(&event, &side, DAY_START, DAY_START + 2 * HOUR))
        .unwrap();

    let err = service
        .create_session(&session(
            &event,
            &main,
            DAY_START + HOUR / 2,
            DAY_START + 3 * HOUR / 2,
        ))
        .unwrap_err();
    assert_eq!(kind_of(err), RejectionKind::TemporalConflict);

    let stored = service.list_sessions_by_event(event.uuid).unwrap();
    assert_eq!(stored.len(), 3);
    assert_no_overlap_per_track(&stored);
    for item in &stored {
        assert!(item.start_at >= event.start_at && item.end_at <= event.end_at);
    }
}

#[test]
fn session_outside_event_is_containment_violation() {
    let conn = open_db_in_memory().unwrap();
    let event = create_event(&conn, DAY_START, DAY_START + 8 * HOUR);
    let track = create_track(&conn, &event, "Main");
    let service = SessionService::new(&conn);

    for (start, end) in [
        (DAY_START - HOUR, DAY_START + HOUR),
        (DAY_START + 7 * HOUR, DAY_START + 9 * HOUR),
    ] {
        let err = service
            .create_session(&session(&event, &track, start, end))
            .unwrap_err();
        assert_eq!(kind_of(err), RejectionKind::ContainmentViolation);
    }
    service
        .create_session(&session(&event, &track, DAY_START, DAY_START + 8 * HOUR))
        .unwrap();
}

#[test]
fn session_on_track_of_other_event_is_containment_violation() {
    let conn = open_db_in_memory().unwrap();
    let first = create_event(&conn, DAY_START, DAY_START + 8 * HOUR);
    let second = create_event(&conn, DAY_START + 24 * HOUR, DAY_START + 32 * HOUR);
    let foreign = create_track(&conn, &second, "Main");

    let err = SessionService::new(&conn)
        .create_session(&session(&first, &foreign, DAY_START, DAY_START + HOUR))
        .unwrap_err();
    assert_eq!(kind_of(err), RejectionKind::ContainmentViolation);
}

#[test]
fn session_without_track_is_invalid_input() {
    let conn = open_db_in_memory().unwrap();
    let event = create_event(&conn, DAY_START, DAY_START + 8 * HOUR);
    let track = create_track(&conn, &event, "Main");
    let draft = SessionDraft {
        track_uuid: None,
        ..session(&event, &track, DAY_START, DAY_START + HOUR)
    };

    let err = SessionService::new(&conn).create_session(&draft).unwrap_err();
    assert_eq!(kind_of(err), RejectionKind::InvalidInput);
}

#[test]
fn inverted_session_interval_is_invalid() {
    let conn = open_db_in_memory().unwrap();
    let event = create_event(&conn, DAY_START, DAY_START + 8 * HOUR);
    let track = create_track(&conn, &event, "Main");

    let err = SessionService::new(&conn)
        .create_session(&session(&event, &track, DAY_START + HOUR, DAY_START))
        .unwrap_err();
    assert_eq!(kind_of(err), RejectionKind::InvalidInterval);
}

#[test]
fn update_moves_session_and_keeps_unpatched_fields() {
    let conn = open_db_in_memory().unwrap();
    let event = create_event(&conn, DAY_START, DAY_START + 8 * HOUR);
    let main = create_track(&conn, &event, "Main");
    let service = SessionService::new(&conn);
    let created = service
        .create_session(&SessionDraft {
            description: Some("Borrowing in depth".to_string()),
            ..session(&event, &main, DAY_START, DAY_START + HOUR)
        })
        .unwrap();

    let patch = SessionPatch {
        start_at: Some(DAY_START + HOUR / 2),
        end_at: Some(DAY_START + 3 * HOUR / 2),
        ..SessionPatch::default()
    };
    let updated = service.update_session(created.uuid, &patch).unwrap();
    assert_eq!(updated.start_at, DAY_START + HOUR / 2);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.description.as_deref(), Some("Borrowing in depth"));

    let cleared = service
        .update_session(
            created.uuid,
            &SessionPatch {
                description: Some(None),
                ..SessionPatch::default()
            },
        )
        .unwrap();
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.start_at, DAY_START + HOUR / 2);
}

#[test]
fn update_rejects_overlap_with_sibling_and_move_to_foreign_track() {
    let conn = open_db_in_memory().unwrap();
    let event = create_event(&conn, DAY_START, DAY_START + 8 * HOUR);
    let other_event = create_event(&conn, DAY_START + 24 * HOUR, DAY_START + 32 * HOUR);
    let main = create_track(&conn, &event, "Main");
    let foreign = create_track(&conn, &other_event, "Main");
    let service = SessionService::new(&conn);

    let first = service
        .create_session(&session(&event, &main, DAY_START, DAY_START + HOUR))
        .unwrap();
    service
        .create_session(&session(&event, &main, DAY_START + 2 * HOUR, DAY_START + 3 * HOUR))
        .unwrap();

    let into_sibling = SessionPatch {
        end_at: Some(DAY_START + 2 * HOUR + 1),
        ..SessionPatch::default()
    };
    let err = service.update_session(first.uuid, &into_sibling).unwrap_err();
    assert_eq!(kind_of(err), RejectionKind::TemporalConflict);

    let to_foreign = SessionPatch {
        track_uuid: Some(foreign.uuid),
        ..SessionPatch::default()
    };
    let err = service.update_session(first.uuid, &to_foreign).unwrap_err();
    assert_eq!(kind_of(err), RejectionKind::ContainmentViolation);

    assert_eq!(service.get_session(first.uuid).unwrap(), first);
}

#[test]
fn delete_session_and_track_cascade() {
    let conn = open_db_in_memory().unwrap();
    let event = create_event(&conn, DAY_START, DAY_START + 8 * HOUR);
    let main = create_track(&conn, &event, "Main");
    let side = create_track(&conn, &event, "Side");
    let service = SessionService::new(&conn);

    let lone = service
        .create_session(&session(&event, &main, DAY_START, DAY_START + HOUR))
        .unwrap();
    let on_side = service
        .create_session(&session(&event, &side, DAY_START, DAY_START + HOUR))
        .unwrap();

    service.delete_session(lone.uuid).unwrap();
    assert_eq!(
        kind_of(service.get_session(lone.uuid).unwrap_err()),
        RejectionKind::NotFound
    );

    TrackService::new(&conn).delete_track(side.uuid).unwrap();
    assert_eq!(
        kind_of(service.get_session(on_side.uuid).unwrap_err()),
        RejectionKind::NotFound
    );
    assert!(service.list_sessions(&ListQuery::default()).unwrap().is_empty());
}

#[test]
fn duplicate_track_name_in_event_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let event = create_event(&conn, DAY_START, DAY_START + 8 * HOUR);
    let other = create_event(&conn, DAY_START + 24 * HOUR, DAY_START + 32 * HOUR);
    let tracks = TrackService::new(&conn);
    create_track(&conn, &event, "Main");

    let err = tracks
        .create_track(&TrackDraft {
            event_uuid: Some(event.uuid),
            name: "  Main ".to_string(),
        })
        .unwrap_err();
    assert_eq!(kind_of(err), RejectionKind::DuplicateUnique);

    let reused = create_track(&conn, &other, "Main");
    assert_eq!(reused.name, "Main");
    let listed = tracks
        .list_tracks_by_event(event.uuid, &ListQuery::default())
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[test]
fn store_guard_rejects_session_writes_that_bypass_validation() {
    let conn = open_db_in_memory().unwrap();
    let event = create_event(&conn, DAY_START, DAY_START + 8 * HOUR);
    let other_event = create_event(&conn, DAY_START + 24 * HOUR, DAY_START + 32 * HOUR);
    let main = create_track(&conn, &event, "Main");
    let foreign = create_track(&conn, &other_event, "Main");
    let repo = SqliteSessionRepository::new(&conn);

    repo.insert_session(
        Uuid::new_v4(),
        &session(&event, &main, DAY_START, DAY_START + HOUR),
    )
    .unwrap();

    let cases = [
        (
            session(&event, &main, DAY_START + HOUR / 2, DAY_START + 2 * HOUR),
            RejectionKind::TemporalConflict,
        ),
        (
            session(&event, &main, DAY_START + 7 * HOUR, DAY_START + 9 * HOUR),
            RejectionKind::ContainmentViolation,
        ),
        (
            session(&event, &foreign, DAY_START + 2 * HOUR, DAY_START + 3 * HOUR),
            RejectionKind::ContainmentViolation,
        ),
    ];
    for (draft, expected) in cases {
        let err = repo.insert_session(Uuid::new_v4(), &draft).unwrap_err();
        assert_eq!(AdmissionError::from(err).rejection_kind(), Some(expected));
    }
}

use nestcare_core::db::open_memory_db;
use nestcare_core::{
    ActivityKind, ImportError, PlannerService, ProviderRegistry, RoutineProvider, RoutineRequest,
    SqliteActivityRepository, StaticRoutineProvider, SuggestedActivity,
};
use std::sync::Arc;

fn suggestion(title: &str, start_time: &str, kind: ActivityKind) -> SuggestedActivity {
    SuggestedActivity {
        title: title.to_string(),
        start_time: start_time.to_string(),
        kind,
        details: None,
    }
}

#[test]
fn import_assigns_fresh_ids_and_the_target_date() {
    let conn = open_memory_db().unwrap();
    let service = PlannerService::new(SqliteActivityRepository::try_new(&conn).unwrap());

    let items = vec![
        suggestion("Breakfast", "08:00", ActivityKind::Meal),
        suggestion("Morning Nap", "10:00", ActivityKind::Sleep),
    ];
    let ids = service.import_routine("2024-03-01", &items).unwrap();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);

    for id in &ids {
        let stored = service.get_activity(*id).unwrap().unwrap();
        assert_eq!(stored.date, "2024-03-01");
        assert!(!stored.is_completed);
        assert!(!stored.has_reminder);
    }
}

#[test]
fn one_invalid_item_rejects_the_whole_batch() {
    let conn = open_memory_db().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();
    let service = PlannerService::new(repo);

    let items = vec![
        suggestion("Breakfast", "08:00", ActivityKind::Meal),
        suggestion("Vitamin D", "9 o'clock", ActivityKind::Medicine),
        suggestion("Lunch", "12:30", ActivityKind::Meal),
    ];

    let err = service.import_routine("2024-03-01", &items).unwrap_err();
    match err {
        ImportError::InvalidItem { index, .. } => assert_eq!(index, 1),
        other => panic!("unexpected error: {other}"),
    }

    // Nothing from the batch may land, including the valid first item.
    assert!(service.list_activities().unwrap().is_empty());
}

#[test]
fn blank_titles_are_rejected_at_the_import_boundary() {
    let conn = open_memory_db().unwrap();
    let service = PlannerService::new(SqliteActivityRepository::try_new(&conn).unwrap());

    let items = vec![suggestion("   ", "08:00", ActivityKind::Meal)];
    let err = service.import_routine("2024-03-01", &items).unwrap_err();
    assert!(matches!(err, ImportError::InvalidItem { index: 0, .. }));
    assert!(service.list_activities().unwrap().is_empty());
}

#[test]
fn import_rejects_invalid_target_dates() {
    let conn = open_memory_db().unwrap();
    let service = PlannerService::new(SqliteActivityRepository::try_new(&conn).unwrap());

    let items = vec![suggestion("Breakfast", "08:00", ActivityKind::Meal)];
    let err = service.import_routine("2024-3-1", &items).unwrap_err();
    assert!(matches!(err, ImportError::InvalidDate(_)));
}

#[test]
fn empty_batches_import_as_nothing() {
    let conn = open_memory_db().unwrap();
    let service = PlannerService::new(SqliteActivityRepository::try_new(&conn).unwrap());

    let ids = service.import_routine("2024-03-01", &[]).unwrap();
    assert!(ids.is_empty());
    assert!(service.list_activities().unwrap().is_empty());
}

#[test]
fn unknown_kind_is_rejected_when_decoding_a_provider_payload() {
    let payload = serde_json::json!([
        { "title": "Breakfast", "time": "08:00", "type": "meal" },
        { "title": "Bath", "time": "18:00", "type": "bath" },
        { "title": "Lunch", "time": "12:30", "type": "meal" }
    ]);

    let decoded = serde_json::from_value::<Vec<SuggestedActivity>>(payload);
    assert!(decoded.is_err());
}

#[test]
fn suggested_activity_wire_shape_matches_the_provider_schema() {
    let payload = serde_json::json!({
        "title": "Morning Nap",
        "time": "10:00",
        "type": "sleep",
        "details": "1 hour"
    });

    let decoded: SuggestedActivity = serde_json::from_value(payload).unwrap();
    assert_eq!(decoded.title, "Morning Nap");
    assert_eq!(decoded.start_time, "10:00");
    assert_eq!(decoded.kind, ActivityKind::Sleep);
    assert_eq!(decoded.details.as_deref(), Some("1 hour"));
}

#[test]
fn fallback_provider_plan_imports_end_to_end() {
    let conn = open_memory_db().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();
    let service = PlannerService::new(repo);

    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(StaticRoutineProvider)).unwrap();
    registry.set_active("static-fallback").unwrap();

    let request = RoutineRequest {
        baby_name: "Mina".to_string(),
        age_months: 7,
        weight: "7.4".to_string(),
    };
    let plan = registry.active().unwrap().suggest_routine(&request).unwrap();
    let ids = service.import_routine("2024-03-01", &plan).unwrap();
    assert_eq!(ids.len(), 3);

    let day = service.day_schedule("2024-03-01").unwrap();
    assert_eq!(day.meals.len(), 2);
    assert_eq!(day.sleeps.len(), 1);
    assert_eq!(day.meals[0].title, "Breakfast");
    assert_eq!(day.sleeps[0].start_time, "10:00");
}

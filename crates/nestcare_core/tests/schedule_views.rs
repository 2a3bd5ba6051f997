use chrono::NaiveDate;
use nestcare_core::db::open_memory_db;
use nestcare_core::{
    date_key, group_by_kind, is_record_future, is_reminder_eligible, items_for_week, week_window,
    ActivityKind, ActivityRecord, ActivityRepository, PlannerService, SqliteActivityRepository,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(kind: ActivityKind, title: &str, date: &str, start_time: &str) -> ActivityRecord {
    ActivityRecord::new(kind, title, date, start_time)
}

#[test]
fn group_by_kind_partitions_and_sorts_by_start_time() {
    let records = vec![
        record(ActivityKind::Meal, "Dinner", "2024-03-01", "18:00"),
        record(ActivityKind::Sleep, "Nap", "2024-03-01", "10:00"),
        record(ActivityKind::Meal, "Breakfast", "2024-03-01", "08:00"),
        record(ActivityKind::Medicine, "Vitamin D", "2024-03-01", "09:00"),
        record(ActivityKind::Play, "Tummy time", "2024-03-01", "16:00"),
    ];

    let schedule = group_by_kind(records);

    assert_eq!(schedule.meals.len(), 2);
    assert_eq!(schedule.meals[0].title, "Breakfast");
    assert_eq!(schedule.meals[1].title, "Dinner");
    assert_eq!(schedule.medicines.len(), 1);
    assert_eq!(schedule.sleeps.len(), 1);
    assert_eq!(schedule.plays.len(), 1);
    assert!(!schedule.is_empty());
}

#[test]
fn group_by_kind_keeps_relative_order_on_equal_start_times() {
    let first = record(ActivityKind::Meal, "Bottle", "2024-03-01", "08:00");
    let second = record(ActivityKind::Meal, "Porridge", "2024-03-01", "08:00");
    let schedule = group_by_kind(vec![first.clone(), second.clone()]);

    assert_eq!(schedule.meals[0].id, first.id);
    assert_eq!(schedule.meals[1].id, second.id);
}

#[test]
fn items_for_week_carries_every_date_key() {
    // 2024-03-01 is a Friday; its week runs 02-25 through 03-02.
    let week = week_window(date(2024, 3, 1));
    let records = vec![
        record(ActivityKind::Meal, "Breakfast", "2024-02-26", "08:00"),
        record(ActivityKind::Meal, "Dinner", "2024-02-26", "18:00"),
        record(ActivityKind::Sleep, "Nap", "2024-03-02", "10:00"),
        record(ActivityKind::Meal, "Outside the window", "2024-03-04", "08:00"),
    ];

    let by_day = items_for_week(&week, records);

    assert_eq!(by_day.len(), 7);
    for day in &week {
        assert!(by_day.contains_key(&date_key(*day)), "missing {day}");
    }
    assert_eq!(by_day["2024-02-26"].len(), 2);
    assert_eq!(by_day["2024-02-26"][0].title, "Breakfast");
    assert_eq!(by_day["2024-03-02"].len(), 1);
    assert!(by_day["2024-02-25"].is_empty());
    assert!(!by_day.contains_key("2024-03-04"));
}

#[test]
fn future_classification_gates_reminder_eligibility() {
    let now = date(2024, 3, 1).and_hms_opt(12, 0, 0).unwrap();

    let past = record(ActivityKind::Meal, "Breakfast", "2024-03-01", "08:00");
    let upcoming = record(ActivityKind::Meal, "Dinner", "2024-03-01", "18:00");
    let mut done_upcoming = record(ActivityKind::Meal, "Supper", "2024-03-01", "19:00");
    done_upcoming.is_completed = true;

    assert!(!is_record_future(&past, now));
    assert!(is_record_future(&upcoming, now));

    assert!(!is_reminder_eligible(&past, now));
    assert!(is_reminder_eligible(&upcoming, now));
    assert!(!is_reminder_eligible(&done_upcoming, now));
}

#[test]
fn week_schedule_service_view_is_sunday_first_and_anchor_independent() {
    let conn = open_memory_db().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();
    repo.create(&record(ActivityKind::Meal, "Breakfast", "2024-02-27", "08:00"))
        .unwrap();
    let service = PlannerService::new(repo);

    let from_friday = service.week_schedule(date(2024, 3, 1)).unwrap();
    let from_sunday = service.week_schedule(date(2024, 2, 25)).unwrap();

    assert_eq!(from_friday.days, from_sunday.days);
    assert_eq!(from_friday.days[0], date(2024, 2, 25));
    assert_eq!(from_friday.days[6], date(2024, 3, 2));
    assert_eq!(from_friday.items["2024-02-27"].len(), 1);
    assert_eq!(from_friday.items, from_sunday.items);
}

#[test]
fn month_marks_flag_kind_presence_per_day() {
    let conn = open_memory_db().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();
    repo.create(&record(ActivityKind::Meal, "Breakfast", "2024-03-05", "08:00"))
        .unwrap();
    repo.create(&record(ActivityKind::Sleep, "Nap", "2024-03-05", "10:00"))
        .unwrap();
    repo.create(&record(ActivityKind::Play, "Blocks", "2024-03-09", "16:00"))
        .unwrap();
    let service = PlannerService::new(repo);

    let marks = service.month_marks(2024, 3).unwrap();
    assert_eq!(marks.len(), 31);

    let fifth = &marks[4];
    assert_eq!(fifth.date, "2024-03-05");
    assert!(fifth.has_meal);
    assert!(fifth.has_sleep);
    assert!(!fifth.has_medicine);

    // Play has no calendar dot of its own.
    let ninth = &marks[8];
    assert!(!ninth.has_meal && !ninth.has_medicine && !ninth.has_sleep);

    assert!(service.month_marks(2024, 13).is_err());
}

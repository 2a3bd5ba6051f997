use chrono::NaiveDate;
use nestcare_core::db::open_memory_db;
use nestcare_core::{
    BabyProfile, CareRepoError, CareService, GrowthKind, HospitalVisit, ParentType,
    ShoppingCategory, SqliteCareLogRepository,
};
use uuid::Uuid;

fn service(conn: &rusqlite::Connection) -> CareService<SqliteCareLogRepository<'_>> {
    CareService::new(SqliteCareLogRepository::try_new(conn).unwrap())
}

fn profile() -> BabyProfile {
    BabyProfile {
        name: "Mina".to_string(),
        parent_name: "Alex".to_string(),
        birth_date: "2023-08-15".to_string(),
        weight: "7.4".to_string(),
        height: "68".to_string(),
        parent_type: ParentType::Mother,
    }
}

#[test]
fn growth_records_keep_insertion_order() {
    let conn = open_memory_db().unwrap();
    let care = service(&conn);

    let first = care
        .add_growth(GrowthKind::Weight, "7.4", "2024-03-01")
        .unwrap();
    let second = care
        .add_growth(GrowthKind::Height, "68", "2024-02-01")
        .unwrap();

    let listed = care.list_growth().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first);
    assert_eq!(listed[1].id, second);
    assert_eq!(listed[0].kind, GrowthKind::Weight);

    care.delete_growth(first).unwrap();
    assert_eq!(care.list_growth().unwrap().len(), 1);

    let err = care.delete_growth(first).unwrap_err();
    assert!(matches!(err, CareRepoError::NotFound(id) if id == first));
}

#[test]
fn growth_validation_rejects_blank_values_and_bad_dates() {
    let conn = open_memory_db().unwrap();
    let care = service(&conn);

    let blank = care.add_growth(GrowthKind::Weight, "  ", "2024-03-01");
    assert!(matches!(blank, Err(CareRepoError::Validation(_))));

    let bad_date = care.add_growth(GrowthKind::Weight, "7.4", "01/03/2024");
    assert!(matches!(bad_date, Err(CareRepoError::Validation(_))));

    assert!(care.list_growth().unwrap().is_empty());
}

#[test]
fn hospital_visits_roundtrip_with_optional_notes() {
    let conn = open_memory_db().unwrap();
    let care = service(&conn);

    let mut visit = HospitalVisit::new("City Children's", "2024-03-04", "6-month checkup");
    visit.notes = Some("all fine".to_string());
    let id = care.add_visit(&visit).unwrap();

    let listed = care.list_visits().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], visit);

    care.delete_visit(id).unwrap();
    assert!(care.list_visits().unwrap().is_empty());
}

#[test]
fn shopping_items_toggle_and_delete() {
    let conn = open_memory_db().unwrap();
    let care = service(&conn);

    let id = care
        .add_shopping_item("Diapers size 3", ShoppingCategory::Other)
        .unwrap();
    care.add_shopping_item("Formula", ShoppingCategory::Food)
        .unwrap();

    let checked = care.toggle_shopping_item(id).unwrap();
    assert!(checked.is_checked);
    let unchecked = care.toggle_shopping_item(id).unwrap();
    assert!(!unchecked.is_checked);

    let missing = care.toggle_shopping_item(Uuid::new_v4()).unwrap_err();
    assert!(matches!(missing, CareRepoError::NotFound(_)));

    care.delete_shopping_item(id).unwrap();
    let remaining = care.list_shopping_items().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Formula");
}

#[test]
fn profile_upsert_replaces_the_single_row() {
    let conn = open_memory_db().unwrap();
    let care = service(&conn);

    assert!(care.get_profile().unwrap().is_none());

    let original = profile();
    care.save_profile(&original).unwrap();
    assert_eq!(care.get_profile().unwrap().unwrap(), original);

    let mut updated = original;
    updated.weight = "7.9".to_string();
    updated.parent_type = ParentType::Father;
    care.save_profile(&updated).unwrap();

    let stored = care.get_profile().unwrap().unwrap();
    assert_eq!(stored.weight, "7.9");
    assert_eq!(stored.parent_type, ParentType::Father);
}

#[test]
fn profile_age_in_months_uses_calendar_components() {
    let profile = profile();

    let on = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    assert_eq!(profile.age_in_months(on).unwrap(), 7);

    let birthday_month = NaiveDate::from_ymd_opt(2023, 8, 1).unwrap();
    assert_eq!(profile.age_in_months(birthday_month).unwrap(), 0);

    let before_birth = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
    assert_eq!(profile.age_in_months(before_birth).unwrap(), -1);
}

#[test]
fn profile_validation_rejects_blank_names() {
    let conn = open_memory_db().unwrap();
    let care = service(&conn);

    let mut blank = profile();
    blank.name = "  ".to_string();
    let err = care.save_profile(&blank).unwrap_err();
    assert!(matches!(err, CareRepoError::ProfileValidation(_)));
    assert!(care.get_profile().unwrap().is_none());
}

use active_core::{DaysSequence, EntityKind, Habit, HabitColor, HabitDay, User};
use chrono::NaiveDate;
use uuid::Uuid;

#[test]
fn habit_serialization_uses_snake_case_colors() {
    let user = User::new();
    let habit = Habit::new(user.id, "Meditate", HabitColor::MidnightBlue);

    let json = serde_json::to_value(&habit).unwrap();
    assert_eq!(json["name"], "Meditate");
    assert_eq!(json["color"], "midnight_blue");
    assert_eq!(json["user_id"], user.id.to_string());

    let decoded: Habit = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, habit);
}

#[test]
fn habit_day_outcome_serializes_as_nullable_bool() {
    let date = NaiveDate::from_ymd_opt(2026, 2, 13).unwrap();
    let mut day = HabitDay::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), date);

    let pending = serde_json::to_value(&day).unwrap();
    assert!(pending["was_executed"].is_null());
    assert_eq!(pending["date"], "2026-02-13");

    day.was_executed = Some(false);
    let missed = serde_json::to_value(&day).unwrap();
    assert_eq!(missed["was_executed"], false);
}

#[test]
fn new_sequence_serializes_unloaded_days_as_null() {
    let date = NaiveDate::from_ymd_opt(2026, 2, 13).unwrap();
    let sequence = DaysSequence::new(Uuid::new_v4(), date, date);

    let json = serde_json::to_value(&sequence).unwrap();
    assert!(json["days"].is_null());
}

#[test]
fn entity_kinds_report_in_fixed_order() {
    let labels: Vec<_> = EntityKind::REPORTED
        .iter()
        .map(|kind| kind.label())
        .collect();
    assert_eq!(labels, ["User", "Habit", "HabitDay", "Notification", "Day"]);
    assert_eq!(
        serde_json::to_value(EntityKind::HabitDay).unwrap(),
        "habit_day"
    );
}

#[test]
fn habit_validation_rejects_blank_names() {
    let habit = Habit::new(Uuid::new_v4(), "   ", HabitColor::Emerald);
    assert_eq!(
        habit.validate().unwrap_err(),
        active_core::ValidationError::BlankHabitName
    );
}

use super::*;
use std::str::FromStr;

#[test]
fn test_typed_id_roundtrip_i64() {
    let id = TravelPlanId::new(17);
    assert_eq!(id.into_inner(), 17);
    assert_eq!(i64::from(id), 17);
    assert_eq!(TravelPlanId::from(17), id);
}

#[test]
fn test_typed_id_display_and_parse() {
    let id = UserId::new(1234);
    assert_eq!(id.to_string(), "1234");
    assert_eq!(UserId::from_str("1234").unwrap(), id);
    assert!(UserId::from_str("abc").is_err());
}

#[test]
fn test_typed_id_serializes_as_number() {
    let id = ExpenseId::new(9);
    assert_eq!(serde_json::to_string(&id).unwrap(), "9");

    let parsed: ExpenseId = serde_json::from_str("9").unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn test_typed_ids_order_by_value() {
    let mut ids = vec![ExpenseId::new(3), ExpenseId::new(1), ExpenseId::new(2)];
    ids.sort();
    assert_eq!(ids, vec![ExpenseId::new(1), ExpenseId::new(2), ExpenseId::new(3)]);
}

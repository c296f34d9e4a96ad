use super::*;
use rstest::rstest;
use rust_decimal_macros::dec;

#[test]
fn test_money_normalizes_scale() {
    let money = Money::new(dec!(100));
    assert_eq!(money.amount(), dec!(100.00));
    assert_eq!(money.amount().scale(), 2);
    assert_eq!(money.to_string(), "100.00");
}

#[rstest]
#[case(dec!(1.005), dec!(1.01))]
#[case(dec!(1.004), dec!(1.00))]
#[case(dec!(-1.005), dec!(-1.01))]
#[case(dec!(0.1), dec!(0.10))]
fn test_money_rounds_half_away_from_zero(#[case] input: Decimal, #[case] expected: Decimal) {
    assert_eq!(Money::new(input).amount(), expected);
}

#[test]
fn test_money_zero_and_sign() {
    assert!(Money::ZERO.is_zero());
    assert!(Money::new(dec!(-0.01)).is_negative());
    assert!(Money::new(dec!(0.01)).is_positive());
    assert!(!Money::ZERO.is_negative());
}

#[test]
fn test_money_arithmetic() {
    let a = Money::new(dec!(200.00));
    let b = Money::new(dec!(50.25));
    assert_eq!((a + b).amount(), dec!(250.25));
    assert_eq!((b - a).amount(), dec!(-149.75));
    assert_eq!((-a).amount(), dec!(-200.00));

    let mut c = a;
    c += b;
    assert_eq!(c, a + b);
}

#[test]
fn test_money_sum() {
    let items = [
        Money::new(dec!(0.10)),
        Money::new(dec!(0.20)),
        Money::new(dec!(0.30)),
    ];
    let total: Money = items.iter().sum();
    assert_eq!(total.amount(), dec!(0.60));

    let empty: Money = std::iter::empty::<Money>().sum();
    assert_eq!(empty, Money::ZERO);
}

#[test]
fn test_money_serializes_as_number() {
    let json = serde_json::to_value(Money::new(dec!(66.67))).unwrap();
    assert_eq!(json, serde_json::json!(66.67));
}

#[test]
fn test_money_deserializes_from_number_or_string() {
    let from_number: Money = serde_json::from_str("12.5").unwrap();
    let from_string: Money = serde_json::from_str("\"12.50\"").unwrap();
    let from_int: Money = serde_json::from_str("12").unwrap();
    assert_eq!(from_number.amount(), dec!(12.50));
    assert_eq!(from_string, from_number);
    assert_eq!(from_int.amount(), dec!(12.00));

    assert!(serde_json::from_str::<Money>("\"twelve\"").is_err());
}

#[test]
fn test_money_from_str() {
    assert_eq!(" 3.456 ".parse::<Money>().unwrap().amount(), dec!(3.46));
    assert!("abc".parse::<Money>().is_err());
}

#[test]
fn test_money_max_matches_column_range() {
    assert_eq!(Money::MAX.amount(), dec!(9999999999.99));
    assert!(Money::MAX.is_storable());
    assert!((-Money::MAX).is_storable());
    assert!(!Money::new(dec!(10000000000.00)).is_storable());
}

#[rstest]
#[case("1e11")]
#[case("-1e11")]
#[case("7e28")]
#[case(r#""10000000000""#)]
fn test_money_rejects_out_of_range_json(#[case] raw: &str) {
    let err = serde_json::from_str::<Money>(raw).unwrap_err();
    assert!(err.to_string().contains("out of range"), "{err}");
}

#[test]
fn test_money_accepts_max_json() {
    let money: Money = serde_json::from_str(r#""9999999999.99""#).unwrap();
    assert_eq!(money, Money::MAX);
}

#[test]
fn test_money_checked_sum_overflow_is_none() {
    let huge = Money::new(Decimal::MAX);
    assert_eq!(Money::checked_sum([huge, huge]), None);
    assert_eq!(
        Money::checked_sum([Money::new(dec!(1.10)), Money::new(dec!(2.20))]),
        Some(Money::new(dec!(3.30)))
    );
    assert_eq!(Money::checked_sum(std::iter::empty()), Some(Money::ZERO));
}

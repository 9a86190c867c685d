use arbor_core::{BbKey, Blackboard};

const HEALTH: BbKey<u32> = BbKey::new("health");
const TARGET: BbKey<String> = BbKey::new("target");

#[test]
fn blackboard_set_get_remove_roundtrip() {
    let mut bb = Blackboard::new();
    assert!(!bb.has_variable("health"));
    assert!(bb.is_empty());

    assert!(bb.set_value(HEALTH, 123));
    assert!(bb.set_value(TARGET, "door".to_string()));

    assert!(bb.has_variable("health"));
    assert_eq!(bb.len(), 2);
    assert_eq!(bb.get_value(HEALTH).copied(), Some(123));
    assert_eq!(bb.get_value(TARGET).map(|s| s.as_str()), Some("door"));

    assert_eq!(bb.remove_value(HEALTH), Some(123));
    assert_eq!(bb.get_value(HEALTH), None);
    assert!(!bb.has_variable("health"));
}

#[test]
fn set_value_overwrites_same_type() {
    let mut bb = Blackboard::new();
    assert!(bb.set_value(HEALTH, 1));
    assert!(bb.set_value(HEALTH, 2));
    assert_eq!(bb.get_value(HEALTH).copied(), Some(2));

    if let Some(h) = bb.get_value_mut(HEALTH) {
        *h += 5;
    }
    assert_eq!(bb.get_value(HEALTH).copied(), Some(7));
}

#[test]
fn set_value_rejects_type_change() {
    let mut bb = Blackboard::new();
    assert!(bb.set_value(HEALTH, 10));
    assert!(!bb.set_value(BbKey::<i64>::new("health"), -1));
    assert_eq!(bb.get_value(HEALTH).copied(), Some(10));
}

#[test]
fn variables_are_listed_in_name_order() {
    let mut bb = Blackboard::new();
    bb.set_value(TARGET, "door".to_string());
    bb.set_value(HEALTH, 3);
    assert_eq!(bb.variables().collect::<Vec<_>>(), vec!["health", "target"]);

    bb.clear();
    assert!(bb.is_empty());
}

#[test]
#[should_panic(expected = "blackboard type mismatch")]
fn blackboard_type_mismatch_panics() {
    let mut bb = Blackboard::new();
    bb.set_value(HEALTH, 1u32);
    let _ = bb.get_value(BbKey::<i32>::new("health"));
}

#[test]
fn mismatched_remove_keeps_the_variable() {
    let mut bb = Blackboard::new();
    bb.set_value(HEALTH, 9u32);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        bb.remove_value(BbKey::<String>::new("health"))
    }));

    assert!(result.is_err());
    assert_eq!(bb.get_value(HEALTH).copied(), Some(9));
}

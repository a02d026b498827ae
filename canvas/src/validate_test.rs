use super::*;

fn named(names: &[&str]) -> Vec<FieldDefinition> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| FieldDefinition::text(*n, 1, 10.0 * i as f64, 100.0, 50.0, 20.0))
        .collect()
}

#[test]
fn unique_names_pass() {
    assert!(validate(&named(&["a", "b"])).is_empty());
    assert!(ensure_valid(&named(&["a", "b"])).is_ok());
}

#[test]
fn empty_store_passes() {
    assert!(validate(&[]).is_empty());
}

#[test]
fn duplicate_pair_reports_each_occurrence() {
    let fields = named(&["a", "a", "b"]);
    let errors = validate(&fields);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].field_id, fields[0].id);
    assert_eq!(errors[1].field_id, fields[1].id);
    for e in &errors {
        assert_eq!(e.kind, ValidationErrorKind::DuplicateName { name: "a".into(), count: 2 });
    }
}

#[test]
fn triple_duplicate_carries_count() {
    let errors = validate(&named(&["x", "x", "x"]));
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|e| e.to_string().contains("3 fields")));
}

#[test]
fn blank_names_reported_and_not_grouped() {
    let fields = named(&["", "  ", "ok"]);
    let errors = validate(&fields);
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::EmptyName));
    assert_eq!(errors[0].error_code(), "E_FIELD_NAME_EMPTY");
}

#[test]
fn both_rules_evaluated() {
    let errors = validate(&named(&["", "d", "d"]));
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0].kind, ValidationErrorKind::EmptyName);
    assert_eq!(errors[1].error_code(), "E_FIELD_NAME_DUPLICATE");
}

#[test]
fn names_compared_without_trimming() {
    assert!(validate(&named(&["a", "a "])).is_empty());
}

#[test]
fn empty_name_message_locates_field() {
    let mut fields = named(&[""]);
    fields[0].page = 3;
    fields[0].x = 12.0;
    fields[0].y = 40.0;
    let msg = validate(&fields)[0].to_string();
    assert_eq!(msg, "field at (p3, 12, 40) has an empty name");
}

#[test]
fn ensure_valid_wraps_all_errors() {
    let err = ensure_valid(&named(&["dup", "dup"])).unwrap_err();
    assert_eq!(err.errors.len(), 2);
    let msg = err.to_string();
    assert!(msg.starts_with("2 field validation error(s)"));
    assert!(msg.contains("\"dup\""));
}
